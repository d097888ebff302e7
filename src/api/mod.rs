//! Acquisition of the sales document.
//!
//! The `Source` trait hides where the records come from so that the report pipeline can run
//! against the live object store or against in-memory seed data.

mod http;
mod seed;

use crate::model::Record;
use crate::{Config, Result};
use tracing::debug;

pub use http::HttpSource;
pub use seed::SeedSource;
#[cfg(test)]
pub(crate) use seed::SEED_DATA;

/// The environment variable that switches the program to seed data. When it is set and non-empty
/// the network is never touched.
pub const TEST_MODE_ENV: &str = "SALES_REPORT_IN_TEST_MODE";

/// Where the sales records are loaded from.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    /// Download the document from the configured URL.
    #[default]
    Http,
    /// Use the built-in seed dataset.
    Test,
}

impl Mode {
    /// `Mode::Test` when `SALES_REPORT_IN_TEST_MODE` is set and non-empty, otherwise `Mode::Http`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(v) if !v.is_empty() => Mode::Test,
            _ => Mode::Http,
        }
    }
}

/// Produces the full array of Sale Records in one call.
#[async_trait::async_trait]
pub trait Source {
    async fn fetch(&mut self) -> Result<Vec<Record>>;
}

/// Creates the `Source` for `mode`.
pub fn source(config: &Config, mode: Mode) -> Box<dyn Source + Send> {
    debug!("Using {mode:?} source");
    match mode {
        Mode::Http => Box::new(HttpSource::new(config.source_url().clone())),
        Mode::Test => Box::new(SeedSource::default()),
    }
}
