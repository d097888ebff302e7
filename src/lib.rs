pub mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod report;
mod utils;

pub use api::Mode;
pub use config::{Config, DEFAULT_OUTPUT_DIR, DEFAULT_SOURCE_URL};
pub use error::{Error, RecordError, Result};
