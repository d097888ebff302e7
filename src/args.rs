//! These structs provide the CLI interface for the sales-report CLI.

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// sales-report: turns a restaurant's JSON sales feed into tab-delimited reports.
///
/// The program downloads the sales document, normalizes it into a table and writes six reports to
/// the output directory: sales per zone, per zone and waiter, per day, per month, a check of
/// payments against totals and the work of each waiter per month and zone.
///
/// With no arguments it downloads from the default URL and writes into the working directory.
/// Set SALES_REPORT_IN_TEST_MODE to a non-empty value to use built-in seed data instead of
/// downloading anything.
#[derive(Debug, Parser, Clone)]
#[command(version)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    /// The URL of the JSON sales document.
    #[arg(long, env = "SALES_REPORT_URL")]
    url: Option<String>,

    /// The directory the report files are written to. Defaults to the working directory.
    #[arg(long, env = "SALES_REPORT_OUT_DIR")]
    out_dir: Option<PathBuf>,
}

impl Args {
    pub fn new(common: Common, url: Option<String>, out_dir: Option<PathBuf>) -> Self {
        Self {
            common,
            url,
            out_dir,
        }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn out_dir(&self) -> Option<&Path> {
        self.out_dir.as_deref()
    }
}

/// Arguments that do not change what is reported.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// An optional JSON config file with `source_url` and `output_dir` keys. Flags and their
    /// environment variables take precedence over it.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Common {
    pub fn new(log_level: LevelFilter, config: Option<PathBuf>) -> Self {
        Self { log_level, config }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let args = Args::try_parse_from(["sales-report"]).unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::INFO);
        assert!(args.common().config().is_none());
    }

    #[test]
    fn test_all_arguments() {
        let args = Args::try_parse_from([
            "sales-report",
            "--log-level",
            "debug",
            "--config",
            "/etc/sales.json",
            "--url",
            "http://localhost/sales.json",
            "--out-dir",
            "reports",
        ])
        .unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        assert_eq!(args.common().config(), Some(Path::new("/etc/sales.json")));
        assert_eq!(args.url(), Some("http://localhost/sales.json"));
        assert_eq!(args.out_dir(), Some(Path::new("reports")));
    }

    #[test]
    fn test_bad_log_level() {
        assert!(Args::try_parse_from(["sales-report", "--log-level", "loud"]).is_err());
    }
}
