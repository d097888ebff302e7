use crate::api::{self, Mode};
use crate::commands::Out;
use crate::report::{self, DirWriter, ReportSummary};
use crate::{Config, Result};
use anyhow::Context;
use serde::Serialize;
use tracing::info;

/// What a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// The number of Sale Records downloaded.
    pub records: usize,
    pub reports: Vec<ReportSummary>,
}

/// Downloads the sales records and writes every report into the configured output directory.
///
/// # Errors
/// Any failure ends the run: the download, a record that fails validation, or a file that
/// cannot be written. When the failure happens before writing starts, no report is written.
pub async fn run(config: Config, mode: Mode) -> Result<Out<RunSummary>> {
    let mut source = api::source(&config, mode);
    let records = source
        .fetch()
        .await
        .context("Unable to load the sales records")?;
    let count = records.len();
    info!("Building reports from {count} sales records");

    let mut writer = DirWriter::new(config.output_dir()).await?;
    let reports = report::generate(records, &mut writer).await?;

    Ok(Out::new(
        format!(
            "Wrote {} reports to {}",
            reports.len(),
            config.output_dir().display()
        ),
        RunSummary {
            records: count,
            reports,
        },
    ))
}
