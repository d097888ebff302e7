//! Report Views: read-only aggregates of the `SalesTable`, each destined for one output file.

mod views;
mod writer;

use crate::model::{Amount, Month, Record, SalesTable};
use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

pub use views::{
    build_all, payment_check, sales_by_day, sales_by_month, sales_by_zone, waiters_work,
    zone_attention,
};
pub use writer::{render, DirWriter, MemoryWriter, ReportWriter};

/// The six reports. The serialized name of each variant is the stem of its output file.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    #[serde(rename = "report_zone")]
    ZoneAttention,
    #[serde(rename = "report_sales_by_zone")]
    SalesByZone,
    #[serde(rename = "report_sales_by_day")]
    SalesByDay,
    #[serde(rename = "report_sales_by_month")]
    SalesByMonth,
    #[serde(rename = "report_exist_different_payment")]
    PaymentCheck,
    #[serde(rename = "report_waiters_work")]
    WaitersWork,
}

serde_plain::derive_display_from_serialize!(ReportKind);
serde_plain::derive_fromstr_from_deserialize!(ReportKind);

impl ReportKind {
    pub const ALL: [ReportKind; 6] = [
        ReportKind::ZoneAttention,
        ReportKind::SalesByZone,
        ReportKind::SalesByDay,
        ReportKind::SalesByMonth,
        ReportKind::PaymentCheck,
        ReportKind::WaitersWork,
    ];

    /// e.g. `report_zone.csv`
    pub fn file_name(&self) -> String {
        format!("{self}.csv")
    }
}

/// One rendered value in a report.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Cell {
    /// The position of a row when a report has no grouping keys.
    RowNumber(usize),
    Text(String),
    Count(u64),
    Amount(Amount),
    Date(NaiveDate),
    Month(Month),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::RowNumber(n) => write!(f, "{n}"),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Count(n) => write!(f, "{n}"),
            Cell::Amount(a) => write!(f, "{a}"),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Month(m) => write!(f, "{m}"),
        }
    }
}

/// One line of a report: the index cells (group keys or a row number) then the value cells.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ReportRow {
    index: Vec<Cell>,
    values: Vec<Cell>,
}

impl ReportRow {
    pub fn new(index: Vec<Cell>, values: Vec<Cell>) -> Self {
        Self { index, values }
    }

    pub fn index(&self) -> &[Cell] {
        &self.index
    }

    pub fn values(&self) -> &[Cell] {
        &self.values
    }

    /// Index cells followed by value cells, in output order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.index.iter().chain(self.values.iter())
    }
}

/// A read-only aggregate of the `SalesTable`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ReportView {
    kind: ReportKind,
    /// Native names of the value columns.
    columns: Vec<String>,
    /// Labels that replace the native column names in the output. When `None` no header row is
    /// written.
    header: Option<Vec<String>>,
    rows: Vec<ReportRow>,
}

impl ReportView {
    pub(crate) fn new<S: Into<String>>(
        kind: ReportKind,
        columns: impl IntoIterator<Item = S>,
        rows: Vec<ReportRow>,
    ) -> Self {
        Self {
            kind,
            columns: columns.into_iter().map(Into::into).collect(),
            header: None,
            rows,
        }
    }

    pub(crate) fn with_header<S: Into<String>>(mut self, header: impl IntoIterator<Item = S>) -> Self {
        self.header = Some(header.into_iter().map(Into::into).collect());
        self
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn file_name(&self) -> String {
        self.kind.file_name()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What was written for one report.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ReportSummary {
    pub report: ReportKind,
    pub path: PathBuf,
    pub rows: usize,
}

/// Normalizes `records`, reconciles payments and builds every report. Nothing is written.
pub fn build_reports(records: Vec<Record>) -> Result<Vec<ReportView>> {
    let table = SalesTable::load(records)?;
    build_all(&table)
}

/// Builds every report and hands each one to `writer`. All reports are built before the first
/// one is written, so a bad record never leaves a partial set of files.
pub async fn generate(
    records: Vec<Record>,
    writer: &mut (dyn ReportWriter + Send),
) -> Result<Vec<ReportSummary>> {
    let views = build_reports(records)?;
    let mut summaries = Vec::with_capacity(views.len());
    for view in &views {
        let path = writer.write(view).await?;
        debug!("Wrote {} rows to {}", view.len(), path.display());
        summaries.push(ReportSummary {
            report: view.kind(),
            path,
            rows: view.len(),
        });
    }
    Ok(summaries)
}
