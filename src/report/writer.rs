//! Serializes Report Views to tab-delimited, ISO-8859-1 encoded files.

use crate::report::{ReportKind, ReportView};
use crate::{utils, Result};
use anyhow::{anyhow, Context};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const DELIMITER: u8 = b'\t';
const TERMINATOR: u8 = b'\n';

/// Receives finished reports. This is the only side-effecting step of the pipeline.
#[async_trait::async_trait]
pub trait ReportWriter {
    /// Writes `view`, replacing any earlier output for the same report, and returns where it went.
    async fn write(&mut self, view: &ReportView) -> Result<PathBuf>;
}

/// Writes each report to `<dir>/<report_name>.csv`.
#[derive(Debug, Clone)]
pub struct DirWriter {
    dir: PathBuf,
}

impl DirWriter {
    /// Creates `dir` if it does not exist.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        utils::make_dir(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait::async_trait]
impl ReportWriter for DirWriter {
    async fn write(&mut self, view: &ReportView) -> Result<PathBuf> {
        let path = self.dir.join(view.file_name());
        let data = render(view)?;
        utils::write(&path, data).await?;
        Ok(path)
    }
}

/// Keeps rendered reports in memory, keyed by report.
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    files: BTreeMap<ReportKind, Vec<u8>>,
}

impl MemoryWriter {
    pub fn files(&self) -> &BTreeMap<ReportKind, Vec<u8>> {
        &self.files
    }

    pub fn get(&self, kind: ReportKind) -> Option<&[u8]> {
        self.files.get(&kind).map(Vec::as_slice)
    }
}

#[async_trait::async_trait]
impl ReportWriter for MemoryWriter {
    async fn write(&mut self, view: &ReportView) -> Result<PathBuf> {
        self.files.insert(view.kind(), render(view)?);
        Ok(PathBuf::from(view.file_name()))
    }
}

/// Renders `view` as the bytes of its output file.
///
/// The index cells come first on every line. When the view has a custom header it is written as
/// the first line, with an empty label above the index.
pub fn render(view: &ReportView) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .terminator(csv::Terminator::Any(TERMINATOR))
        .has_headers(false)
        .from_writer(Vec::new());

    if let Some(header) = view.header() {
        let mut fields = vec![Vec::new()];
        for label in header {
            fields.push(encode(view, label)?);
        }
        wtr.write_record(&fields)
            .with_context(|| format!("Unable to write the header of {}", view.kind()))?;
    }

    for row in view.rows() {
        let fields = row
            .cells()
            .map(|cell| encode(view, &cell.to_string()))
            .collect::<Result<Vec<Vec<u8>>>>()?;
        wtr.write_record(&fields)
            .with_context(|| format!("Unable to write a row of {}", view.kind()))?;
    }

    wtr.into_inner()
        .map_err(|e| anyhow!("Unable to flush {}: {}", view.kind(), e.error()))
}

/// Encodes `s` as ISO-8859-1, where every char up to U+00FF is a single byte.
fn encode(view: &ReportView, s: &str) -> Result<Vec<u8>> {
    s.chars()
        .map(|c| {
            u8::try_from(c).map_err(|_| {
                anyhow!(
                    "{} contains '{c}' in '{s}', which cannot be encoded as ISO-8859-1",
                    view.kind()
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, SalesTable};
    use crate::report::{build_all, waiters_work, Cell, ReportRow};
    use crate::test::{bob_record, records, sample_records};
    use serde_json::json;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn decode(bytes: &[u8]) -> String {
        bytes.iter().map(|&b| b as char).collect()
    }

    fn bob_views() -> Vec<ReportView> {
        build_all(&SalesTable::load(records(json!([bob_record()]))).unwrap()).unwrap()
    }

    #[test]
    fn test_render_without_header() {
        let views = bob_views();
        assert_eq!(decode(&render(&views[0]).unwrap()), "A\t1\n");
        assert_eq!(decode(&render(&views[1]).unwrap()), "A\tBob\t1\n");
        assert_eq!(decode(&render(&views[2]).unwrap()), "0\t100\t2023-01-05\n");
        assert_eq!(decode(&render(&views[3]).unwrap()), "0\t2023-01\t100\n");
    }

    #[test]
    fn test_render_with_header() {
        let views = bob_views();
        assert_eq!(
            decode(&render(&views[4]).unwrap()),
            "\tDate\ttotal\ttotal_payments\n0\t2023-01-05\t100\t100\n"
        );
        assert_eq!(
            decode(&render(&views[5]).unwrap()),
            "\tday\tzone\twaiter\ttotal\n0\t2023-01\tA\tBob\t1\n"
        );
    }

    #[test]
    fn test_render_empty_with_header() {
        let table = SalesTable::load(Vec::new()).unwrap();
        let bytes = render(&waiters_work(&table)).unwrap();
        assert_eq!(decode(&bytes), "\tday\tzone\twaiter\ttotal\n");
    }

    #[test]
    fn test_render_latin1() {
        let view = ReportView::new(
            ReportKind::ZoneAttention,
            ["zone"],
            vec![ReportRow::new(
                vec![Cell::Text("Salón".into())],
                vec![Cell::Count(2)],
            )],
        );
        let bytes = render(&view).unwrap();
        assert_eq!(bytes, b"Sal\xf3n\t2\n");
    }

    #[test]
    fn test_render_rejects_non_latin1() {
        let view = ReportView::new(
            ReportKind::ZoneAttention,
            ["zone"],
            vec![ReportRow::new(
                vec![Cell::Text("Зал".into())],
                vec![Cell::Count(1)],
            )],
        );
        let err = render(&view).unwrap_err();
        assert!(err.to_string().contains("ISO-8859-1"));
        assert!(err.to_string().contains("report_zone"));
    }

    #[test]
    fn test_round_trip_values() {
        let table = SalesTable::load(sample_records()).unwrap();
        for view in build_all(&table).unwrap() {
            let text = decode(&render(&view).unwrap());
            let mut lines: Vec<&str> = text.lines().collect();
            if view.header().is_some() {
                lines.remove(0);
            }
            assert_eq!(lines.len(), view.len(), "{}", view.kind());
            for (line, row) in lines.iter().zip(view.rows()) {
                let read: Vec<&str> = line.split('\t').skip(row.index().len()).collect();
                let expected: Vec<String> = row.values().iter().map(|c| c.to_string()).collect();
                assert_eq!(read, expected, "{}", view.kind());
                for (cell, field) in row.values().iter().zip(read) {
                    if let Cell::Amount(a) = cell {
                        assert_eq!(*a, Amount::from_str(field).unwrap());
                    }
                }
            }
        }
    }

    #[tokio::test]
    async fn test_dir_writer_overwrites() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("reports");
        let mut writer = DirWriter::new(&out).await.unwrap();
        assert!(writer.dir().is_dir());

        let path = out.join("report_zone.csv");
        std::fs::write(&path, "stale contents that are longer than the report\n").unwrap();

        let views = bob_views();
        let written = writer.write(&views[0]).await.unwrap();
        assert_eq!(written, path);
        assert_eq!(std::fs::read(&path).unwrap(), b"A\t1\n");
    }

    #[tokio::test]
    async fn test_memory_writer() {
        let mut writer = MemoryWriter::default();
        for view in bob_views() {
            writer.write(&view).await.unwrap();
        }
        assert_eq!(writer.files().len(), 6);
        assert_eq!(
            writer.get(ReportKind::SalesByZone).unwrap(),
            b"A\tBob\t1\n"
        );
    }
}
