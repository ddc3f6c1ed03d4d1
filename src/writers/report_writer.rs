use crate::error::{ProcessingError, Result};
use crate::models::{RunningStats, StationTable};
use crate::utils::constants::{REPORT_CLOSE, REPORT_ENTRY_SEPARATOR, REPORT_OPEN};
use clap::ValueEnum;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// `{A=min/mean/max, B=...}`
    Text,
    /// JSON array of per-station objects
    Json,
}

/// Sorted view of a final table, rendered as `{key=min/mean/max, ...}`.
///
/// Every number is printed with one fractional digit, rounded from its exact
/// binary value with ties to even.
pub struct Report<'a> {
    entries: Vec<(&'a [u8], &'a RunningStats)>,
}

impl<'a> Report<'a> {
    pub fn new(table: &'a StationTable) -> Self {
        Self {
            entries: table.sorted(),
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REPORT_OPEN)?;
        for (i, (station, stats)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(REPORT_ENTRY_SEPARATOR)?;
            }
            write!(
                f,
                "{}={:.1}/{:.1}/{:.1}",
                String::from_utf8_lossy(station),
                stats.min,
                stats.mean(),
                stats.max
            )?;
        }
        f.write_str(REPORT_CLOSE)?;
        writeln!(f)
    }
}

/// Text report for `table`, including the trailing newline.
pub fn format_report(table: &StationTable) -> String {
    Report::new(table).to_string()
}

#[derive(Debug, Serialize)]
struct StationReport<'a> {
    station: Cow<'a, str>,
    min: f64,
    mean: f64,
    max: f64,
    count: u64,
}

/// Round to one decimal using the same rule as the text report.
fn round_tenths(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

pub struct ReportWriter {
    format: ReportFormat,
}

impl ReportWriter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, table: &StationTable) -> Result<String> {
        match self.format {
            ReportFormat::Text => Ok(format_report(table)),
            ReportFormat::Json => {
                let stations: Vec<StationReport> = table
                    .sorted()
                    .into_iter()
                    .map(|(station, stats)| StationReport {
                        station: String::from_utf8_lossy(station),
                        min: round_tenths(stats.min),
                        mean: round_tenths(stats.mean()),
                        max: round_tenths(stats.max),
                        count: stats.count,
                    })
                    .collect();
                let mut json = serde_json::to_string_pretty(&stations)?;
                json.push('\n');
                Ok(json)
            }
        }
    }

    /// Append the report to `path`, creating the file if needed.
    pub fn append_to_path(&self, report: &str, path: &Path) -> Result<()> {
        let output_error = |source| ProcessingError::OutputWrite {
            path: path.to_path_buf(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(output_error)?;
        file.write_all(report.as_bytes()).map_err(output_error)?;
        file.flush().map_err(output_error)
    }

    pub fn write_to<W: Write>(&self, report: &str, mut writer: W) -> Result<()> {
        writer.write_all(report.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new(ReportFormat::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn table(records: &[(&str, f64)]) -> StationTable {
        let mut table = StationTable::new();
        for (station, value) in records {
            table.record(station.as_bytes(), *value);
        }
        table
    }

    #[test]
    fn test_single_station() {
        let t = table(&[("A", 5.0), ("A", 7.0), ("A", 3.0)]);
        assert_eq!(format_report(&t), "{A=3.0/5.0/7.0}\n");
    }

    #[test]
    fn test_stations_sorted() {
        let t = table(&[("B", 1.0), ("A", 2.0)]);
        assert_eq!(format_report(&t), "{A=2.0/2.0/2.0, B=1.0/1.0/1.0}\n");
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(format_report(&StationTable::new()), "{}\n");
    }

    #[test]
    fn test_rounding_is_consistent() {
        let t = table(&[("A", 1.05), ("A", 1.15)]);
        assert_eq!(format_report(&t), "{A=1.1/1.1/1.1}\n");

        let t = table(&[("B", 0.26), ("B", -0.26)]);
        assert_eq!(format_report(&t), "{B=-0.3/0.0/0.3}\n");
    }

    #[test]
    fn test_json_report() {
        let t = table(&[("Oslo", -3.26), ("Oslo", 4.0), ("Cairo", 30.05)]);
        let json = ReportWriter::new(ReportFormat::Json).render(&t).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed[0]["station"], "Cairo");
        assert_eq!(parsed[1]["station"], "Oslo");
        assert_eq!(parsed[1]["min"], -3.3);
        assert_eq!(parsed[1]["max"], 4.0);
        assert_eq!(parsed[1]["count"], 2);
    }

    #[test]
    fn test_append_to_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        let writer = ReportWriter::default();
        let report = format_report(&table(&[("A", 1.0)]));

        writer.append_to_path(&report, &path).unwrap();
        writer.append_to_path(&report, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "{A=1.0/1.0/1.0}\n{A=1.0/1.0/1.0}\n");
    }

    #[test]
    fn test_append_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.txt");

        let result = ReportWriter::default().append_to_path("{}\n", &path);
        assert!(matches!(result, Err(ProcessingError::OutputWrite { .. })));
    }
}
