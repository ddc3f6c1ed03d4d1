use crate::models::StationTable;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingSummary {
    pub stations: usize,
    pub records: u64,
    pub chunks: u64,
    pub bytes: u64,
    pub elapsed: Duration,
}

impl ProcessingSummary {
    pub fn from_table(table: &StationTable, chunks: u64, bytes: u64, elapsed: Duration) -> Self {
        Self {
            stations: table.len(),
            records: table.total_records(),
            chunks,
            bytes,
            elapsed,
        }
    }

    pub fn throughput_mb_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.bytes as f64 / (1024.0 * 1024.0) / secs
    }

    pub fn summary(&self) -> String {
        format!(
            "Processing Summary:\n  Stations: {}\n  Records: {}\n  Chunks: {}\n  Bytes: {}\n  Elapsed: {:.3?} ({:.1} MB/s)",
            self.stations,
            self.records,
            self.chunks,
            self.bytes,
            self.elapsed,
            self.throughput_mb_per_sec()
        )
    }
}

/// Final table of a run together with its summary.
#[derive(Debug, Clone)]
pub struct ProcessingOutcome {
    pub table: StationTable,
    pub summary: ProcessingSummary,
}
