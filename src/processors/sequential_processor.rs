use crate::error::{ProcessingError, Result};
use crate::models::{ProcessingOutcome, ProcessingSummary, StationTable};
use crate::processors::ChunkAggregator;
use crate::readers::ChunkSplitter;
use crate::utils::constants::DEFAULT_CHUNK_SIZE;
use crate::utils::progress::ProgressReporter;
use std::fs::File;
use std::ops::ControlFlow;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Single-threaded baseline: one pass, one table.
///
/// Shares the splitter and tokenizer with the parallel pipeline, so it serves
/// as the correctness reference for the concurrent strategies.
pub struct SequentialProcessor {
    chunk_size: usize,
}

impl SequentialProcessor {
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    pub fn process_file(
        &self,
        path: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<ProcessingOutcome> {
        let started = Instant::now();
        let file = File::open(path).map_err(|source| ProcessingError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        let aggregator = ChunkAggregator::new();
        let mut table = StationTable::new();
        let mut failure = None;

        let stats = ChunkSplitter::new(self.chunk_size).split(file, |chunk| {
            if let Err(e) = aggregator.aggregate_into(&mut table, &chunk.data, chunk.offset) {
                failure = Some(e);
                return ControlFlow::Break(());
            }
            if let Some(p) = progress {
                p.increment(chunk.len() as u64);
            }
            ControlFlow::Continue(())
        })?;

        if let Some(e) = failure {
            return Err(e);
        }

        let summary =
            ProcessingSummary::from_table(&table, stats.chunks, stats.bytes, started.elapsed());
        info!(
            stations = summary.stations,
            records = summary.records,
            elapsed = ?summary.elapsed,
            "sequential aggregation complete"
        );

        Ok(ProcessingOutcome { table, summary })
    }
}

impl Default for SequentialProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writers::format_report;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn run(contents: &[u8]) -> Result<ProcessingOutcome> {
        let mut file = NamedTempFile::new()?;
        file.write_all(contents)?;
        file.flush()?;
        SequentialProcessor::new(16).process_file(file.path(), None)
    }

    #[test]
    fn test_missing_separator_is_skipped() {
        let outcome = run(b"A;1.0\nNOVALUE\nA;3.0\n").unwrap();
        assert_eq!(format_report(&outcome.table), "{A=1.0/2.0/3.0}\n");
    }

    #[test]
    fn test_file_without_trailing_newline() {
        let outcome = run(b"A;1.0\nB;2.0\nA;3.0").unwrap();
        assert_eq!(format_report(&outcome.table), "{A=1.0/2.0/3.0, B=2.0/2.0/2.0}\n");
    }

    #[test]
    fn test_malformed_value_stops_pass() {
        let result = run(b"A;1.0\nA;x\nA;3.0\n");
        assert!(matches!(
            result,
            Err(ProcessingError::MalformedValue { offset: 6, .. })
        ));
    }
}
