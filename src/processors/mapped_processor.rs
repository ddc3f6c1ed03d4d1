use crate::error::{ProcessingError, Result};
use crate::models::{ProcessingOutcome, ProcessingSummary, StationTable};
use crate::processors::{ChunkAggregator, PipelineConfig};
use crate::readers::split_ranges;
use crate::utils::progress::ProgressReporter;
use memmap2::Mmap;
use rayon::prelude::*;
use std::fs::File;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Memory-maps the input and folds newline-aligned slices on a rayon pool.
pub struct MappedProcessor {
    config: PipelineConfig,
}

impl MappedProcessor {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn process_file(
        &self,
        path: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<ProcessingOutcome> {
        self.config.validate()?;
        let started = Instant::now();

        let file = File::open(path).map_err(|source| ProcessingError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

        // Mapping a zero-length file fails on some platforms.
        if file.metadata()?.len() == 0 {
            let table = StationTable::new();
            let summary = ProcessingSummary::from_table(&table, 0, 0, started.elapsed());
            return Ok(ProcessingOutcome { table, summary });
        }

        let mmap = unsafe { Mmap::map(&file)? };
        let data: &[u8] = &mmap;
        let ranges = split_ranges(data, self.config.chunk_size);
        debug!(ranges = ranges.len(), bytes = data.len(), "mapped input split");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let table = pool.install(|| {
            ranges
                .par_iter()
                .map(|range| {
                    let partial =
                        ChunkAggregator::new().aggregate(&data[range.clone()], range.start as u64);
                    if let Some(p) = progress {
                        p.increment(range.len() as u64);
                    }
                    partial
                })
                .try_reduce(StationTable::new, |mut acc, partial| {
                    acc.merge(partial);
                    Ok(acc)
                })
        })?;

        let summary = ProcessingSummary::from_table(
            &table,
            ranges.len() as u64,
            data.len() as u64,
            started.elapsed(),
        );
        info!(
            stations = summary.stations,
            records = summary.records,
            elapsed = ?summary.elapsed,
            "mapped aggregation complete"
        );

        Ok(ProcessingOutcome { table, summary })
    }
}

impl Default for MappedProcessor {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
