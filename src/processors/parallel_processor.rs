use crate::error::{ProcessingError, Result};
use crate::models::{ProcessingOutcome, ProcessingSummary, StationTable};
use crate::processors::{MergeAggregator, PipelineConfig, WorkerPool};
use crate::readers::{ChunkSplitter, SplitStats};
use crate::utils::progress::ProgressReporter;
use std::fs::File;
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Concurrent pipeline: sequential reader, bounded worker pool, single merger.
pub struct ParallelProcessor {
    config: PipelineConfig,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            config: PipelineConfig::new(max_workers),
        }
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.config.chunk_size = chunk_size;
        self
    }

    pub fn with_queue_depth(mut self, queue_depth: usize) -> Self {
        self.config.queue_depth = queue_depth;
        self
    }

    /// Aggregate the whole file.
    ///
    /// The merge task is spawned first and awaited last: its completion is the
    /// point at which every chunk has been parsed and folded in. Any error
    /// aborts the run and no table is returned.
    pub async fn process_file(
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

        info!(
            path = %path.display(),
            workers = self.config.max_workers,
            chunk_size = self.config.chunk_size,
            queue_depth = self.config.queue_depth,
            "starting parallel aggregation"
        );

        let (partial_tx, partial_rx) = mpsc::channel(self.config.max_workers);
        let merger = tokio::spawn(MergeAggregator::new().run(partial_rx));

        let split = self.split_and_dispatch(file, partial_tx, progress).await;
        let merged = merger.await?;
        let split = split?;

        debug!(
            chunks = split.chunks,
            partials = merged.partials_merged,
            "pipeline finished"
        );

        let summary = ProcessingSummary::from_table(
            &merged.table,
            split.chunks,
            split.bytes,
            started.elapsed(),
        );
        info!(
            stations = summary.stations,
            records = summary.records,
            elapsed = ?summary.elapsed,
            "parallel aggregation complete"
        );

        Ok(ProcessingOutcome {
            table: merged.table,
            summary,
        })
    }

    /// Read the file into chunks and feed them to the worker pool.
    ///
    /// Owns the pool and the merge sender: both are gone when this returns,
    /// which closes the merge queue.
    async fn split_and_dispatch(
        &self,
        file: File,
        partials: mpsc::Sender<StationTable>,
        progress: Option<&ProgressReporter>,
    ) -> Result<SplitStats> {
        let pool = WorkerPool::spawn(self.config.max_workers, self.config.queue_depth, partials)?;
        let chunks = pool.sender();
        let abort = pool.abort_flag();
        let splitter = ChunkSplitter::new(self.config.chunk_size);
        let progress = progress.cloned();

        let reader = tokio::task::spawn_blocking(move || {
            splitter.split(file, |chunk| {
                if abort.load(Ordering::Acquire) {
                    return ControlFlow::Break(());
                }
                let len = chunk.len() as u64;
                if chunks.send(chunk).is_err() {
                    return ControlFlow::Break(());
                }
                if let Some(ref p) = progress {
                    p.increment(len);
                }
                ControlFlow::Continue(())
            })
        });

        let read = match reader.await {
            Ok(read) => read,
            Err(join_error) => {
                pool.abort();
                let _ = pool.shutdown().await;
                return Err(join_error.into());
            }
        };

        match read {
            Ok(stats) => {
                let processed = pool.shutdown().await?;
                debug!(chunks = stats.chunks, processed, "all workers joined");
                Ok(stats)
            }
            Err(e) => {
                pool.abort();
                // The read error wins over anything the workers report.
                let _ = pool.shutdown().await;
                Err(e)
            }
        }
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::with_config(PipelineConfig::default())
    }
}
