pub mod chunk_aggregator;
pub mod config;
pub mod mapped_processor;
pub mod merge_aggregator;
pub mod parallel_processor;
pub mod sequential_processor;
pub mod worker_pool;

pub use chunk_aggregator::ChunkAggregator;
pub use config::PipelineConfig;
pub use mapped_processor::MappedProcessor;
pub use merge_aggregator::{MergeAggregator, MergeOutcome};
pub use parallel_processor::ParallelProcessor;
pub use sequential_processor::SequentialProcessor;
pub use worker_pool::WorkerPool;

use crate::error::Result;
use crate::models::ProcessingOutcome;
use crate::utils::progress::ProgressReporter;
use clap::ValueEnum;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Sequential reader, bounded worker pool, single merge task
    Pipeline,
    /// Memory-mapped input folded on a rayon pool
    Mapped,
    /// Single-threaded baseline
    Sequential,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Strategy::Pipeline => "pipeline",
            Strategy::Mapped => "mapped",
            Strategy::Sequential => "sequential",
        };
        write!(f, "{}", name)
    }
}

/// Aggregate `path` with the chosen strategy.
///
/// The blocking strategies run on tokio's blocking pool so the caller's
/// runtime stays responsive.
pub async fn process_file(
    strategy: Strategy,
    path: &Path,
    config: &PipelineConfig,
    progress: Option<&ProgressReporter>,
) -> Result<ProcessingOutcome> {
    match strategy {
        Strategy::Pipeline => {
            ParallelProcessor::with_config(config.clone())
                .process_file(path, progress)
                .await
        }
        Strategy::Mapped => {
            let processor = MappedProcessor::new(config.clone());
            let path = path.to_path_buf();
            let progress = progress.cloned();
            tokio::task::spawn_blocking(move || processor.process_file(&path, progress.as_ref()))
                .await?
        }
        Strategy::Sequential => {
            let processor = SequentialProcessor::new(config.chunk_size);
            let path = path.to_path_buf();
            let progress = progress.cloned();
            tokio::task::spawn_blocking(move || processor.process_file(&path, progress.as_ref()))
                .await?
        }
    }
}
