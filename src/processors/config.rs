use crate::error::{ProcessingError, Result};
use crate::utils::constants::{DEFAULT_CHUNK_SIZE, QUEUE_DEPTH_PER_WORKER};

/// Tuning knobs shared by every processing strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub max_workers: usize,
    pub chunk_size: usize,
    /// Chunks allowed to wait for a worker before the reader blocks
    pub queue_depth: usize,
}

impl PipelineConfig {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers,
            chunk_size: DEFAULT_CHUNK_SIZE,
            queue_depth: max_workers * QUEUE_DEPTH_PER_WORKER,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_queue_depth(mut self, queue_depth: usize) -> Self {
        self.queue_depth = queue_depth;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(ProcessingError::Config(
                "max_workers must be at least 1".to_string(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(ProcessingError::Config(
                "chunk_size must be at least 1 byte".to_string(),
            ));
        }
        if self.queue_depth == 0 {
            return Err(ProcessingError::Config(
                "queue_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
