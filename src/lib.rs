pub mod cli;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use error::{ProcessingError, Result};
pub use models::{ProcessingOutcome, RunningStats, StationTable};
pub use processors::{process_file, PipelineConfig, Strategy};
pub use writers::format_report;
