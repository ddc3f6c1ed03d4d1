pub mod chunk;
pub mod stats;
pub mod summary;
pub mod table;

pub use chunk::Chunk;
pub use stats::RunningStats;
pub use summary::{ProcessingOutcome, ProcessingSummary};
pub use table::StationTable;
