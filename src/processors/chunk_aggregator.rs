use crate::error::Result;
use crate::models::{Chunk, StationTable};
use crate::readers::RecordTokenizer;
use crate::utils::constants::DEFAULT_TABLE_CAPACITY;

/// Builds the partial table for one chunk.
pub struct ChunkAggregator {
    table_capacity: usize,
}

impl ChunkAggregator {
    pub fn new() -> Self {
        Self {
            table_capacity: DEFAULT_TABLE_CAPACITY,
        }
    }

    pub fn with_table_capacity(table_capacity: usize) -> Self {
        Self { table_capacity }
    }

    pub fn aggregate_chunk(&self, chunk: &Chunk) -> Result<StationTable> {
        self.aggregate(&chunk.data, chunk.offset)
    }

    /// Aggregate every record in `data`, stopping at the first malformed value.
    /// `offset` is the position of `data` in the input file.
    pub fn aggregate(&self, data: &[u8], offset: u64) -> Result<StationTable> {
        let mut table = StationTable::with_capacity(self.table_capacity);
        self.aggregate_into(&mut table, data, offset)?;
        Ok(table)
    }

    /// Like [`aggregate`](Self::aggregate) but folds into an existing table.
    pub fn aggregate_into(&self, table: &mut StationTable, data: &[u8], offset: u64) -> Result<()> {
        for record in RecordTokenizer::with_offset(data, offset) {
            let (station, value) = record?;
            table.record(station, value);
        }
        Ok(())
    }
}

impl Default for ChunkAggregator {
    fn default() -> Self {
        Self::new()
    }
}
