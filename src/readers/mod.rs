pub mod chunk_splitter;
pub mod tokenizer;

pub use chunk_splitter::{split_ranges, ChunkSplitter, SplitStats};
pub use tokenizer::{parse_value, RecordTokenizer};
