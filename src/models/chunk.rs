/// A newline-aligned slice of the input file, copied out of the reader's buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position in source order, starting at 0
    pub index: u64,
    /// Byte offset of `data[0]` within the input file
    pub offset: u64,
    pub data: Vec<u8>,
}

impl Chunk {
    pub fn new(index: u64, offset: u64, data: Vec<u8>) -> Self {
        Self {
            index,
            offset,
            data,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Offset one past the last byte of this chunk.
    pub fn end_offset(&self) -> u64 {
        self.offset + self.data.len() as u64
    }
}
