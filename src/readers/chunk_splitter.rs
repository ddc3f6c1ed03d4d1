use crate::error::Result;
use crate::models::Chunk;
use crate::utils::constants::{DEFAULT_CHUNK_SIZE, LINE_TERMINATOR};
use std::io::{ErrorKind, Read};
use std::ops::{ControlFlow, Range};
use tracing::{debug, trace};

/// Counters for one pass of the splitter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitStats {
    pub chunks: u64,
    pub bytes: u64,
    /// Set when the consumer asked the splitter to stop before EOF
    pub stopped_early: bool,
}

/// Cuts a byte stream into newline-aligned chunks.
///
/// The stream is read sequentially into one reusable buffer. Each time the
/// buffer fills, everything up to and including the last `\n` is copied out
/// as a chunk and the tail is carried to the front for the next read. A line
/// longer than the buffer grows the buffer. At EOF the remaining bytes are
/// emitted as a final chunk even without a trailing terminator.
pub struct ChunkSplitter {
    chunk_size: usize,
}

impl ChunkSplitter {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Read `source` to the end, handing every chunk to `emit` in source order.
    ///
    /// `emit` returning `ControlFlow::Break` stops the pass early; the result
    /// then has `stopped_early` set.
    pub fn split<R, F>(&self, mut source: R, mut emit: F) -> Result<SplitStats>
    where
        R: Read,
        F: FnMut(Chunk) -> ControlFlow<()>,
    {
        let mut buffer = vec![0u8; self.chunk_size];
        let mut carried = 0usize;
        let mut offset = 0u64;
        let mut stats = SplitStats::default();

        loop {
            let (read, eof) = fill_buffer(&mut source, &mut buffer[carried..])?;
            let filled = carried + read;

            if eof {
                if filled > 0 {
                    let chunk = Chunk::new(stats.chunks, offset, buffer[..filled].to_vec());
                    stats.chunks += 1;
                    stats.bytes += filled as u64;
                    if emit(chunk).is_break() {
                        stats.stopped_early = true;
                    }
                }
                break;
            }

            // Only the fresh bytes can hold a terminator; the carried tail has none.
            match buffer[carried..filled]
                .iter()
                .rposition(|&b| b == LINE_TERMINATOR)
            {
                Some(pos) => {
                    let cut = carried + pos + 1;
                    let chunk = Chunk::new(stats.chunks, offset, buffer[..cut].to_vec());
                    trace!(index = chunk.index, offset, len = cut, "chunk cut");

                    stats.chunks += 1;
                    stats.bytes += cut as u64;
                    offset += cut as u64;

                    if emit(chunk).is_break() {
                        stats.stopped_early = true;
                        break;
                    }

                    buffer.copy_within(cut..filled, 0);
                    carried = filled - cut;
                }
                None => {
                    let grown = buffer.len() * 2;
                    debug!(
                        from = buffer.len(),
                        to = grown,
                        "no line terminator in a full buffer, growing"
                    );
                    buffer.resize(grown, 0);
                    carried = filled;
                }
            }
        }

        Ok(stats)
    }
}

impl Default for ChunkSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

/// Read until `dst` is full or the source is exhausted. Returns the byte
/// count and whether EOF was reached.
fn fill_buffer<R: Read>(source: &mut R, dst: &mut [u8]) -> Result<(usize, bool)> {
    let mut total = 0;
    while total < dst.len() {
        match source.read(&mut dst[total..]) {
            Ok(0) => return Ok((total, true)),
            Ok(n) => total += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok((total, false))
}

/// Newline-aligned ranges of roughly `target` bytes over an in-memory buffer.
///
/// Every range except possibly the last ends just after a `\n`; together they
/// cover `data` exactly.
pub fn split_ranges(data: &[u8], target: usize) -> Vec<Range<usize>> {
    let target = target.max(1);
    let mut ranges = Vec::with_capacity(data.len() / target + 1);
    let mut start = 0;

    while start < data.len() {
        let tentative = (start + target).min(data.len());
        let end = match data[tentative - 1..]
            .iter()
            .position(|&b| b == LINE_TERMINATOR)
        {
            Some(pos) => tentative + pos,
            None => data.len(),
        };
        ranges.push(start..end);
        start = end;
    }

    ranges
}
