use crate::error::{ProcessingError, Result};
use crate::models::{Chunk, StationTable};
use crate::processors::ChunkAggregator;
use crossbeam::channel::{self, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Fixed set of worker threads pulling chunks from a bounded queue.
///
/// Each worker turns a chunk into a partial table and forwards it to the merge
/// queue. Workers are dedicated OS threads rather than runtime blocking tasks,
/// so any worker count leaves the runtime free to schedule the reader.
/// The pool holds the only chunk sender and a clone of the merge sender per
/// worker, so the merge queue closes exactly when the last worker has returned.
pub struct WorkerPool {
    chunks: Sender<Chunk>,
    workers: Vec<JoinHandle<Result<u64>>>,
    abort: Arc<AtomicBool>,
}

impl WorkerPool {
    /// Spawn `max_workers` workers behind a chunk queue of `queue_depth` slots.
    ///
    /// Takes `partials` by value: once the pool is dropped or shut down, no
    /// sender to the merge queue survives. Fails if the OS refuses a thread;
    /// workers already started then see a closed queue and exit.
    pub fn spawn(
        max_workers: usize,
        queue_depth: usize,
        partials: mpsc::Sender<StationTable>,
    ) -> Result<Self> {
        let (chunk_tx, chunk_rx) = channel::bounded::<Chunk>(queue_depth);
        let abort = Arc::new(AtomicBool::new(false));
        let mut workers = Vec::with_capacity(max_workers);

        for worker_id in 0..max_workers {
            let chunks = chunk_rx.clone();
            let partials = partials.clone();
            let abort = Arc::clone(&abort);
            let handle = thread::Builder::new()
                .name(format!("brc-worker-{}", worker_id))
                .spawn(move || run_worker(worker_id, chunks, partials, abort))?;
            workers.push(handle);
        }

        Ok(Self {
            chunks: chunk_tx,
            workers,
            abort,
        })
    }

    /// Handle the reader uses to enqueue chunks. Sending blocks while the queue is full.
    pub fn sender(&self) -> Sender<Chunk> {
        self.chunks.clone()
    }

    /// Flag raised when any worker fails. The reader polls it to stop early.
    pub fn abort_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.abort)
    }

    /// Ask the workers to drop any queued chunks instead of parsing them.
    pub fn abort(&self) {
        self.abort.store(true, Ordering::Release);
    }

    /// Close the chunk queue and wait for every worker.
    ///
    /// Returns the number of chunks processed, or the first worker error.
    pub async fn shutdown(self) -> Result<u64> {
        let Self {
            chunks,
            workers,
            abort: _,
        } = self;
        drop(chunks);

        tokio::task::spawn_blocking(move || join_workers(workers)).await?
    }
}

fn join_workers(workers: Vec<JoinHandle<Result<u64>>>) -> Result<u64> {
    let mut processed = 0u64;
    let mut first_error = None;

    for handle in workers {
        let joined = handle.join().unwrap_or_else(|_| {
            Err(ProcessingError::Pipeline(
                "worker thread panicked".to_string(),
            ))
        });
        match joined {
            Ok(count) => processed += count,
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(processed),
    }
}

fn run_worker(
    worker_id: usize,
    chunks: Receiver<Chunk>,
    partials: mpsc::Sender<StationTable>,
    abort: Arc<AtomicBool>,
) -> Result<u64> {
    let aggregator = ChunkAggregator::new();
    let mut processed = 0u64;

    for chunk in chunks.iter() {
        if abort.load(Ordering::Acquire) {
            break;
        }
        if chunk.is_empty() {
            continue;
        }

        let table = match aggregator.aggregate_chunk(&chunk) {
            Ok(table) => table,
            Err(e) => {
                warn!(worker_id, chunk = chunk.index, error = %e, "worker failed");
                abort.store(true, Ordering::Release);
                return Err(e);
            }
        };

        if partials.blocking_send(table).is_err() {
            abort.store(true, Ordering::Release);
            return Err(ProcessingError::Pipeline(
                "merge aggregator stopped before all chunks were merged".to_string(),
            ));
        }
        processed += 1;
    }

    debug!(worker_id, processed, "worker finished");
    Ok(processed)
}
