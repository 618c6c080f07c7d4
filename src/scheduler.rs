//! Chunked cooperative iteration.
//!
//! Long passes are split into fixed-size chunks. Each chunk runs
//! synchronously; between chunks the task yields to the runtime so other
//! work on the same thread (input handling, other series) can run. The only
//! suspension point is the chunk boundary.
//!
//! Cancellation is generation based: every pass takes a [`CancelToken`] from
//! its series' [`Generation`]. Starting a newer pass advances the generation,
//! and the older pass notices at its next chunk boundary and stops without
//! touching shared state again.

use crate::error::Result;
use std::cell::Cell;
use std::rc::Rc;
use tracing::trace;

/// Monotonic pass counter owned by a series.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    current: Rc<Cell<u64>>,
}

impl Generation {
    /// Create a counter at generation zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, invalidating every token handed out before.
    #[must_use]
    pub fn advance(&self) -> CancelToken {
        let generation = self.current.get() + 1;
        self.current.set(generation);
        CancelToken {
            generation,
            current: Rc::clone(&self.current),
        }
    }

    /// The latest generation.
    #[must_use]
    pub fn current(&self) -> u64 {
        self.current.get()
    }
}

/// Handle telling a pass whether it is still the latest one.
#[derive(Debug, Clone)]
pub struct CancelToken {
    generation: u64,
    current: Rc<Cell<u64>>,
}

impl CancelToken {
    /// Generation this token was issued for.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a newer generation has started.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.current.get() != self.generation
    }
}

/// Counters describing an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChunkStats {
    /// Items handed to the worker.
    pub items: usize,
    /// Chunks fully processed.
    pub chunks: usize,
    /// Times control was yielded between chunks.
    pub yields: usize,
}

/// How an iteration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// Every item was visited.
    Completed(ChunkStats),
    /// A newer generation started; remaining chunks were skipped.
    Cancelled(ChunkStats),
}

impl ChunkOutcome {
    /// Counters regardless of outcome.
    #[must_use]
    pub const fn stats(&self) -> ChunkStats {
        match self {
            Self::Completed(stats) | Self::Cancelled(stats) => *stats,
        }
    }
}

/// Visit `items` in order, `chunk_size` at a time, yielding between chunks.
///
/// The worker receives each item's position and value. A worker error stops
/// the iteration immediately; items after the failing one are not visited.
/// A `chunk_size` of zero is treated as one.
///
/// # Errors
///
/// Returns the first error produced by `worker`.
pub async fn each_chunked<T, F>(
    items: &[T],
    chunk_size: usize,
    token: &CancelToken,
    mut worker: F,
) -> Result<ChunkOutcome>
where
    F: FnMut(usize, &T) -> Result<()>,
{
    let chunk_size = chunk_size.max(1);
    let mut stats = ChunkStats::default();

    for (n, chunk) in items.chunks(chunk_size).enumerate() {
        if n > 0 {
            stats.yields += 1;
            tokio::task::yield_now().await;
        }
        if token.is_cancelled() {
            trace!(generation = token.generation(), chunk = n, "chunk loop cancelled");
            return Ok(ChunkOutcome::Cancelled(stats));
        }

        let offset = n * chunk_size;
        for (k, item) in chunk.iter().enumerate() {
            worker(offset + k, item)?;
        }

        stats.items += chunk.len();
        stats.chunks += 1;
        trace!(
            generation = token.generation(),
            offset,
            len = chunk.len(),
            "chunk processed"
        );
    }

    Ok(ChunkOutcome::Completed(stats))
}
