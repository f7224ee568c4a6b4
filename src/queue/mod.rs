/*!
 * Concurrent Work Queues
 *
 * Unbounded FIFO queues with a termination protocol, in interchangeable
 * synchronization disciplines:
 * - **Spin**: `VecDeque` behind a test-and-set spin lock, out-of-band closed latch
 * - **LockFree**: CAS-based segment queue, out-of-band closed latch
 * - **Blocking**: `VecDeque` behind a mutex plus condvar, in-band end marker
 *
 * # Contract
 *
 * - `push` never blocks beyond the internal critical section
 * - `wait_pop` is the only suspension point; it returns `None` exactly when
 *   the queue is closed and every item pushed before `close` has been taken
 * - `close` is idempotent
 * - `len` / `is_empty` / `is_closed` are advisory snapshots, stale by the
 *   time the caller acts on them under concurrency
 *
 * Pushing after `close` breaks the contract: the item is accepted but a
 * consumer that already saw end-of-stream will never take it.
 */

mod blocking;
mod lockfree;
mod spin;

pub use blocking::BlockingQueue;
pub use lockfree::LockFreeQueue;
pub use spin::SpinQueue;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Thread-safe FIFO with a close signal
///
/// Implementations are constructed through `Default` so the pipeline can
/// build one shard per worker without knowing the discipline.
pub trait WorkQueue<T: Send>: Default + Send + Sync {
    /// Append an item; always succeeds
    fn push(&self, item: T);

    /// Take the oldest item if one is present, without waiting
    fn try_pop(&self) -> Option<T>;

    /// Take the oldest item, waiting for one if necessary
    ///
    /// Returns `None` once the queue is closed and drained.
    fn wait_pop(&self) -> Option<T>;

    /// Signal that no further pushes will occur
    fn close(&self);

    /// Advisory: whether `close` has been called
    fn is_closed(&self) -> bool;

    /// Advisory: number of items currently queued
    fn len(&self) -> usize;

    /// Advisory: whether no items are currently queued
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discipline name for logs and reports
    fn name(&self) -> &'static str;
}

/// How a queue waits and how it signals termination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discipline {
    /// Consumers poll and yield; termination travels on a separate latch
    BusyWait,
    /// Consumers sleep on a condvar; termination travels in the queue itself
    Blocking,
}

impl Discipline {
    pub const fn as_str(self) -> &'static str {
        match self {
            Discipline::BusyWait => "busy-wait",
            Discipline::Blocking => "blocking",
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Queue implementation selection
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum QueueKind {
    /// Spin-locked deque with closed latch
    Spin,
    /// Lock-free segment queue with closed latch
    LockFree,
    /// Mutex and condvar with tagged end marker
    Blocking,
}

impl QueueKind {
    /// Every queue kind, in report order
    pub const ALL: [QueueKind; 3] = [QueueKind::Spin, QueueKind::LockFree, QueueKind::Blocking];

    /// Synchronization discipline this kind belongs to
    pub const fn discipline(self) -> Discipline {
        match self {
            QueueKind::Spin | QueueKind::LockFree => Discipline::BusyWait,
            QueueKind::Blocking => Discipline::Blocking,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            QueueKind::Spin => "spin",
            QueueKind::LockFree => "lock-free",
            QueueKind::Blocking => "blocking",
        }
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
