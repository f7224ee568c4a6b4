/*!
 * Synchronization Primitives
 *
 * Low-level building blocks for the busy-wait queue discipline:
 * - Test-and-set spin lock with RAII guard
 * - One-way latch for out-of-band termination signals
 *
 * # Memory Ordering
 *
 * Both primitives publish with `Release` and observe with `Acquire`, so any
 * write made before unlocking (or before setting the latch) is visible to the
 * thread that next locks (or observes the latch as set).
 */

mod latch;
mod spinlock;

pub use latch::Latch;
pub use spinlock::{SpinGuard, SpinLock};
