/*!
 * Spin-Locked Queue
 *
 * Busy-wait discipline: every mutation runs under a test-and-set spin lock,
 * and termination is signaled out-of-band through a closed latch.
 */

use super::WorkQueue;
use crate::core::sync::{Latch, SpinLock};
use std::collections::VecDeque;
use std::thread;

/// Unbounded FIFO guarded by a spin lock
///
/// # Termination
///
/// The producer pushes everything, then sets `closed` with release ordering.
/// `wait_pop` polls; when a pop fails it loads `closed` with acquire
/// ordering. Seeing the latch set guarantees every earlier push is visible,
/// so one more pop either returns the last straggler or proves the queue is
/// drained.
pub struct SpinQueue<T> {
    items: SpinLock<VecDeque<T>>,
    closed: Latch,
}

impl<T> SpinQueue<T> {
    pub fn new() -> Self {
        Self {
            items: SpinLock::new(VecDeque::new()),
            closed: Latch::new(),
        }
    }
}

impl<T> Default for SpinQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> WorkQueue<T> for SpinQueue<T> {
    #[inline]
    fn push(&self, item: T) {
        self.items.lock().push_back(item);
    }

    #[inline]
    fn try_pop(&self) -> Option<T> {
        self.items.lock().pop_front()
    }

    fn wait_pop(&self) -> Option<T> {
        loop {
            if let Some(item) = self.try_pop() {
                return Some(item);
            }
            if self.closed.is_set() {
                // A push may have landed between the failed pop and the latch load
                return self.try_pop();
            }
            thread::yield_now();
        }
    }

    fn close(&self) {
        self.closed.set();
    }

    fn is_closed(&self) -> bool {
        self.closed.is_set()
    }

    fn len(&self) -> usize {
        self.items.lock().len()
    }

    fn name(&self) -> &'static str {
        "spin"
    }
}
