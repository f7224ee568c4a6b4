/*!
 * Lock-Free Queue
 *
 * Busy-wait discipline on a genuinely lock-free structure: a linked list of
 * array segments advanced with compare-and-swap (`crossbeam_queue::SegQueue`).
 * Termination uses the same out-of-band latch as `SpinQueue`.
 */

use super::WorkQueue;
use crate::core::sync::Latch;
use crossbeam_queue::SegQueue;
use std::thread;

/// Unbounded lock-free FIFO with a closed latch
pub struct LockFreeQueue<T> {
    items: SegQueue<T>,
    closed: Latch,
}

impl<T> LockFreeQueue<T> {
    pub fn new() -> Self {
        Self {
            items: SegQueue::new(),
            closed: Latch::new(),
        }
    }
}

impl<T> Default for LockFreeQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> WorkQueue<T> for LockFreeQueue<T> {
    #[inline]
    fn push(&self, item: T) {
        self.items.push(item);
    }

    #[inline]
    fn try_pop(&self) -> Option<T> {
        self.items.pop()
    }

    fn wait_pop(&self) -> Option<T> {
        loop {
            if let Some(item) = self.items.pop() {
                return Some(item);
            }
            if self.closed.is_set() {
                return self.items.pop();
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
        self.items.len()
    }

    fn name(&self) -> &'static str {
        "lock-free"
    }
}
