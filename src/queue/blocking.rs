/*!
 * Blocking Queue
 *
 * Mutex plus condition variable. Consumers sleep instead of polling, and
 * termination travels in-band as a tagged end marker queued behind the last
 * real item.
 */

use super::WorkQueue;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

/// Queue entry: a data item or the end-of-stream marker
///
/// The marker is its own variant rather than a reserved data value, so every
/// `T` (including `-1`) remains valid data.
#[derive(Debug)]
enum Slot<T> {
    Item(T),
    End,
}

struct State<T> {
    slots: VecDeque<Slot<T>>,
    closed: bool,
}

impl<T> State<T> {
    /// Pop the front slot only if it holds data; the end marker stays put
    fn take_item(&mut self) -> Option<T> {
        if matches!(self.slots.front(), Some(Slot::Item(_))) {
            if let Some(Slot::Item(item)) = self.slots.pop_front() {
                return Some(item);
            }
        }
        None
    }
}

/// Unbounded FIFO that parks waiting consumers
///
/// # Termination
///
/// `close` appends a single `Slot::End`. Reaching it means every item pushed
/// before the close has been taken. The marker is never popped, so every
/// later `wait_pop` (from any consumer) also sees end-of-stream instead of
/// blocking forever.
pub struct BlockingQueue<T> {
    state: Mutex<State<T>>,
    available: Condvar,
}

impl<T> BlockingQueue<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                slots: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> WorkQueue<T> for BlockingQueue<T> {
    fn push(&self, item: T) {
        let mut state = self.state.lock();
        if state.closed {
            // Keep the marker last so a late item is not stranded behind it
            let end = state.slots.len() - 1;
            state.slots.insert(end, Slot::Item(item));
        } else {
            state.slots.push_back(Slot::Item(item));
        }
        drop(state);
        self.available.notify_one();
    }

    fn try_pop(&self) -> Option<T> {
        self.state.lock().take_item()
    }

    fn wait_pop(&self) -> Option<T> {
        let mut state = self.state.lock();
        loop {
            match state.slots.front() {
                Some(Slot::End) => return None,
                Some(Slot::Item(_)) => return state.take_item(),
                None => self.available.wait(&mut state),
            }
        }
    }

    fn close(&self) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        state.slots.push_back(Slot::End);
        drop(state);
        self.available.notify_all();
    }

    fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn len(&self) -> usize {
        let state = self.state.lock();
        state.slots.len() - usize::from(state.closed)
    }

    fn name(&self) -> &'static str {
        "blocking"
    }
}
