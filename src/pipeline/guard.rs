/*!
 * Close-On-Drop Guard
 *
 * RAII guard that closes a set of shards when it goes out of scope,
 * unwinding included. Workers always receive end-of-stream even if the
 * producer side fails.
 */

use crate::core::types::WorkItem;
use crate::queue::WorkQueue;

/// Closes every queue in the slice on drop
pub struct CloseOnDrop<'a, Q: WorkQueue<WorkItem>> {
    queues: &'a [Q],
}

impl<'a, Q: WorkQueue<WorkItem>> CloseOnDrop<'a, Q> {
    pub fn new(queues: &'a [Q]) -> Self {
        Self { queues }
    }
}

impl<Q: WorkQueue<WorkItem>> Drop for CloseOnDrop<'_, Q> {
    fn drop(&mut self) {
        for queue in self.queues {
            queue.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::{BlockingQueue, SpinQueue};

    #[test]
    fn test_closes_on_scope_exit() {
        let queues: Vec<SpinQueue<WorkItem>> = (0..3).map(|_| SpinQueue::new()).collect();
        {
            let _guard = CloseOnDrop::new(&queues);
            assert!(queues.iter().all(|q| !q.is_closed()));
        }
        assert!(queues.iter().all(|q| q.is_closed()));
    }

    #[test]
    fn test_closes_on_unwind() {
        let queues: Vec<BlockingQueue<WorkItem>> = (0..2).map(|_| BlockingQueue::new()).collect();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = CloseOnDrop::new(&queues);
            panic!("producer failed");
        }));

        assert!(result.is_err());
        assert!(queues.iter().all(|q| q.wait_pop().is_none()));
    }
}
