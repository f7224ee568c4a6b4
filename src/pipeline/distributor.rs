/*!
 * Work Distributor
 *
 * The single producer: reads the source once and fans items out across the
 * shards, then closes every shard.
 */

use super::guard::CloseOnDrop;
use super::shard::ShardPolicy;
use crate::core::errors::SourceError;
use crate::core::types::WorkItem;
use crate::queue::WorkQueue;
use crate::source::NumberSource;
use std::time::Instant;
use tracing::debug;

/// Fans a number source out over a fixed set of shards
///
/// # Termination
///
/// Every shard is closed exactly once when `run` returns, including on a
/// source error or a panic. All pushes to a shard happen before its close,
/// so a worker can never see end-of-stream ahead of its last item.
pub struct Distributor<'a, Q> {
    queues: &'a [Q],
    policy: &'a dyn ShardPolicy,
}

impl<'a, Q: WorkQueue<WorkItem>> Distributor<'a, Q> {
    /// # Panics
    ///
    /// Debug builds panic if `queues` is empty; there would be no shard to
    /// route to.
    pub fn new(queues: &'a [Q], policy: &'a dyn ShardPolicy) -> Self {
        debug_assert!(!queues.is_empty(), "distributor needs at least one shard");
        Self { queues, policy }
    }

    /// Drain `source` into the shards and close them
    ///
    /// Returns the number of items pushed.
    pub fn run<S: NumberSource + ?Sized>(&self, source: &mut S) -> Result<u64, SourceError> {
        let start = Instant::now();
        let closer = CloseOnDrop::new(self.queues);
        let shards = self.queues.len();
        let mut produced: u64 = 0;
        debug!(shards, policy = self.policy.name(), "Distributor started");

        while let Some(value) = source.next_value()? {
            let shard = self.policy.shard(produced, shards);
            self.queues[shard].push(value);
            produced += 1;
        }
        drop(closer);

        debug!(
            produced,
            shards,
            policy = self.policy.name(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Distributor finished"
        );
        Ok(produced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::shard::RoundRobin;
    use crate::queue::{BlockingQueue, LockFreeQueue};
    use crate::source::IterSource;

    fn drain<Q: WorkQueue<WorkItem>>(queue: &Q) -> Vec<WorkItem> {
        std::iter::from_fn(|| queue.wait_pop()).collect()
    }

    #[test]
    fn test_round_robin_fan_out() {
        let queues: Vec<BlockingQueue<WorkItem>> = (0..3).map(|_| BlockingQueue::new()).collect();
        let distributor = Distributor::new(&queues, &RoundRobin);

        let produced = distributor
            .run(&mut IterSource::from(1..=7))
            .unwrap();

        assert_eq!(produced, 7);
        assert_eq!(drain(&queues[0]), vec![1, 4, 7]);
        assert_eq!(drain(&queues[1]), vec![2, 5]);
        assert_eq!(drain(&queues[2]), vec![3, 6]);
    }

    #[test]
    fn test_empty_source_closes_all() {
        let queues: Vec<LockFreeQueue<WorkItem>> = (0..4).map(|_| LockFreeQueue::new()).collect();
        let distributor = Distributor::new(&queues, &RoundRobin);

        assert_eq!(distributor.run(&mut IterSource::from(std::iter::empty())).unwrap(), 0);
        assert!(queues.iter().all(|q| q.is_closed() && q.is_empty()));
    }

    struct FailingSource {
        remaining: u32,
    }

    impl NumberSource for FailingSource {
        fn next_value(&mut self) -> Result<Option<WorkItem>, SourceError> {
            if self.remaining == 0 {
                return Err(SourceError::InvalidToken {
                    token: "oops".into(),
                    position: 3,
                });
            }
            self.remaining -= 1;
            Ok(Some(i64::from(self.remaining)))
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "at least one shard")]
    fn test_rejects_empty_shard_set() {
        let queues: Vec<BlockingQueue<WorkItem>> = Vec::new();
        let _ = Distributor::new(&queues, &RoundRobin);
    }

    #[test]
    fn test_source_error_still_closes() {
        let queues: Vec<BlockingQueue<WorkItem>> = (0..2).map(|_| BlockingQueue::new()).collect();
        let distributor = Distributor::new(&queues, &RoundRobin);

        let result = distributor.run(&mut FailingSource { remaining: 2 });

        assert!(matches!(result, Err(SourceError::InvalidToken { .. })));
        assert_eq!(drain(&queues[0]), vec![1]);
        assert_eq!(drain(&queues[1]), vec![0]);
    }
}
