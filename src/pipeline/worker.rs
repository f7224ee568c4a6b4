/*!
 * Worker
 *
 * Drains one shard, classifying each item and reporting it to the
 * aggregator.
 */

use crate::core::types::{WorkItem, WorkerId};
use crate::queue::WorkQueue;
use crate::stats::{Aggregator, Stats};
use serde::{Serialize, Serializer};
use std::time::{Duration, Instant};
use tracing::debug;

/// What a single worker did during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    pub id: WorkerId,
    /// Items taken from this worker's shard
    pub consumed: u64,
    pub primes: u64,
    pub nonprimes: u64,
    #[serde(rename = "elapsed_us", serialize_with = "serialize_micros")]
    pub elapsed: Duration,
}

impl WorkerReport {
    /// Whether this worker's classifications add up to what it consumed
    pub fn is_balanced(&self) -> bool {
        self.primes + self.nonprimes == self.consumed
    }
}

pub(crate) fn serialize_micros<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_micros() as u64)
}

/// Consumer bound to exactly one shard
pub struct Worker<'a, Q, F: ?Sized> {
    id: WorkerId,
    queue: &'a Q,
    classify: &'a F,
    aggregator: &'a dyn Aggregator,
}

impl<'a, Q, F> Worker<'a, Q, F>
where
    Q: WorkQueue<WorkItem>,
    F: Fn(WorkItem) -> bool + ?Sized,
{
    pub fn new(
        id: WorkerId,
        queue: &'a Q,
        classify: &'a F,
        aggregator: &'a dyn Aggregator,
    ) -> Self {
        Self {
            id,
            queue,
            classify,
            aggregator,
        }
    }

    /// Consume until end-of-stream, then hand local totals to the aggregator
    pub fn run(self) -> WorkerReport {
        let start = Instant::now();
        debug!(worker = self.id, "Worker started");
        let mut local = Stats::default();
        let mut consumed: u64 = 0;
        let mut primes: u64 = 0;
        let mut nonprimes: u64 = 0;

        while let Some(value) = self.queue.wait_pop() {
            let is_prime = (self.classify)(value);
            self.aggregator.record(&mut local, value, is_prime);
            if is_prime {
                primes += 1;
            } else {
                nonprimes += 1;
            }
            consumed += 1;
        }
        self.aggregator.finish(local);

        let elapsed = start.elapsed();
        debug!(
            worker = self.id,
            consumed,
            primes,
            elapsed_us = elapsed.as_micros() as u64,
            "Worker finished"
        );

        WorkerReport {
            id: self.id,
            consumed,
            primes,
            nonprimes,
            elapsed,
        }
    }
}
