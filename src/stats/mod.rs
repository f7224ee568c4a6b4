/*!
 * Statistics and Aggregation
 *
 * `Stats` is the shape of both per-worker and global statistics.
 * An `Aggregator` decides how per-item observations reach the global copy:
 * - **Atomic**: every observation goes straight to shared atomic counters
 * - **Merge**: observations stay in worker-local `Stats`, folded in once per
 *   worker under a lock
 */

mod aggregator;
mod atomic;
mod merge;

pub use aggregator::{AggregationStrategy, Aggregator};
pub use atomic::AtomicStats;
pub use merge::MergedStats;

use crate::core::limits::DIGIT_BUCKETS;
use crate::core::types::{digit_bucket, WorkItem};
use serde::{Deserialize, Serialize};

/// Prime/non-prime counts, value sum and last-digit histogram
///
/// `sum` is exact: an `i128` cannot overflow while adding fewer than 2^64
/// `i64` values, so the mean is always the mean of what was consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub primes: u64,
    pub nonprimes: u64,
    pub sum: i128,
    pub consumed: u64,
    pub histogram: [u64; DIGIT_BUCKETS],
}

impl Stats {
    /// Record one classified item
    #[inline]
    pub fn record(&mut self, value: WorkItem, is_prime: bool) {
        if is_prime {
            self.primes += 1;
        } else {
            self.nonprimes += 1;
        }
        self.sum += i128::from(value);
        self.histogram[digit_bucket(value)] += 1;
        self.consumed += 1;
    }

    /// Fold another set of statistics into this one, field by field
    pub fn merge(&mut self, other: &Stats) {
        self.primes += other.primes;
        self.nonprimes += other.nonprimes;
        self.sum += other.sum;
        self.consumed += other.consumed;
        for (bucket, count) in self.histogram.iter_mut().zip(other.histogram.iter()) {
            *bucket += count;
        }
    }

    /// Arithmetic mean of consumed values, `None` when nothing was consumed
    pub fn mean(&self) -> Option<f64> {
        if self.consumed == 0 {
            None
        } else {
            Some(self.sum as f64 / self.consumed as f64)
        }
    }

    /// Total count across all histogram buckets
    pub fn histogram_total(&self) -> u64 {
        self.histogram.iter().sum()
    }

    /// Whether classification and histogram counts both add up to `consumed`
    pub fn is_balanced(&self) -> bool {
        self.primes + self.nonprimes == self.consumed && self.histogram_total() == self.consumed
    }
}

impl FromIterator<(WorkItem, bool)> for Stats {
    fn from_iter<I: IntoIterator<Item = (WorkItem, bool)>>(iter: I) -> Self {
        let mut stats = Stats::default();
        for (value, is_prime) in iter {
            stats.record(value, is_prime);
        }
        stats
    }
}
