/*!
 * Atomic Aggregation
 *
 * Shared counters updated by every worker on every item.
 */

use super::{Aggregator, Stats};
use crate::core::limits::DIGIT_BUCKETS;
use crate::core::types::{digit_bucket, WorkItem};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Global statistics as independent atomic counters
///
/// # Ordering
///
/// Every update is a `Relaxed` fetch-and-add. The counters are independent,
/// so only per-counter atomicity matters; no update needs to be ordered
/// against another. Readers synchronize through thread join before calling
/// `snapshot`.
///
/// The sum is a wrapping low word plus a count of wraps. Each wrap is
/// detected from the value `fetch_add` returned, so the pair recombines to
/// the exact total.
///
/// # Performance
///
/// Roughly five contended RMW operations per item, six on a wrap. The hot
/// counters are shared by all workers, so their cache lines bounce between
/// cores.
#[derive(Debug)]
pub struct AtomicStats {
    primes: AtomicU64,
    nonprimes: AtomicU64,
    sum_low: AtomicI64,
    /// Net wraps of `sum_low`, +1 upward and -1 downward
    sum_carry: AtomicI64,
    consumed: AtomicU64,
    histogram: [AtomicU64; DIGIT_BUCKETS],
}

impl AtomicStats {
    pub fn new() -> Self {
        Self {
            primes: AtomicU64::new(0),
            nonprimes: AtomicU64::new(0),
            sum_low: AtomicI64::new(0),
            sum_carry: AtomicI64::new(0),
            consumed: AtomicU64::new(0),
            histogram: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }
}

impl Default for AtomicStats {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for AtomicStats {
    #[inline]
    fn record(&self, _local: &mut Stats, value: WorkItem, is_prime: bool) {
        self.consumed.fetch_add(1, Ordering::Relaxed);
        if is_prime {
            self.primes.fetch_add(1, Ordering::Relaxed);
        } else {
            self.nonprimes.fetch_add(1, Ordering::Relaxed);
        }
        self.histogram[digit_bucket(value)].fetch_add(1, Ordering::Relaxed);
        let previous = self.sum_low.fetch_add(value, Ordering::Relaxed);
        if previous.overflowing_add(value).1 {
            let carry = if value > 0 { 1 } else { -1 };
            self.sum_carry.fetch_add(carry, Ordering::Relaxed);
        }
    }

    fn finish(&self, _local: Stats) {}

    fn snapshot(&self) -> Stats {
        Stats {
            primes: self.primes.load(Ordering::Relaxed),
            nonprimes: self.nonprimes.load(Ordering::Relaxed),
            sum: (i128::from(self.sum_carry.load(Ordering::Relaxed)) << 64)
                + i128::from(self.sum_low.load(Ordering::Relaxed)),
            consumed: self.consumed.load(Ordering::Relaxed),
            histogram: std::array::from_fn(|i| self.histogram[i].load(Ordering::Relaxed)),
        }
    }

    fn merges(&self) -> usize {
        0
    }

    fn name(&self) -> &'static str {
        "atomic"
    }
}
