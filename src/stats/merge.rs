/*!
 * Local-Then-Merge Aggregation
 *
 * Workers accumulate privately and fold their totals into shared state once.
 */

use super::{Aggregator, Stats};
use crate::core::types::WorkItem;
use parking_lot::Mutex;
use tracing::trace;

#[derive(Debug, Default)]
struct MergeState {
    totals: Stats,
    merges: usize,
}

/// Global statistics behind a single lock
///
/// `record` never touches shared state. `finish` takes the lock exactly once
/// per worker, so a run with N workers performs exactly N acquisitions no
/// matter how many items flow through it.
#[derive(Debug, Default)]
pub struct MergedStats {
    state: Mutex<MergeState>,
}

impl MergedStats {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Aggregator for MergedStats {
    #[inline]
    fn record(&self, local: &mut Stats, value: WorkItem, is_prime: bool) {
        local.record(value, is_prime);
    }

    fn finish(&self, local: Stats) {
        let mut state = self.state.lock();
        state.totals.merge(&local);
        state.merges += 1;
        trace!(consumed = local.consumed, merges = state.merges, "Merged worker totals");
    }

    fn snapshot(&self) -> Stats {
        self.state.lock().totals
    }

    fn merges(&self) -> usize {
        self.state.lock().merges
    }

    fn name(&self) -> &'static str {
        "merge"
    }
}
