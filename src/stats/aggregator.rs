/*!
 * Aggregator Strategy
 *
 * Trait-based abstraction over the two ways workers publish results.
 */

use super::{AtomicStats, MergedStats, Stats};
use crate::core::types::WorkItem;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shared destination for worker statistics
///
/// Each worker owns a local `Stats` for the whole run and calls `record`
/// once per item and `finish` once at exit. What those calls touch is up to
/// the strategy; `snapshot` is only meaningful after every worker has
/// finished and been joined.
pub trait Aggregator: Send + Sync {
    /// Account for one classified item
    fn record(&self, local: &mut Stats, value: WorkItem, is_prime: bool);

    /// Called once by each worker after its queue is exhausted
    fn finish(&self, local: Stats);

    /// Global totals
    fn snapshot(&self) -> Stats;

    /// Number of lock-protected merges performed so far
    fn merges(&self) -> usize;

    /// Strategy name for logs and reports
    fn name(&self) -> &'static str;
}

/// Aggregation strategy selection
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum AggregationStrategy {
    /// Relaxed fetch-and-add on shared counters for every item
    Atomic,
    /// Worker-local accumulation, one locked merge per worker
    Merge,
}

impl AggregationStrategy {
    /// Every strategy, in report order
    pub const ALL: [AggregationStrategy; 2] =
        [AggregationStrategy::Atomic, AggregationStrategy::Merge];

    /// Create a fresh aggregator for one run
    pub fn build(self) -> Box<dyn Aggregator> {
        match self {
            AggregationStrategy::Atomic => Box::new(AtomicStats::new()),
            AggregationStrategy::Merge => Box::new(MergedStats::new()),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AggregationStrategy::Atomic => "atomic",
            AggregationStrategy::Merge => "merge",
        }
    }
}

impl fmt::Display for AggregationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
