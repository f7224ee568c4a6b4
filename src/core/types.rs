/*!
 * Core Types
 * Common types used across the pipeline
 */

use super::limits::DIGIT_BUCKETS;

/// A single integer routed through the pipeline
pub type WorkItem = i64;

/// Index of a worker, which is also the index of the shard it drains
pub type WorkerId = usize;

/// Histogram bucket for a value: its last decimal digit
///
/// Uses the euclidean remainder so negative inputs land in `0..10`
/// instead of producing a negative index.
#[inline(always)]
pub fn digit_bucket(value: WorkItem) -> usize {
    value.rem_euclid(DIGIT_BUCKETS as i64) as usize
}
