/*!
 * Pipeline Limits and Constants
 *
 * Centralized location for defaults and tuning values.
 */

// =============================================================================
// RUN DEFAULTS
// =============================================================================

/// Default number of worker threads (one shard per worker)
pub const DEFAULT_THREADS: usize = 32;

/// Default input file name
pub const DEFAULT_INPUT: &str = "input.txt";

// =============================================================================
// STATISTICS
// =============================================================================

/// Number of buckets in the last-digit histogram
pub const DIGIT_BUCKETS: usize = 10;

// =============================================================================
// SPINNING
// =============================================================================

/// Spin iterations on a held spin lock before yielding the time slice
/// [PERF] Short enough that a descheduled lock holder gets the CPU back quickly
pub const SPIN_YIELD_INTERVAL: u32 = 64;
