/*!
 * Prime Pipeline Library
 *
 * Producer / multi-consumer benchmark harness: one distributor fans a stream
 * of integers out over per-worker queues, workers classify each value as
 * prime or not, and an aggregator folds their statistics together.
 *
 * Queue disciplines (`QueueKind`) and aggregation strategies
 * (`AggregationStrategy`) are chosen per run so they can be compared on the
 * same input.
 */

pub mod classify;
pub mod cli;
pub mod core;
pub mod monitoring;
pub mod pipeline;
pub mod queue;
pub mod report;
pub mod source;
pub mod stats;

// Re-exports
pub use crate::core::errors::{ConsistencyWarning, PipelineError, PipelineResult, SourceError};
pub use crate::core::types::{WorkItem, WorkerId};
pub use classify::is_prime;
pub use monitoring::init_tracing;
pub use pipeline::{
    Distributor, ExecutionMode, Pipeline, PipelineConfig, RoundRobin, RunReport, ShardPolicy,
    WorkerReport,
};
pub use queue::{BlockingQueue, Discipline, LockFreeQueue, QueueKind, SpinQueue, WorkQueue};
pub use report::{ComparisonTable, DisplayMode, TextReport};
pub use source::{IterSource, NumberSource, TokenReader};
pub use stats::{AggregationStrategy, Aggregator, Stats};
