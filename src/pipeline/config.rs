/*!
 * Pipeline Configuration
 *
 * Resolved run settings. Argument parsing lives in the CLI; the pipeline
 * only ever sees this struct.
 */

use crate::core::errors::{PipelineError, PipelineResult};
use crate::core::limits::DEFAULT_THREADS;
use crate::queue::QueueKind;
use crate::stats::AggregationStrategy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether production overlaps consumption
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Run the distributor to completion, then start the workers
    Batch,
    /// Start the workers first and let them drain while the distributor streams
    Pipelined,
}

impl ExecutionMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ExecutionMode::Batch => "batch",
            ExecutionMode::Pipelined => "pipelined",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of workers, which is also the number of shards
    pub threads: usize,
    /// Queue discipline used for every shard
    pub queue: QueueKind,
    /// How worker results reach the global totals
    pub aggregation: AggregationStrategy,
    /// Batch or pipelined production
    pub mode: ExecutionMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::reference_atomic()
    }
}

impl PipelineConfig {
    /// Spin queues with atomic counters, production before consumption
    pub const fn reference_atomic() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            queue: QueueKind::Spin,
            aggregation: AggregationStrategy::Atomic,
            mode: ExecutionMode::Batch,
        }
    }

    /// Blocking queues with local-then-merge totals, production before consumption
    pub const fn reference_mutex() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            queue: QueueKind::Blocking,
            aggregation: AggregationStrategy::Merge,
            mode: ExecutionMode::Batch,
        }
    }

    pub const fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub const fn with_queue(mut self, queue: QueueKind) -> Self {
        self.queue = queue;
        self
    }

    pub const fn with_aggregation(mut self, aggregation: AggregationStrategy) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub const fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> PipelineResult<()> {
        if self.threads == 0 {
            return Err(PipelineError::InvalidThreadCount(self.threads));
        }
        Ok(())
    }

    /// Every queue × aggregation combination with this config's threads and mode
    pub fn combinations(&self) -> Vec<PipelineConfig> {
        QueueKind::ALL
            .iter()
            .flat_map(|&queue| {
                AggregationStrategy::ALL
                    .iter()
                    .map(move |&aggregation| self.with_queue(queue).with_aggregation(aggregation))
            })
            .collect()
    }
}
