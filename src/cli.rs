/*!
 * Command Line Interface
 * Argument definitions resolved into a `PipelineConfig`
 */

use crate::core::limits::{DEFAULT_INPUT, DEFAULT_THREADS};
use crate::pipeline::{ExecutionMode, PipelineConfig};
use crate::queue::QueueKind;
use crate::report::DisplayMode;
use crate::stats::AggregationStrategy;
use clap::Parser;
use std::path::PathBuf;

/// Classify a stream of integers as prime or non-prime across worker threads
#[derive(Parser, Debug, Clone)]
#[command(name = "prime-pipeline", version)]
pub struct Args {
    /// Number of worker threads (one queue per worker)
    #[arg(short = 't', long, default_value_t = DEFAULT_THREADS)]
    pub threads: usize,

    /// Input file of whitespace-separated integers
    #[arg(short = 'f', long, default_value = DEFAULT_INPUT)]
    pub file: PathBuf,

    /// Do not print execution times
    #[arg(long, conflicts_with = "only_exec_times")]
    pub no_exec_times: bool,

    /// Print execution times only
    #[arg(long)]
    pub only_exec_times: bool,

    /// Queue synchronization discipline
    #[arg(long, value_enum, default_value_t = QueueKind::Spin)]
    pub queue: QueueKind,

    /// Result aggregation strategy
    #[arg(long, value_enum, default_value_t = AggregationStrategy::Atomic)]
    pub aggregation: AggregationStrategy,

    /// Whether workers start before or after production finishes
    #[arg(long, value_enum, default_value_t = ExecutionMode::Batch)]
    pub mode: ExecutionMode,

    /// Fail on malformed tokens instead of treating them as end of input
    #[arg(long)]
    pub strict: bool,

    /// Print the report as JSON
    #[arg(long, conflicts_with_all = ["no_exec_times", "only_exec_times"])]
    pub json: bool,

    /// Run every queue and aggregation combination on the same input
    #[arg(long, conflicts_with_all = ["json", "no_exec_times", "only_exec_times"])]
    pub compare: bool,
}

impl Args {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            threads: self.threads,
            queue: self.queue,
            aggregation: self.aggregation,
            mode: self.mode,
        }
    }

    pub fn display_mode(&self) -> DisplayMode {
        if self.no_exec_times {
            DisplayMode::NoExecTimes
        } else if self.only_exec_times {
            DisplayMode::OnlyExecTimes
        } else {
            DisplayMode::Full
        }
    }
}
