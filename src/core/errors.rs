/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors raised while pulling integers from an input source
#[derive(Error, Debug, Diagnostic)]
pub enum SourceError {
    #[error("Failed to open input {}", path.display())]
    #[diagnostic(
        code(source::open_failed),
        help("Check that the input file exists and is readable, or pass another one with --file.")
    )]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error while reading input: {0}")]
    #[diagnostic(code(source::io))]
    Io(#[from] std::io::Error),

    #[error("Invalid token {token:?} at position {position}")]
    #[diagnostic(
        code(source::invalid_token),
        help("Input must be whitespace-separated integers that fit in a signed 64-bit value.")
    )]
    InvalidToken { token: String, position: u64 },
}

/// Pipeline-level errors
#[derive(Error, Debug, Diagnostic)]
pub enum PipelineError {
    #[error("Thread count must be at least 1, got {0}")]
    #[diagnostic(
        code(pipeline::invalid_thread_count),
        help("Every worker drains exactly one shard, so at least one worker is required.")
    )]
    InvalidThreadCount(usize),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Source(#[from] SourceError),

    #[error("Worker {0} panicked")]
    #[diagnostic(
        code(pipeline::worker_panicked),
        help("The classifier or aggregator panicked; the totals of this run are incomplete.")
    )]
    WorkerPanicked(usize),

    #[error("Producer thread panicked")]
    #[diagnostic(code(pipeline::producer_panicked))]
    ProducerPanicked,

    #[error("Failed to spawn thread {name}")]
    #[diagnostic(
        code(pipeline::spawn_failed),
        help("The system may be out of threads. Try a smaller --threads value.")
    )]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Produced and consumed counts disagree after a completed run
///
/// Never raised as an error: the run already finished and its partial totals
/// are still meaningful. Callers report it and carry on.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Diagnostic)]
#[error("produced_count ({produced}) != consumed_count ({consumed})")]
#[diagnostic(
    code(pipeline::count_mismatch),
    severity(Warning),
    help("An item was lost or duplicated between the distributor and the workers.")
)]
pub struct ConsistencyWarning {
    pub produced: u64,
    pub consumed: u64,
}
