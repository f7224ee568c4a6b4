/*!
 * Pipeline
 *
 * One producer, N shards, N workers:
 *
 * ```text
 *                 ┌─> shard 0 ─> worker 0 ─┐
 * source ─> distributor ─> shard 1 ─> worker 1 ─┼─> aggregator ─> RunReport
 *                 └─> shard N ─> worker N ─┘
 * ```
 *
 * # Execution Modes
 *
 * - **Batch**: the producer thread is joined before any worker is spawned, so
 *   every item sits in a shard before consumption starts
 * - **Pipelined**: workers are spawned first and drain while the producer
 *   streams; `wait_pop` absorbs the gaps
 *
 * Both modes give identical totals; only latency differs.
 */

mod config;
mod distributor;
mod guard;
mod shard;
mod worker;

pub use config::{ExecutionMode, PipelineConfig};
pub use distributor::Distributor;
pub use guard::CloseOnDrop;
pub use shard::{RoundRobin, ShardPolicy};
pub use worker::{Worker, WorkerReport};

use crate::core::errors::{ConsistencyWarning, PipelineError, PipelineResult, SourceError};
use crate::core::types::WorkItem;
use crate::monitoring::RunSpan;
use crate::queue::{BlockingQueue, LockFreeQueue, QueueKind, SpinQueue, WorkQueue};
use crate::source::NumberSource;
use crate::stats::{Aggregator, Stats};
use serde::Serialize;
use std::thread::{self, Scope, ScopedJoinHandle};
use std::time::Duration;
use tracing::{info, warn, Span};

/// Immutable outcome of one run, read after every worker has joined
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub config: PipelineConfig,
    pub totals: Stats,
    /// `None` when nothing was consumed
    pub mean: Option<f64>,
    pub produced: u64,
    pub workers: Vec<WorkerReport>,
    /// Lock acquisitions made by the aggregator
    pub merges: usize,
    #[serde(rename = "elapsed_us", serialize_with = "worker::serialize_micros")]
    pub elapsed: Duration,
}

impl RunReport {
    /// Items taken off the shards
    pub fn consumed(&self) -> u64 {
        self.totals.consumed
    }

    /// Check that every produced item was consumed exactly once
    pub fn consistency(&self) -> Result<(), ConsistencyWarning> {
        if self.produced == self.totals.consumed {
            Ok(())
        } else {
            Err(ConsistencyWarning {
                produced: self.produced,
                consumed: self.totals.consumed,
            })
        }
    }
}

/// Configured producer/consumer pipeline
///
/// # Examples
///
/// ```
/// use prime_pipeline::{is_prime, IterSource, Pipeline, PipelineConfig};
///
/// let pipeline = Pipeline::new(PipelineConfig::default().with_threads(4)).unwrap();
/// let report = pipeline.run(IterSource::from(2..=11), is_prime).unwrap();
///
/// assert_eq!(report.totals.primes, 5);
/// assert_eq!(report.mean, Some(6.5));
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    policy: Box<dyn ShardPolicy>,
}

impl Pipeline {
    /// Create a round-robin pipeline after validating `config`
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            policy: Box::new(RoundRobin),
        })
    }

    /// Replace the shard assignment policy
    pub fn with_policy(mut self, policy: impl ShardPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Classify every value of `source` and aggregate the results
    ///
    /// A produced/consumed mismatch is logged and left in the report for the
    /// caller (see `RunReport::consistency`); it does not fail the run.
    pub fn run<S, F>(&self, source: S, classify: F) -> PipelineResult<RunReport>
    where
        S: NumberSource + Send,
        F: Fn(WorkItem) -> bool + Sync,
    {
        match self.config.queue {
            QueueKind::Spin => self.run_with::<SpinQueue<WorkItem>, S, F>(source, &classify),
            QueueKind::LockFree => {
                self.run_with::<LockFreeQueue<WorkItem>, S, F>(source, &classify)
            }
            QueueKind::Blocking => {
                self.run_with::<BlockingQueue<WorkItem>, S, F>(source, &classify)
            }
        }
    }

    fn run_with<Q, S, F>(&self, source: S, classify: &F) -> PipelineResult<RunReport>
    where
        Q: WorkQueue<WorkItem>,
        S: NumberSource + Send,
        F: Fn(WorkItem) -> bool + Sync,
    {
        let config = self.config;
        let run_span = RunSpan::new(&config);
        let span = run_span.span();

        let queues: Vec<Q> = (0..config.threads).map(|_| Q::default()).collect();
        let aggregator = config.aggregation.build();
        let distributor = Distributor::new(&queues, &*self.policy);

        let (produced, workers) = thread::scope(|scope| -> PipelineResult<_> {
            match config.mode {
                ExecutionMode::Batch => {
                    let producer = spawn_producer(scope, &distributor, source, span)?;
                    let produced = join_producer(producer)?;
                    let handles = spawn_workers(scope, &queues, classify, &*aggregator, span)?;
                    Ok((produced, join_workers(handles)?))
                }
                ExecutionMode::Pipelined => {
                    // Releases spawned workers if we bail out before the producer runs
                    let closer = CloseOnDrop::new(&queues);
                    let handles = spawn_workers(scope, &queues, classify, &*aggregator, span)?;
                    let producer = spawn_producer(scope, &distributor, source, span)?;
                    let produced = join_producer(producer);
                    let workers = join_workers(handles);
                    drop(closer);
                    Ok((produced?, workers?))
                }
            }
        })?;

        let totals = aggregator.snapshot();
        let elapsed = run_span.finish(produced, totals.consumed);
        let report = RunReport {
            config,
            totals,
            mean: totals.mean(),
            produced,
            workers,
            merges: aggregator.merges(),
            elapsed,
        };

        if let Err(warning) = report.consistency() {
            warn!(
                produced = warning.produced,
                consumed = warning.consumed,
                "Produced and consumed counts disagree"
            );
        }
        info!(
            run_id = run_span.run_id(),
            queue = %config.queue,
            aggregation = %config.aggregation,
            mode = %config.mode,
            threads = config.threads,
            produced,
            primes = totals.primes,
            nonprimes = totals.nonprimes,
            elapsed_us = elapsed.as_micros() as u64,
            "Pipeline run complete"
        );

        Ok(report)
    }
}

fn spawn_producer<'scope, 'env, Q, S>(
    scope: &'scope Scope<'scope, 'env>,
    distributor: &'env Distributor<'env, Q>,
    mut source: S,
    parent: &'env Span,
) -> PipelineResult<ScopedJoinHandle<'scope, Result<u64, SourceError>>>
where
    Q: WorkQueue<WorkItem>,
    S: NumberSource + Send + 'scope,
{
    let name = String::from("producer");
    thread::Builder::new()
        .name(name.clone())
        .spawn_scoped(scope, move || {
            let _entered = tracing::debug_span!(parent: parent, "producer").entered();
            distributor.run(&mut source)
        })
        .map_err(|source| PipelineError::Spawn { name, source })
}

fn join_producer(
    handle: ScopedJoinHandle<'_, Result<u64, SourceError>>,
) -> PipelineResult<u64> {
    match handle.join() {
        Ok(produced) => Ok(produced?),
        Err(_) => Err(PipelineError::ProducerPanicked),
    }
}

fn spawn_workers<'scope, 'env, Q, F>(
    scope: &'scope Scope<'scope, 'env>,
    queues: &'env [Q],
    classify: &'env F,
    aggregator: &'env dyn Aggregator,
    parent: &'env Span,
) -> PipelineResult<Vec<ScopedJoinHandle<'scope, WorkerReport>>>
where
    Q: WorkQueue<WorkItem>,
    F: Fn(WorkItem) -> bool + Sync,
{
    queues
        .iter()
        .enumerate()
        .map(|(id, queue)| {
            let name = format!("worker-{id}");
            thread::Builder::new()
                .name(name.clone())
                .spawn_scoped(scope, move || {
                    let _entered = tracing::debug_span!(parent: parent, "worker", id).entered();
                    Worker::new(id, queue, classify, aggregator).run()
                })
                .map_err(|source| PipelineError::Spawn { name, source })
        })
        .collect()
}

/// Join every worker before reporting the first panic, if any
fn join_workers(
    handles: Vec<ScopedJoinHandle<'_, WorkerReport>>,
) -> PipelineResult<Vec<WorkerReport>> {
    let mut reports = Vec::with_capacity(handles.len());
    let mut panicked = None;

    for (id, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(report) => reports.push(report),
            Err(_) => {
                panicked.get_or_insert(id);
            }
        }
    }

    match panicked {
        Some(id) => Err(PipelineError::WorkerPanicked(id)),
        None => Ok(reports),
    }
}
