/*!
 * Structured Tracing
 * Subscriber setup and per-run spans using the tracing crate
 *
 * Features:
 * - Env-driven filtering (`RUST_LOG`)
 * - Optional JSON output for machine parsing
 * - One span per pipeline run, with producer and worker spans nested under it
 *   across thread boundaries
 */

use crate::pipeline::PipelineConfig;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info_span, Span};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Run ids are process-local and only correlate log lines
static NEXT_RUN_ID: AtomicU64 = AtomicU64::new(1);

/// Initialize structured tracing on stderr
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: warn, so the report owns stdout)
/// - PRIME_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let use_json = std::env::var("PRIME_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .init();
    }
}

/// Span covering one pipeline run
///
/// Producer and worker threads enter child spans of `span()`, so their events
/// carry the run id and configuration even though they run on other threads.
pub struct RunSpan {
    span: Span,
    start: Instant,
    run_id: u64,
}

impl RunSpan {
    pub fn new(config: &PipelineConfig) -> Self {
        let run_id = NEXT_RUN_ID.fetch_add(1, Ordering::Relaxed);

        let span = info_span!(
            "pipeline_run",
            run_id,
            threads = config.threads,
            queue = %config.queue,
            discipline = %config.queue.discipline(),
            aggregation = %config.aggregation,
            mode = %config.mode,
            produced = tracing::field::Empty,
            consumed = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );

        span.in_scope(|| debug!(run_id, "pipeline run started"));

        Self {
            span,
            start: Instant::now(),
            run_id,
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Record the outcome and return the elapsed wall-clock time
    pub fn finish(&self, produced: u64, consumed: u64) -> Duration {
        let elapsed = self.start.elapsed();
        self.span.record("produced", produced);
        self.span.record("consumed", consumed);
        self.span.record("duration_us", elapsed.as_micros() as u64);
        elapsed
    }
}
