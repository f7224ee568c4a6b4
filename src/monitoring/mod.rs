/*!
 * Monitoring
 * Structured tracing setup and run-level spans
 */

mod tracer;

pub use tracer::{init_tracing, RunSpan};
