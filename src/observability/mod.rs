//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Synthesis functions produce:
//!     → logging.rs (structured events on every fallback)
//!     → metrics.rs (render and fallback counters)
//!
//! Rendered configuration gets:
//!     → tracing.rs (tracer loading, context propagation, InfluxDB)
//! ```
//!
//! # Design Decisions
//! - A fallback is always logged and counted, never silent
//! - Tracing directives are omitted entirely when disabled

pub mod logging;
pub mod metrics;
pub mod tracing;
