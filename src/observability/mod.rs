//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log output (stderr, filtered by RUST_LOG or config log level)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) is recorded on the trace span of every request
//! - Metrics are cheap (atomic increments) and safe to call without an exporter
//! - Diagnostic reports for failures go through `alerts`, not through here

pub mod logging;
pub mod metrics;
