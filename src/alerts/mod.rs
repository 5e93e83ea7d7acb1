//! Out-of-band failure alerting.
//!
//! # Data Flow
//! ```text
//! RecoveryGuard (after the response is built)
//!     → report.rs (snapshot + status → DiagnosticReport)
//!     → reporter.rs (try_send into bounded queue, drop when full)
//!     → worker task
//!     → sink.rs (log sink, Slack webhook sink, ...)
//! ```
//!
//! # Design Decisions
//! - Never blocks or fails the request path
//! - Best effort: no ordering or delivery guarantee
//! - Sink failures are logged and swallowed

pub mod report;
pub mod reporter;
pub mod sink;

use std::sync::Arc;

use crate::config::AlertConfig;

pub use report::{DiagnosticReport, RequestSnapshot};
pub use reporter::DiagnosticReporter;
pub use sink::{AlertError, AlertSink, LogSink, SlackSink};

/// Sinks implied by configuration: always the log, plus Slack if configured.
pub fn sinks_from_config(config: &AlertConfig) -> Vec<Arc<dyn AlertSink>> {
    let mut sinks: Vec<Arc<dyn AlertSink>> = vec![Arc::new(LogSink)];
    if let Some(slack) = SlackSink::from_config(config) {
        sinks.push(Arc::new(slack));
    }
    sinks
}
