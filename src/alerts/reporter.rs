//! Bounded, best-effort delivery of diagnostic reports.
//!
//! Reports are queued with `try_send`; a full or closed queue drops the
//! report instead of waiting. A single background worker forwards queued
//! reports to every sink in turn, giving each sink a bounded time per
//! report. Delivery order across requests and delivery itself are not
//! guaranteed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::alerts::report::DiagnosticReport;
use crate::alerts::sink::AlertSink;
use crate::observability::metrics;

/// Handle used by the recovery path to enqueue reports.
#[derive(Debug, Clone)]
pub struct DiagnosticReporter {
    tx: mpsc::Sender<DiagnosticReport>,
}

impl DiagnosticReporter {
    /// Start the worker task. Must be called inside a Tokio runtime.
    ///
    /// The worker stops once every reporter handle has been dropped and the
    /// queue is drained. A sink that takes longer than `delivery_timeout` on
    /// one report is abandoned for that report.
    pub fn spawn(
        sinks: Vec<Arc<dyn AlertSink>>,
        capacity: usize,
        delivery_timeout: Duration,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(run_worker(rx, sinks, delivery_timeout));
        (Self { tx }, worker)
    }

    /// A reporter that drops everything. Useful where alerts are unwanted.
    pub fn disabled() -> Self {
        let (tx, _rx) = mpsc::channel(1);
        Self { tx }
    }

    /// Enqueue without blocking. Returns false if the report was dropped.
    pub fn report(&self, report: DiagnosticReport) -> bool {
        match self.tx.try_send(report) {
            Ok(()) => true,
            Err(TrySendError::Full(report)) => {
                tracing::debug!(status = report.status.code, "Diagnostic queue full, dropping report");
                metrics::record_report_dropped("full");
                false
            }
            Err(TrySendError::Closed(report)) => {
                tracing::debug!(status = report.status.code, "Diagnostic worker gone, dropping report");
                metrics::record_report_dropped("closed");
                false
            }
        }
    }
}

async fn run_worker(
    mut rx: mpsc::Receiver<DiagnosticReport>,
    sinks: Vec<Arc<dyn AlertSink>>,
    delivery_timeout: Duration,
) {
    tracing::debug!(sinks = sinks.len(), "Diagnostic worker started");

    while let Some(report) = rx.recv().await {
        for sink in &sinks {
            match tokio::time::timeout(delivery_timeout, sink.deliver(&report)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::error!(sink = sink.name(), error = %e, "Failed to deliver diagnostic report");
                }
                Err(_) => {
                    tracing::error!(
                        sink = sink.name(),
                        timeout = ?delivery_timeout,
                        "Diagnostic report delivery timed out"
                    );
                    metrics::record_report_dropped("timeout");
                }
            }
        }
    }

    tracing::debug!("Diagnostic worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::report::RequestSnapshot;
    use crate::alerts::sink::AlertError;
    use crate::http::status::Status;
    use axum::http::Request;
    use futures_util::future::BoxFuture;
    use futures_util::FutureExt;
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(10);

    fn report(code: u16) -> DiagnosticReport {
        let request = Request::builder().uri("/x").body(()).unwrap();
        DiagnosticReport::new(Status::from_code(code), RequestSnapshot::capture(&request, None))
    }

    struct ChannelSink(mpsc::UnboundedSender<u16>);

    impl AlertSink for ChannelSink {
        fn name(&self) -> &'static str {
            "channel"
        }

        fn deliver<'a>(&'a self, report: &'a DiagnosticReport) -> BoxFuture<'a, Result<(), AlertError>> {
            let _ = self.0.send(report.status.code);
            futures_util::future::ready(Ok(())).boxed()
        }
    }

    struct FailingSink;

    impl AlertSink for FailingSink {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn deliver<'a>(&'a self, _report: &'a DiagnosticReport) -> BoxFuture<'a, Result<(), AlertError>> {
            futures_util::future::ready(Err(AlertError::Rejected(500))).boxed()
        }
    }

    struct StuckSink;

    impl AlertSink for StuckSink {
        fn name(&self) -> &'static str {
            "stuck"
        }

        fn deliver<'a>(&'a self, _report: &'a DiagnosticReport) -> BoxFuture<'a, Result<(), AlertError>> {
            futures_util::future::pending().boxed()
        }
    }

    #[tokio::test]
    async fn reports_reach_every_sink() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sinks: Vec<Arc<dyn AlertSink>> = vec![Arc::new(FailingSink), Arc::new(ChannelSink(tx))];
        let (reporter, _worker) = DiagnosticReporter::spawn(sinks, 8, TIMEOUT);

        assert!(reporter.report(report(404)));
        assert!(reporter.report(report(500)));

        let first = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        let second = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        assert_eq!(first, Some(404));
        assert_eq!(second, Some(500));
    }

    #[tokio::test]
    async fn full_queue_drops_without_blocking() {
        let (reporter, _worker) = DiagnosticReporter::spawn(vec![Arc::new(StuckSink)], 1, TIMEOUT);

        // The worker takes the first report and blocks on the stuck sink.
        assert!(reporter.report(report(500)));
        tokio::time::sleep(Duration::from_millis(50)).await;

        // One more fits in the queue, the rest are dropped immediately.
        assert!(reporter.report(report(501)));
        assert!(!reporter.report(report(502)));
        assert!(!reporter.report(report(503)));
    }

    #[tokio::test]
    async fn stuck_sink_does_not_starve_later_sinks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sinks: Vec<Arc<dyn AlertSink>> = vec![Arc::new(StuckSink), Arc::new(ChannelSink(tx))];
        let (reporter, _worker) = DiagnosticReporter::spawn(sinks, 4, Duration::from_millis(50));

        assert!(reporter.report(report(500)));
        assert!(reporter.report(report(502)));

        let first = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await.unwrap();
        let second = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await.unwrap();
        assert_eq!(first, Some(500));
        assert_eq!(second, Some(502));
    }

    #[tokio::test]
    async fn disabled_reporter_drops() {
        let reporter = DiagnosticReporter::disabled();
        assert!(!reporter.report(report(500)));
    }

    #[tokio::test]
    async fn worker_stops_when_handles_dropped() {
        let (reporter, worker) = DiagnosticReporter::spawn(Vec::new(), 4, TIMEOUT);
        reporter.report(report(500));
        drop(reporter);
        tokio::time::timeout(Duration::from_secs(1), worker)
            .await
            .unwrap()
            .unwrap();
    }
}
