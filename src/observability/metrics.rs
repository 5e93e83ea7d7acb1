//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by method, status
//! - `router_request_duration_seconds` (histogram): latency distribution
//! - `router_recovered_failures_total` (counter): failures turned into responses, by kind and status
//! - `router_reports_dropped_total` (counter): diagnostic reports lost to a full or closed queue, or to a sink timeout
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op
//! - Prometheus exporter is optional and serves its own listener

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "router_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("router_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_recovered_failure(kind: &str, status: u16) {
    counter!(
        "router_recovered_failures_total",
        "kind" => kind.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_report_dropped(reason: &'static str) {
    counter!("router_reports_dropped_total", "reason" => reason).increment(1);
}
