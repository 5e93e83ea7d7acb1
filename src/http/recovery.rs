//! Central failure-to-response translation.
//!
//! Every failure surfacing from dispatch (a returned `Failure` or a caught
//! panic) ends up here. The client gets exactly one response: a redirect if
//! the status code has a configured target, otherwise an
//! `application/problem+json` body. A diagnostic report is queued
//! afterwards and never delays or alters the response.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};

use crate::alerts::{DiagnosticReport, DiagnosticReporter, RequestSnapshot};
use crate::http::status::{Failure, FailureKind, Status};
use crate::observability::metrics;

/// Content type of error bodies.
pub const PROBLEM_JSON: &str = "application/problem+json";

/// Status code → redirect target. Built once at startup.
pub type RedirectTable = HashMap<u16, String>;

#[derive(Debug, Clone)]
pub struct RecoveryGuard {
    redirects: Arc<RedirectTable>,
    reporter: DiagnosticReporter,
}

impl RecoveryGuard {
    pub fn new(redirects: RedirectTable, reporter: DiagnosticReporter) -> Self {
        Self {
            redirects: Arc::new(redirects),
            reporter,
        }
    }

    /// Turn `failure` into a response and queue a diagnostic report.
    pub fn recover(&self, failure: Failure, request: RequestSnapshot) -> Response {
        let status = failure.status();
        let kind = failure.kind();

        match kind {
            FailureKind::Status => tracing::debug!(
                code = status.code,
                method = %request.method,
                path = %request.path,
                "Request failed"
            ),
            FailureKind::Other | FailureKind::Panic => tracing::error!(
                code = status.code,
                kind = %kind,
                error = %failure,
                method = %request.method,
                path = %request.path,
                "Recovered from handler failure"
            ),
        }
        metrics::record_recovered_failure(&kind.to_string(), status.code);

        let response = self.respond(&status);
        self.reporter.report(DiagnosticReport::new(status, request));
        response
    }

    /// Response for `status`, honoring the redirect table.
    pub fn respond(&self, status: &Status) -> Response {
        if let Some(target) = self.redirects.get(&status.code) {
            match HeaderValue::from_str(target) {
                Ok(location) => return redirect(status, location),
                Err(_) => tracing::warn!(
                    code = status.code,
                    target = %target,
                    "Redirect target is not a valid header value"
                ),
            }
        }
        problem(status)
    }
}

fn redirect(status: &Status, location: HeaderValue) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status.status_code();
    response.headers_mut().insert(header::LOCATION, location);
    response
}

fn problem(status: &Status) -> Response {
    let body = serde_json::to_vec(status).unwrap_or_default();
    (
        status.status_code(),
        [(header::CONTENT_TYPE, PROBLEM_JSON)],
        body,
    )
        .into_response()
}
