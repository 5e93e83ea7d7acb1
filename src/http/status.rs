//! Error taxonomy for dispatch.
//!
//! `Status` is both what handlers return to signal a failure and the JSON
//! body written to the client. `Failure` is the error half of a handler
//! result and also carries opaque errors and caught panics.

use std::any::Any;
use std::fmt;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP error classification with a numeric code and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("[{code}] {description}")]
pub struct Status {
    pub code: u16,
    pub description: String,
}

impl Status {
    pub fn new(code: u16, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }

    /// Status with the canonical reason phrase as description.
    pub fn from_code(code: u16) -> Self {
        let description = StatusCode::from_u16(code)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown Status");
        Self::new(code, description)
    }

    pub fn bad_request() -> Self {
        Self::from_code(400)
    }

    pub fn unauthorized() -> Self {
        Self::from_code(401)
    }

    pub fn forbidden() -> Self {
        Self::from_code(403)
    }

    /// Static fallback target is missing or a directory.
    pub fn not_found() -> Self {
        Self::from_code(404)
    }

    /// Method failed the allow-list check.
    pub fn method_not_allowed() -> Self {
        Self::from_code(405)
    }

    /// Any unclassified failure.
    pub fn internal_error() -> Self {
        Self::from_code(500)
    }

    /// No route and no applicable static mapping.
    pub fn service_unavailable() -> Self {
        Self::from_code(503)
    }

    /// Wire status; out-of-range codes degrade to 500.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Error side of a handler result.
#[derive(Debug, Error)]
pub enum Failure {
    /// A classified failure, forwarded to the client as-is.
    #[error(transparent)]
    Status(#[from] Status),

    /// Any other error; reported as 500.
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),

    /// A panic caught while dispatching; reported as 500.
    #[error("handler panicked: {0}")]
    Panic(String),
}

impl Failure {
    /// Wrap an arbitrary error.
    pub fn other<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Failure::Other(error.into())
    }

    /// Classify a panic payload. A `Status` raised with
    /// `std::panic::panic_any` keeps its code.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<Status>() {
            Ok(status) => return Failure::Status(*status),
            Err(payload) => payload,
        };

        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Failure::Panic(message)
    }

    /// The status this failure is reported with.
    pub fn status(&self) -> Status {
        match self {
            Failure::Status(status) => status.clone(),
            Failure::Other(_) | Failure::Panic(_) => Status::internal_error(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Failure::Status(_) => FailureKind::Status,
            Failure::Other(_) => FailureKind::Other,
            Failure::Panic(_) => FailureKind::Panic,
        }
    }
}

/// Which taxonomy entry a failure falls into, for logging and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Status,
    Other,
    Panic,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureKind::Status => "status",
            FailureKind::Other => "error",
            FailureKind::Panic => "panic",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_problem_body() {
        let status = Status::new(404, "missing");
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, r#"{"code":404,"description":"missing"}"#);
    }

    #[test]
    fn taxonomy_codes() {
        assert_eq!(Status::method_not_allowed().code, 405);
        assert_eq!(Status::not_found().code, 404);
        assert_eq!(Status::service_unavailable().code, 503);
        assert_eq!(Status::internal_error().code, 500);
        assert_eq!(Status::internal_error().description, "Internal Server Error");
    }

    #[test]
    fn out_of_range_code_degrades_to_500() {
        assert_eq!(Status::new(42, "odd").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(Status::new(418, "teapot").status_code(), StatusCode::IM_A_TEAPOT);
    }

    #[test]
    fn panic_payload_classification() {
        let status = Failure::from_panic(Box::new(Status::new(401, "login")));
        assert_eq!(status.status(), Status::new(401, "login"));

        let text = Failure::from_panic(Box::new("boom"));
        assert!(matches!(text, Failure::Panic(ref m) if m == "boom"));
        assert_eq!(text.status().code, 500);

        let owned = Failure::from_panic(Box::new(String::from("kaboom")));
        assert_eq!(owned.kind(), FailureKind::Panic);

        let opaque = Failure::from_panic(Box::new(7u32));
        assert_eq!(opaque.status().code, 500);
    }

    #[test]
    fn other_errors_are_internal() {
        let failure = Failure::other("disk on fire");
        assert_eq!(failure.kind(), FailureKind::Other);
        assert_eq!(failure.status(), Status::internal_error());
    }
}
