//! Per-request entry point.
//!
//! # Responsibilities
//! - Normalize method (lower-case) and path (percent-decoded, cleaned)
//! - Reject methods outside the allow-list (405) before routing
//! - Resolve the route and run its handler chain
//! - Fall back to static folders for unmatched GETs (404 if the file is unusable)
//! - Signal "no route" with 503
//! - Funnel every failure and panic through the RecoveryGuard
//!
//! # Design Decisions
//! - Owns the router immutably; no locks on the hot path
//! - 503 for "no route" is kept for compatibility with existing clients

use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use futures_util::FutureExt;

use crate::alerts::RequestSnapshot;
use crate::http::context::RequestContext;
use crate::http::handler::HandlerResult;
use crate::http::recovery::RecoveryGuard;
use crate::http::static_files::{self, StaticFiles};
use crate::http::status::{Failure, Status};
use crate::routing::{clean_path, decode_path, Method, MethodAllowList, Router};

/// Immutable request dispatcher built from a fully registered router.
#[derive(Debug)]
pub struct Dispatcher {
    router: Router,
    allow_list: MethodAllowList,
    static_files: StaticFiles,
    guard: RecoveryGuard,
}

impl Dispatcher {
    pub fn new(
        router: Router,
        allow_list: MethodAllowList,
        static_files: StaticFiles,
        guard: RecoveryGuard,
    ) -> Self {
        Self {
            router,
            allow_list,
            static_files,
            guard,
        }
    }

    /// Serve one request. Always produces exactly one response.
    pub async fn dispatch(&self, request: Request<Body>, remote_addr: Option<SocketAddr>) -> Response {
        let snapshot = RequestSnapshot::capture(&request, remote_addr);

        let outcome = AssertUnwindSafe(self.route(request, remote_addr))
            .catch_unwind()
            .await;

        let failure = match outcome {
            Ok(Ok(response)) => return response,
            Ok(Err(failure)) => failure,
            Err(payload) => Failure::from_panic(payload),
        };
        self.guard.recover(failure, snapshot)
    }

    async fn route(&self, request: Request<Body>, remote_addr: Option<SocketAddr>) -> HandlerResult {
        let method_name = request.method().as_str().to_ascii_lowercase();
        let path = match decode_path(request.uri().path()) {
            Ok(decoded) => clean_path(&decoded),
            Err(e) => {
                tracing::debug!(path = %request.uri().path(), error = %e, "Request path is not UTF-8");
                return Err(Status::bad_request().into());
            }
        };

        if !self.allow_list.allows(&method_name) {
            return Err(Status::method_not_allowed().into());
        }
        let method: Method = method_name
            .parse()
            .map_err(|_| Status::method_not_allowed())?;

        if let Some(matched) = self.router.match_route(method, &path) {
            let (parts, body) = request.into_parts();
            let ctx = RequestContext::new(method, path, parts, body, remote_addr)
                .with_path_params(matched.params);
            return matched.route.invoke_handlers(ctx).await;
        }

        if method == Method::Get && !self.static_files.is_empty() {
            if let Some(file) = self.static_files.resolve(&path) {
                return static_files::serve_file(&file, request.headers().clone()).await;
            }
        }

        tracing::debug!(
            method = %method,
            path = %path,
            path_methods = ?self.router.allowed_methods(&path),
            "No route matched"
        );
        Err(Status::service_unavailable().into())
    }
}
