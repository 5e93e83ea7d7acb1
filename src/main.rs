//! path-router server binary.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ net (TCP / TLS) ──▶ http::server (request id, timeout,
//!                                          body limit, trace span)
//!                                              │
//!                                              ▼
//!                                       http::dispatcher
//!                                  allow-list ─▶ routing::Router ─▶ handler
//!                                              │            (adapters)
//!                                              ├─▶ static folders (GET only)
//!                                              ▼
//!     Client Response ◀──────────── http::recovery (redirect / problem+json)
//!                                              │
//!                                              ▼
//!                                   alerts (log, Slack), off the hot path
//! ```

use std::error::Error;
use std::time::{Duration, Instant};

use axum::Json;
use clap::Parser;
use serde_json::json;
use tokio::net::TcpListener;

use path_router::alerts::{sinks_from_config, DiagnosticReporter};
use path_router::cli::Args;
use path_router::lifecycle::{resolve_config, Shutdown};
use path_router::net::load_tls_config;
use path_router::observability::{logging, metrics};
use path_router::routing::PatternError;
use path_router::{adapt, App, Failure, Handler, HttpServer, RequestContext, Router, Status};

/// Time left for queued alerts after the server stops.
const REPORTER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let startup = resolve_config(&args)?;
    let config = startup.config;

    logging::init_logging(&config.observability.log_level);
    tracing::info!(
        config_file = ?startup.config_file,
        sandbox_mode = args.sandbox_mode,
        tls_mode = args.tls_mode,
        "path-router v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let (reporter, reporter_task) = DiagnosticReporter::spawn(
        sinks_from_config(&config.alerts),
        config.alerts.queue_capacity,
        config.alerts.delivery_timeout(),
    );

    let mut app = App::new(config.clone());
    register_routes(app.router_mut())?;
    let dispatcher = app.into_dispatcher(reporter)?;
    let server = HttpServer::new(dispatcher, config.clone());

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    match startup.tls_paths {
        Some((cert, key)) => {
            let tls = load_tls_config(&cert, &key).await?;
            let addr = tokio::net::lookup_host(config.listener.tls_address())
                .await?
                .next()
                .ok_or("TLS address did not resolve")?;
            server.run_tls(addr, tls, server_shutdown).await?;
        }
        None => {
            let listener = TcpListener::bind(config.listener.address()).await?;
            server.run(listener, server_shutdown).await?;
        }
    }

    // The dispatcher, and with it the last reporter handle, is gone now.
    if tokio::time::timeout(REPORTER_DRAIN_TIMEOUT, reporter_task).await.is_err() {
        tracing::warn!("Alert queue not drained before exit");
    }
    tracing::info!("Shutdown complete");
    Ok(())
}

fn register_routes(router: &mut Router) -> Result<(), PatternError> {
    router.get("/", Handler::new(|_ctx| async { Ok::<_, Failure>("path-router") }))?;

    router.group_route("/example", |r| {
        r.get("/{userID}", adapt(Handler::new(show_user), &[&timing_adapter]))?;
        r.post("/{userID}", adapt(Handler::new(update_user), &[&timing_adapter]))?;
        r.get("/{userID}/private", Handler::new(|_ctx| async {
            Err::<&str, Failure>(Status::unauthorized().into())
        }))
    })?;

    router.get("/health", Handler::new(|_ctx| async {
        Ok::<_, Failure>(Json(json!({ "status": "ok" })))
    }))
}

async fn show_user(ctx: RequestContext) -> Result<Json<serde_json::Value>, Failure> {
    let id = ctx.path_param("userID").ok_or_else(Status::bad_request)?;
    Ok(Json(json!({ "user_id": id, "fields": ctx.query_params() })))
}

async fn update_user(mut ctx: RequestContext) -> Result<Json<serde_json::Value>, Failure> {
    let id = ctx
        .path_param("userID")
        .ok_or_else(Status::bad_request)?
        .to_string();
    let body: serde_json::Value = ctx.json(64 * 1024).await?;
    Ok(Json(json!({ "user_id": id, "updated": body })))
}

/// Log how long the wrapped handler took.
fn timing_adapter(next: Handler) -> Handler {
    Handler::new(move |ctx: RequestContext| {
        let next = next.clone();
        async move {
            let start = Instant::now();
            let path = ctx.path().to_string();
            let result = next.call(ctx).await;
            tracing::debug!(path = %path, elapsed = ?start.elapsed(), ok = result.is_ok(), "Handler finished");
            result
        }
    })
}
