//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, request ID, timeout, body limit, tracing)
//!     → dispatcher.rs (method allow-list, path cleaning, route lookup)
//!         → context.rs (RequestContext for the matched route)
//!         → handler.rs (handler, possibly wrapped by adapters)
//!         → static_files.rs (GET fallback onto configured folders)
//!     → recovery.rs (failures and panics → redirect or problem+json)
//!     → Send to client
//! ```

pub mod app;
pub mod context;
pub mod dispatcher;
pub mod handler;
pub mod recovery;
pub mod request;
pub mod server;
pub mod static_files;
pub mod status;

pub use app::App;
pub use context::RequestContext;
pub use dispatcher::Dispatcher;
pub use handler::{adapt, Adapter, Handler, HandlerResult};
pub use recovery::{RecoveryGuard, RedirectTable, PROBLEM_JSON};
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
pub use status::{Failure, Status};
