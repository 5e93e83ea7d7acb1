//! Regex path router with panic recovery and static file fallback.

pub mod alerts;
pub mod cli;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;

pub use config::schema::ServerConfig;
pub use http::{adapt, Adapter, App, Failure, Handler, HttpServer, RequestContext, Status};
pub use lifecycle::Shutdown;
pub use routing::{Method, Router};
