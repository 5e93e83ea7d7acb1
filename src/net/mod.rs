//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Plain mode:  TcpListener (tokio) → axum::serve
//! TLS mode:    tls.rs (load PEM cert + key) → axum-server rustls acceptor
//! ```
//!
//! # Design Decisions
//! - TLS termination is delegated to axum-server; no handshake code here
//! - Certificate locations come from config, else from the SSL directory

pub mod tls;

pub use tls::{load_tls_config, resolve_tls_paths};
