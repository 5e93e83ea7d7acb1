//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     CLI args + env → config file (created if missing) → validate → overrides
//!
//! Shutdown (shutdown.rs):
//!     SIGINT/SIGTERM → broadcast → servers stop accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Routes are registered before the listener is bound
//! - One broadcast channel fans the shutdown signal out to every server

pub mod shutdown;
pub mod startup;

pub use shutdown::{wait_for_signal, Shutdown};
pub use startup::{resolve_config, Startup};
