//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML: server.debug.toml / server.release.toml)
//!     → loader.rs (create defaults if missing, parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → App (redirect table, allow-list, static folders)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; routes and tables never change while serving
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{config_file, load_config, load_or_create, save_config, ConfigError};
pub use schema::{
    AlertConfig, HttpConfig, LimitConfig, ListenerConfig, ObservabilityConfig, ServerConfig,
    StaticFolder, TimeoutConfig, TlsConfig,
};
pub use validation::{validate_config, ValidationError};
