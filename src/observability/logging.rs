//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Pick the filter from `RUST_LOG`, else from the configured level
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Unknown configured levels fall back to `debug`

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const KNOWN_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(log_level: &str) -> String {
    let level = log_level.to_ascii_lowercase();
    let level = if KNOWN_LEVELS.contains(&level.as_str()) {
        level
    } else {
        "debug".to_string()
    };
    format!("path_router={level},tower_http={level}")
}

/// Install the global subscriber. Call once, at startup.
pub fn init_logging(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_uses_configured_level() {
        assert_eq!(default_directive("INFO"), "path_router=info,tower_http=info");
    }

    #[test]
    fn unknown_level_falls_back_to_debug() {
        assert_eq!(default_directive("loud"), "path_router=debug,tower_http=debug");
    }
}
