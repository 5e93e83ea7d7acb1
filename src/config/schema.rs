//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::routing::Method;

/// Root configuration for the server.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (host, ports, TLS).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitConfig,

    /// Method allow-list, redirects and static folders.
    pub http: HttpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Failure alerting settings.
    pub alerts: AlertConfig,

    /// Free-form settings for applications built on the router.
    pub extensions: toml::Table,
}

impl ServerConfig {
    /// Extension value stored under `key`.
    pub fn get_extension(&self, key: &str) -> Option<&toml::Value> {
        self.extensions.get(key)
    }

    /// Store an extension value. Empty keys are ignored.
    pub fn set_extension(&mut self, key: impl Into<String>, value: impl Into<toml::Value>) {
        let key = key.into();
        if key.is_empty() {
            return;
        }
        self.extensions.insert(key, value.into());
    }
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host name or address to bind.
    pub host: String,

    /// Plain HTTP port.
    pub port: u16,

    /// HTTPS port, used in TLS mode.
    pub tls_port: u16,

    /// Optional explicit certificate paths.
    pub tls: Option<TlsConfig>,
}

impl ListenerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tls_address(&self) -> String {
        format!("{}:{}", self.host, self.tls_port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            tls_port: 8443,
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Timeout configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 15 }
    }
}

/// Request size limits.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1 << 20,
        }
    }
}

/// One static-folder mapping: URL prefix to directory.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StaticFolder {
    pub prefix: String,
    pub folder: String,
}

impl StaticFolder {
    pub fn new(prefix: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            folder: folder.into(),
        }
    }
}

/// Dispatch-level HTTP settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Methods accepted before routing; anything else gets 405.
    pub allow_methods: Vec<String>,

    /// Status code (as text) to redirect target.
    pub redirect_paths: HashMap<String, String>,

    /// Static fallback mappings, checked in order.
    pub static_folders: Vec<StaticFolder>,
}

impl HttpConfig {
    /// Redirect table keyed by numeric status. Unparsable keys are skipped.
    pub fn redirect_table(&self) -> HashMap<u16, String> {
        self.redirect_paths
            .iter()
            .filter_map(|(code, url)| match code.trim().parse::<u16>() {
                Ok(code) => Some((code, url.clone())),
                Err(_) => {
                    tracing::warn!(code = %code, "Ignoring redirect with non-numeric status");
                    None
                }
            })
            .collect()
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        let mut redirect_paths = HashMap::new();
        redirect_paths.insert("401".to_string(), "/login".to_string());

        Self {
            allow_methods: Method::ALL.iter().map(|m| m.as_str().to_string()).collect(),
            redirect_paths,
            static_folders: vec![
                StaticFolder::new("/assets", "assets"),
                StaticFolder::new("/resources", "resources"),
            ],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "debug".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Failure alert configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Slack incoming webhook; empty disables Slack.
    pub slack_url: String,
    pub slack_icon: String,
    pub slack_user: String,
    pub slack_channel: String,

    /// Pending reports kept before new ones are dropped.
    pub queue_capacity: usize,

    /// Time one sink may spend on one report before it is abandoned.
    pub delivery_timeout_secs: u64,
}

impl AlertConfig {
    pub fn delivery_timeout(&self) -> Duration {
        Duration::from_secs(self.delivery_timeout_secs)
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            slack_url: String::new(),
            slack_icon: ":ghost:".to_string(),
            slack_user: "Server".to_string(),
            slack_channel: "#channel".to_string(),
            queue_capacity: 256,
            delivery_timeout_secs: 10,
        }
    }
}
