//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Allow-list names only recognized methods
//! - Redirect keys are HTTP status codes, targets non-empty
//! - Static prefixes are absolute URL paths
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::routing::Method;

/// One semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.port must not be 0")]
    ZeroPort,

    #[error("timeouts.request_secs must be greater than 0")]
    ZeroTimeout,

    #[error("http.allow_methods must not be empty")]
    EmptyAllowList,

    #[error("http.allow_methods contains unknown method {0:?}")]
    UnknownMethod(String),

    #[error("http.redirect_paths key {0:?} is not a status code between 100 and 599")]
    InvalidRedirectCode(String),

    #[error("http.redirect_paths target for {0:?} is empty")]
    EmptyRedirectTarget(String),

    #[error("http.static_folders prefix {0:?} must start with '/'")]
    InvalidStaticPrefix(String),

    #[error("http.static_folders folder for prefix {0:?} is empty")]
    EmptyStaticFolder(String),

    #[error("alerts.queue_capacity must be greater than 0")]
    ZeroQueueCapacity,

    #[error("alerts.delivery_timeout_secs must be greater than 0")]
    ZeroDeliveryTimeout,
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 || config.listener.tls_port == 0 {
        errors.push(ValidationError::ZeroPort);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.http.allow_methods.is_empty() {
        errors.push(ValidationError::EmptyAllowList);
    }
    for method in &config.http.allow_methods {
        if method.parse::<Method>().is_err() {
            errors.push(ValidationError::UnknownMethod(method.clone()));
        }
    }

    let mut redirects: Vec<_> = config.http.redirect_paths.iter().collect();
    redirects.sort();
    for (code, target) in redirects {
        match code.trim().parse::<u16>() {
            Ok(n) if (100..=599).contains(&n) => {}
            _ => errors.push(ValidationError::InvalidRedirectCode(code.clone())),
        }
        if target.trim().is_empty() {
            errors.push(ValidationError::EmptyRedirectTarget(code.clone()));
        }
    }

    for mapping in &config.http.static_folders {
        if !mapping.prefix.starts_with('/') {
            errors.push(ValidationError::InvalidStaticPrefix(mapping.prefix.clone()));
        }
        if mapping.folder.trim().is_empty() {
            errors.push(ValidationError::EmptyStaticFolder(mapping.prefix.clone()));
        }
    }

    if config.alerts.queue_capacity == 0 {
        errors.push(ValidationError::ZeroQueueCapacity);
    }
    if config.alerts.delivery_timeout_secs == 0 {
        errors.push(ValidationError::ZeroDeliveryTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
