//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Config file used in sandbox mode.
pub const DEBUG_CONFIG: &str = "server.debug.toml";

/// Config file used in production mode.
pub const RELEASE_CONFIG: &str = "server.release.toml";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Path of the config file for the given mode, inside `config_dir` if set.
pub fn config_file(config_dir: Option<&Path>, sandbox: bool) -> PathBuf {
    let name = if sandbox { DEBUG_CONFIG } else { RELEASE_CONFIG };
    match config_dir {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: ServerConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Write `config` to `path`, replacing any existing file.
pub fn save_config(config: &ServerConfig, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `path`, first writing a default config there if it does not exist.
pub fn load_or_create(path: &Path) -> Result<ServerConfig, ConfigError> {
    if !path.exists() {
        tracing::info!(path = ?path, "Config file missing, writing defaults");
        save_config(&ServerConfig::default(), path)?;
    }
    load_config(path)
}
