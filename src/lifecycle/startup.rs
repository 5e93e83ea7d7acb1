//! Startup orchestration.
//!
//! # Responsibilities
//! - Pick the config file for the run mode and create it if missing
//! - Apply command-line overrides on top of the file
//! - Report where TLS material will be read from
//!
//! # Design Decisions
//! - Fail fast: any config error is fatal
//! - Overrides are validated again, since a flag can break the file's invariants

use std::path::PathBuf;

use crate::cli::Args;
use crate::config::{config_file, load_or_create, validate_config, ConfigError, ServerConfig};
use crate::net::resolve_tls_paths;

/// Everything `main` needs to bring the server up.
#[derive(Debug, Clone)]
pub struct Startup {
    pub config: ServerConfig,
    pub config_file: PathBuf,
    /// Certificate and key, present only in TLS mode.
    pub tls_paths: Option<(PathBuf, PathBuf)>,
}

/// Resolve the effective configuration from command-line arguments.
pub fn resolve_config(args: &Args) -> Result<Startup, ConfigError> {
    let path = config_file(args.config_path.as_deref(), args.sandbox_mode);
    let mut config = load_or_create(&path)?;

    if let Some(port) = args.port {
        if args.tls_mode {
            config.listener.tls_port = port;
        } else {
            config.listener.port = port;
        }
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    let tls_paths = args
        .tls_mode
        .then(|| resolve_tls_paths(config.listener.tls.as_ref(), args.ssl_path.as_deref()));

    Ok(Startup {
        config,
        config_file: path,
        tls_paths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationError;

    fn args(dir: &std::path::Path) -> Args {
        Args {
            sandbox_mode: true,
            tls_mode: false,
            port: None,
            config_path: Some(dir.to_path_buf()),
            ssl_path: None,
        }
    }

    #[test]
    fn creates_debug_config_in_sandbox() {
        let dir = tempfile::tempdir().unwrap();
        let startup = resolve_config(&args(dir.path())).unwrap();

        assert_eq!(startup.config_file, dir.path().join("server.debug.toml"));
        assert!(startup.config_file.exists());
        assert_eq!(startup.config, ServerConfig::default());
        assert!(startup.tls_paths.is_none());
    }

    #[test]
    fn port_override_targets_active_listener() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path());
        args.port = Some(9090);

        let plain = resolve_config(&args).unwrap();
        assert_eq!(plain.config.listener.port, 9090);

        args.tls_mode = true;
        args.ssl_path = Some(dir.path().join("ssl"));
        let tls = resolve_config(&args).unwrap();
        assert_eq!(tls.config.listener.tls_port, 9090);
        assert_eq!(tls.config.listener.port, 8080);
        let (cert, key) = tls.tls_paths.unwrap();
        assert_eq!(cert, dir.path().join("ssl").join("server.crt"));
        assert_eq!(key, dir.path().join("ssl").join("server.key"));
    }

    #[test]
    fn zero_port_override_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path());
        args.port = Some(0);

        match resolve_config(&args) {
            Err(ConfigError::Validation(errors)) => {
                assert!(errors.contains(&ValidationError::ZeroPort));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn release_mode_uses_release_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path());
        args.sandbox_mode = false;

        let startup = resolve_config(&args).unwrap();
        assert_eq!(startup.config_file, dir.path().join("server.release.toml"));
    }
}
