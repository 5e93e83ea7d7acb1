//! TLS configuration and certificate loading.

use std::path::{Path, PathBuf};

use axum_server::tls_rustls::RustlsConfig;

use crate::config::TlsConfig;

/// Certificate file name expected inside the SSL directory.
pub const CERT_FILE: &str = "server.crt";

/// Private key file name expected inside the SSL directory.
pub const KEY_FILE: &str = "server.key";

/// Certificate and key paths: explicit config wins, then the SSL
/// directory, then the working directory.
pub fn resolve_tls_paths(tls: Option<&TlsConfig>, ssl_dir: Option<&Path>) -> (PathBuf, PathBuf) {
    if let Some(tls) = tls {
        return (PathBuf::from(&tls.cert_path), PathBuf::from(&tls.key_path));
    }
    let dir = ssl_dir.unwrap_or_else(|| Path::new("."));
    (dir.join(CERT_FILE), dir.join(KEY_FILE))
}

/// Read the PEM certificate chain and private key for the HTTPS listener.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, std::io::Error> {
    for (what, path) in [("certificate", cert_path), ("private key", key_path)] {
        if !path.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("TLS {} not found at {}", what, path.display()),
            ));
        }
    }

    let config = RustlsConfig::from_pem_file(cert_path, key_path).await?;
    tracing::info!(cert = %cert_path.display(), "TLS certificate loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_paths_win() {
        let tls = TlsConfig {
            cert_path: "/etc/certs/a.pem".into(),
            key_path: "/etc/certs/a.key".into(),
        };
        let (cert, key) = resolve_tls_paths(Some(&tls), Some(Path::new("/ssl")));
        assert_eq!(cert, PathBuf::from("/etc/certs/a.pem"));
        assert_eq!(key, PathBuf::from("/etc/certs/a.key"));
    }

    #[test]
    fn ssl_directory_defaults() {
        let (cert, key) = resolve_tls_paths(None, Some(Path::new("/ssl")));
        assert_eq!(cert, PathBuf::from("/ssl/server.crt"));
        assert_eq!(key, PathBuf::from("/ssl/server.key"));
    }

    #[tokio::test]
    async fn missing_certificate_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let (cert, key) = resolve_tls_paths(None, Some(dir.path()));
        let err = load_tls_config(&cert, &key).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
        assert!(err.to_string().contains("server.crt"));
    }
}
