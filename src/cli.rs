//! Command-line arguments.
//!
//! Every flag except the modes can also come from the environment, so
//! containers can configure the server without a wrapper script.

use std::path::PathBuf;

use clap::Parser;

use crate::routing::clean_path;

#[derive(Debug, Clone, Parser)]
#[command(name = "path-router")]
#[command(about = "Regex path router with panic recovery and static file fallback", long_about = None)]
pub struct Args {
    /// Use the debug config file (server.debug.toml) instead of the release one.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sandbox_mode: bool,

    /// Serve HTTPS with the certificate from the SSL directory.
    #[arg(long, default_value_t = false, action = clap::ArgAction::Set)]
    pub tls_mode: bool,

    /// Listening port, overriding the config file.
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Directory holding the config files.
    #[arg(long, env = "CONFIG_PATH", value_parser = parse_dir)]
    pub config_path: Option<PathBuf>,

    /// Directory holding server.crt and server.key.
    #[arg(long, env = "SSL_PATH", value_parser = parse_dir)]
    pub ssl_path: Option<PathBuf>,
}

/// Clean a directory argument and drop its trailing slash.
pub fn format_path(path: &str) -> String {
    let cleaned = clean_path(path);
    match cleaned.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => cleaned,
    }
}

fn parse_dir(value: &str) -> Result<PathBuf, String> {
    if value.trim().is_empty() {
        return Err("directory must not be empty".to_string());
    }
    Ok(PathBuf::from(format_path(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_path_strips_trailing_slash() {
        assert_eq!(format_path("/etc/app/"), "/etc/app");
        assert_eq!(format_path("/etc//app/./conf/../"), "/etc/app");
        assert_eq!(format_path("/"), "/");
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["path-router"]).unwrap();
        assert!(args.sandbox_mode);
        assert!(!args.tls_mode);
    }

    #[test]
    fn explicit_flags() {
        let args = Args::try_parse_from([
            "path-router",
            "--sandbox-mode",
            "false",
            "--tls-mode",
            "true",
            "--port",
            "9000",
            "--config-path",
            "/srv/conf/",
            "--ssl-path",
            "/srv//ssl",
        ])
        .unwrap();

        assert!(!args.sandbox_mode);
        assert!(args.tls_mode);
        assert_eq!(args.port, Some(9000));
        assert_eq!(args.config_path, Some(PathBuf::from("/srv/conf")));
        assert_eq!(args.ssl_path, Some(PathBuf::from("/srv/ssl")));
    }

    #[test]
    fn rejects_bad_port() {
        assert!(Args::try_parse_from(["path-router", "--port", "http"]).is_err());
    }
}
