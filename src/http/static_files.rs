//! Static-folder fallback for unmatched GET requests.
//!
//! # Responsibilities
//! - Decide whether a path falls under a configured prefix
//! - Rewrite the path onto the mapped folder
//! - Hand existing regular files to `tower_http::services::ServeFile`
//!
//! # Design Decisions
//! - First configured prefix that matches wins; later ones are not tried
//! - Directories and missing files are both 404
//! - Paths are already cleaned, so `..` cannot climb out of a folder

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{HeaderMap, Request};
use axum::response::Response;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::config::StaticFolder;
use crate::http::status::{Failure, Status};

/// Ordered prefix → folder mappings.
#[derive(Debug, Clone, Default)]
pub struct StaticFiles {
    folders: Vec<StaticFolder>,
}

impl StaticFiles {
    pub fn new(folders: Vec<StaticFolder>) -> Self {
        Self { folders }
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// File path for `path` under the first matching prefix, if any.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        self.folders
            .iter()
            .find(|m| path.starts_with(&m.prefix))
            .map(|m| PathBuf::from(format!("{}{}", m.folder, &path[m.prefix.len()..])))
    }
}

/// Stream `file` as the response, or fail with 404 if it is missing or a
/// directory. Request headers are forwarded so conditional and range
/// requests work.
pub async fn serve_file(file: &Path, headers: HeaderMap) -> Result<Response, Failure> {
    match tokio::fs::metadata(file).await {
        Ok(meta) if !meta.is_dir() => {}
        Ok(_) => {
            tracing::debug!(file = ?file, "Static path is a directory");
            return Err(Status::not_found().into());
        }
        Err(e) => {
            tracing::debug!(file = ?file, error = %e, "Static file not available");
            return Err(Status::not_found().into());
        }
    }

    let mut request = Request::new(Body::empty());
    *request.headers_mut() = headers;

    let response = match ServeFile::new(file).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };
    Ok(response.map(Body::new))
}
