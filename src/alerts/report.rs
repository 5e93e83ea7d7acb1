//! Diagnostic report assembled for every recovered failure.

use std::fmt;
use std::net::SocketAddr;

use axum::http::{header, HeaderMap, Request, Version};
use chrono::{DateTime, Utc};

use crate::http::status::Status;
use crate::routing::decode_path;

/// Request details captured before the body is handed to a handler.
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    pub protocol: String,
    pub method: String,
    pub path: String,
    pub remote_addr: Option<SocketAddr>,
    pub user_agent: String,
    pub referer: String,
    /// Remaining headers, lower-case names, multiple values joined by `, `.
    pub headers: Vec<(String, String)>,
}

impl RequestSnapshot {
    pub fn capture<B>(request: &Request<B>, remote_addr: Option<SocketAddr>) -> Self {
        let headers = request.headers();
        Self {
            protocol: protocol_name(request.version()).to_string(),
            method: request.method().to_string(),
            path: decode_path(request.uri().path())
                .unwrap_or_else(|_| request.uri().path().to_string()),
            remote_addr,
            user_agent: header_text(headers, header::USER_AGENT.as_str()),
            referer: header_text(headers, header::REFERER.as_str()),
            headers: other_headers(headers),
        }
    }
}

fn protocol_name(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/?",
    }
}

fn header_text(headers: &HeaderMap, name: &str) -> String {
    headers
        .get_all(name)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join(", ")
}

fn other_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .keys()
        .filter(|name| **name != header::USER_AGENT && **name != header::REFERER)
        .map(|name| (name.as_str().to_string(), header_text(headers, name.as_str())))
        .collect()
}

/// Plain-text failure report forwarded to alert sinks.
#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    pub timestamp: DateTime<Utc>,
    pub status: Status,
    pub request: RequestSnapshot,
}

impl DiagnosticReport {
    pub fn new(status: Status, request: RequestSnapshot) -> Self {
        Self {
            timestamp: Utc::now(),
            status,
            request,
        }
    }
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let req = &self.request;
        writeln!(
            f,
            "[{}][{}] {}",
            self.timestamp.format("%d %b %y %H:%M UTC"),
            self.status.code,
            self.status.description
        )?;
        writeln!(f, "{} {} {}", req.protocol, req.method, req.path)?;
        writeln!(f)?;

        match req.remote_addr {
            Some(addr) => writeln!(f, "address: {}", addr)?,
            None => writeln!(f, "address: unknown")?,
        }
        writeln!(f, "user-agent: {}", req.user_agent)?;
        writeln!(f)?;

        writeln!(f, "referer: {}", req.referer)?;
        writeln!(f, "header:")?;
        for (name, value) in &req.headers {
            writeln!(f, "- {}: {}", name, value)?;
        }
        Ok(())
    }
}
