//! Per-request state handed to handlers.

use std::net::SocketAddr;

use axum::body::{Body, Bytes};
use axum::http::{request::Parts, Extensions, HeaderMap, Version};
use serde::de::DeserializeOwned;

use crate::http::status::{Failure, Status};
use crate::routing::{Method, PathParams};

/// Everything a handler knows about the request it serves.
///
/// Created by the dispatcher for one request and dropped when the handler
/// chain returns. The handler's returned `Response` is the response side.
#[derive(Debug)]
pub struct RequestContext {
    method: Method,
    path: String,
    path_params: Option<PathParams>,
    query_params: Vec<(String, String)>,
    headers: HeaderMap,
    version: Version,
    extensions: Extensions,
    remote_addr: Option<SocketAddr>,
    body: Body,
}

impl RequestContext {
    /// Build a context from request parts. `path` is the cleaned path used
    /// for matching, not necessarily the raw URI path.
    pub fn new(
        method: Method,
        path: String,
        parts: Parts,
        body: Body,
        remote_addr: Option<SocketAddr>,
    ) -> Self {
        let query_params = parts
            .uri
            .query()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();

        Self {
            method,
            path,
            path_params: None,
            query_params,
            headers: parts.headers,
            version: parts.version,
            extensions: parts.extensions,
            remote_addr,
            body,
        }
    }

    /// Attach parameters extracted by the matched route.
    pub fn with_path_params(mut self, params: Option<PathParams>) -> Self {
        self.path_params = params;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// All path parameters; `None` when the route declares no placeholders.
    pub fn path_params(&self) -> Option<&PathParams> {
        self.path_params.as_ref()
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .as_ref()
            .and_then(|p| p.get(name))
            .map(String::as_str)
    }

    /// Decoded query pairs in the order they appeared.
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    /// First value for a query key.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as text, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    /// Take the request body, leaving an empty one behind.
    pub fn take_body(&mut self) -> Body {
        std::mem::take(&mut self.body)
    }

    /// Buffer the body up to `limit` bytes. Oversized or broken bodies are
    /// reported as 400.
    pub async fn body_bytes(&mut self, limit: usize) -> Result<Bytes, Failure> {
        let body = self.take_body();
        axum::body::to_bytes(body, limit).await.map_err(|e| {
            tracing::debug!(error = %e, "Failed to read request body");
            Failure::Status(Status::bad_request())
        })
    }

    /// Buffer and decode a JSON body. Decoding errors are reported as 400.
    pub async fn json<T: DeserializeOwned>(&mut self, limit: usize) -> Result<T, Failure> {
        let bytes = self.body_bytes(limit).await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Failure::Status(Status::new(400, format!("Invalid JSON body: {}", e))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use std::collections::HashMap;

    fn context(uri: &str, body: &'static str) -> RequestContext {
        let (parts, body) = Request::builder()
            .uri(uri)
            .header("user-agent", "test-agent")
            .body(Body::from(body))
            .unwrap()
            .into_parts();
        RequestContext::new(Method::Get, "/users/5".into(), parts, body, None)
    }

    #[test]
    fn query_params_are_decoded() {
        let ctx = context("/users/5?name=a%20b&tag=x&tag=y", "");
        assert_eq!(ctx.query_param("name"), Some("a b"));
        assert_eq!(ctx.query_param("tag"), Some("x"));
        assert_eq!(ctx.query_params().len(), 3);
        assert_eq!(ctx.query_param("missing"), None);
    }

    #[test]
    fn path_params_absent_until_attached() {
        let ctx = context("/users/5", "");
        assert!(ctx.path_params().is_none());

        let mut params = HashMap::new();
        params.insert("id".to_string(), "5".to_string());
        let ctx = ctx.with_path_params(Some(params));
        assert_eq!(ctx.path_param("id"), Some("5"));
        assert_eq!(ctx.header("user-agent"), Some("test-agent"));
    }

    #[tokio::test]
    async fn json_body_decoding() {
        #[derive(Debug, serde::Deserialize)]
        struct Payload {
            name: String,
        }

        let mut ctx = context("/users/5", r#"{"name":"ada"}"#);
        let payload: Payload = ctx.json(1024).await.unwrap();
        assert_eq!(payload.name, "ada");

        let mut bad = context("/users/5", "not json");
        let err = bad.json::<Payload>(1024).await.unwrap_err();
        assert_eq!(err.status().code, 400);
    }
}
