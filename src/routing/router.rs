//! Route registration and lookup.
//!
//! # Responsibilities
//! - Keep routes in registration order
//! - Apply nested group prefixes at registration time
//! - Merge bindings that compile to the same pattern text
//! - Return the first route matching both path and method
//!
//! # Design Decisions
//! - Mutable only during startup; the dispatcher owns it immutably afterwards
//! - O(n) scan in registration order (route counts are small)
//! - De-duplication compares regex source text, not object identity

use crate::http::handler::Handler;
use crate::routing::method::Method;
use crate::routing::path::clean_path;
use crate::routing::pattern::{Pattern, PatternError};
use crate::routing::route::{Route, RouteMatch};

/// Ordered collection of routes plus the group-prefix stack.
#[derive(Debug, Default)]
pub struct Router {
    groups: Vec<String>,
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register routes under `prefix`.
    ///
    /// The prefix is active only while `body` runs; nested groups
    /// concatenate in call order. The prefix is popped even if `body` fails.
    pub fn group_route<F>(&mut self, prefix: &str, body: F) -> Result<(), PatternError>
    where
        F: FnOnce(&mut Router) -> Result<(), PatternError>,
    {
        self.groups.push(prefix.to_string());
        let result = body(self);
        self.groups.pop();
        result
    }

    /// Bind `handler` for `method` on `template` (prefixed by active groups).
    pub fn bind_route(
        &mut self,
        method: Method,
        template: &str,
        handler: Handler,
    ) -> Result<(), PatternError> {
        let template = self.merge_groups(template);
        let pattern = Pattern::compile(&template)?;
        tracing::info!("{:<7} -> {}", method.as_str().to_uppercase(), template);

        if let Some(route) = self
            .routes
            .iter_mut()
            .find(|r| r.pattern().as_str() == pattern.as_str())
        {
            route.bind_handler(method, handler);
            return Ok(());
        }

        let mut route = Route::new(pattern);
        route.bind_handler(method, handler);
        self.routes.push(route);
        Ok(())
    }

    pub fn copy(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.bind_route(Method::Copy, template, handler)
    }

    pub fn delete(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.bind_route(Method::Delete, template, handler)
    }

    pub fn get(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.bind_route(Method::Get, template, handler)
    }

    pub fn head(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.bind_route(Method::Head, template, handler)
    }

    pub fn link(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.bind_route(Method::Link, template, handler)
    }

    pub fn options(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.bind_route(Method::Options, template, handler)
    }

    pub fn patch(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.bind_route(Method::Patch, template, handler)
    }

    pub fn post(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.bind_route(Method::Post, template, handler)
    }

    pub fn purge(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.bind_route(Method::Purge, template, handler)
    }

    pub fn put(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.bind_route(Method::Put, template, handler)
    }

    pub fn unlink(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.bind_route(Method::Unlink, template, handler)
    }

    /// First route, in registration order, whose pattern matches `path`
    /// and which has `method` bound.
    pub fn match_route(&self, method: Method, path: &str) -> Option<RouteMatch<'_>> {
        self.routes.iter().find_map(|r| r.matches(method, path))
    }

    /// Methods served by any route whose pattern matches `path`.
    ///
    /// Diagnostic only: dispatch never uses it to change the response.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = self
            .routes
            .iter()
            .filter(|r| r.pattern().is_match(path))
            .flat_map(|r| r.methods())
            .collect();
        methods.sort();
        methods.dedup();
        methods
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn merge_groups(&self, template: &str) -> String {
        let mut merged: String = self.groups.concat();
        merged.push_str(template);
        clean_path(&merged)
    }
}
