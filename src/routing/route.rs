//! A compiled pattern and the handlers bound to it.

use std::collections::HashMap;

use futures_util::future::BoxFuture;

use crate::http::context::RequestContext;
use crate::http::handler::{Handler, HandlerResult};
use crate::routing::method::Method;
use crate::routing::pattern::{PathParams, Pattern};

/// Result of a successful route match.
#[derive(Debug)]
pub struct RouteMatch<'r> {
    pub route: &'r Route,
    /// `None` when the pattern has no placeholders.
    pub params: Option<PathParams>,
}

/// One pattern with at most one handler per method.
#[derive(Debug)]
pub struct Route {
    pattern: Pattern,
    handlers: HashMap<Method, Handler>,
}

impl Route {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            handlers: HashMap::new(),
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Bind `handler` to `method`, replacing any previous binding.
    pub fn bind_handler(&mut self, method: Method, handler: Handler) {
        if self.handlers.insert(method, handler).is_some() {
            tracing::debug!(
                method = %method,
                pattern = %self.pattern.as_str(),
                "Replaced existing handler"
            );
        }
    }

    /// Methods with a bound handler, sorted.
    pub fn methods(&self) -> Vec<Method> {
        let mut methods: Vec<Method> = self.handlers.keys().copied().collect();
        methods.sort();
        methods
    }

    pub fn serves(&self, method: Method) -> bool {
        self.handlers.contains_key(&method)
    }

    /// Run the handler bound to the context's method.
    ///
    /// # Panics
    /// If no handler is bound for that method. Callers only invoke a route
    /// returned by `matches`, which already checked the binding.
    pub fn invoke_handlers(&self, ctx: RequestContext) -> BoxFuture<'static, HandlerResult> {
        match self.handlers.get(&ctx.method()) {
            Some(handler) => handler.call(ctx),
            None => panic!(
                "route {} invoked for unbound method {}",
                self.pattern.as_str(),
                ctx.method()
            ),
        }
    }

    /// Match path and method together.
    ///
    /// A path hit on a route that does not serve `method` is reported as no
    /// match, so the router keeps scanning later routes.
    pub fn matches(&self, method: Method, path: &str) -> Option<RouteMatch<'_>> {
        if !self.serves(method) {
            return None;
        }
        let params = self.pattern.captures(path)?;
        Some(RouteMatch {
            route: self,
            params,
        })
    }
}
