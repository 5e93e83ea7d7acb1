//! Application object used during startup.
//!
//! Owns the router plus everything the dispatcher needs from configuration.
//! Routes are registered on the `App`; `into_dispatcher` then freezes it.

use crate::alerts::DiagnosticReporter;
use crate::config::ServerConfig;
use crate::http::dispatcher::Dispatcher;
use crate::http::handler::Handler;
use crate::http::recovery::RecoveryGuard;
use crate::http::static_files::StaticFiles;
use crate::routing::{Method, MethodAllowList, PatternError, Router};

/// Registration-phase application state.
#[derive(Debug)]
pub struct App {
    config: ServerConfig,
    router: Router,
}

impl App {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            router: Router::new(),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Router for verb helpers (`app.router_mut().get(...)`).
    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    /// See [`Router::group_route`].
    pub fn group_route<F>(&mut self, prefix: &str, body: F) -> Result<(), PatternError>
    where
        F: FnOnce(&mut Router) -> Result<(), PatternError>,
    {
        self.router.group_route(prefix, body)
    }

    /// See [`Router::bind_route`].
    pub fn bind_route(
        &mut self,
        method: Method,
        template: &str,
        handler: Handler,
    ) -> Result<(), PatternError> {
        self.router.bind_route(method, template, handler)
    }

    pub fn copy(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.router.copy(template, handler)
    }

    pub fn delete(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.router.delete(template, handler)
    }

    pub fn get(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.router.get(template, handler)
    }

    pub fn head(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.router.head(template, handler)
    }

    pub fn link(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.router.link(template, handler)
    }

    pub fn options(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.router.options(template, handler)
    }

    pub fn patch(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.router.patch(template, handler)
    }

    pub fn post(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.router.post(template, handler)
    }

    pub fn purge(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.router.purge(template, handler)
    }

    pub fn put(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.router.put(template, handler)
    }

    pub fn unlink(&mut self, template: &str, handler: Handler) -> Result<(), PatternError> {
        self.router.unlink(template, handler)
    }

    /// Freeze registration and build the dispatcher.
    ///
    /// The allow-list is compiled here; names were validated with the
    /// config, so an error means an unvalidated config was used.
    pub fn into_dispatcher(self, reporter: DiagnosticReporter) -> Result<Dispatcher, regex::Error> {
        let http = &self.config.http;
        let allow_list = MethodAllowList::new(&http.allow_methods)?;
        let guard = RecoveryGuard::new(http.redirect_table(), reporter);
        let static_files = StaticFiles::new(http.static_folders.clone());

        tracing::info!(
            routes = self.router.len(),
            allow_methods = %allow_list.as_str(),
            static_folders = http.static_folders.len(),
            "Dispatcher ready"
        );

        Ok(Dispatcher::new(self.router, allow_list, static_files, guard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::status::Failure;
    use axum::body::Body;
    use axum::http::Request;

    fn handler() -> Handler {
        Handler::new(|_ctx| async { Ok::<_, Failure>("ok") })
    }

    #[tokio::test]
    async fn dispatcher_uses_configured_redirects_and_methods() {
        let mut config = ServerConfig::default();
        config.http.allow_methods = vec!["get".into()];
        config.http.static_folders.clear();

        let mut app = App::new(config);
        app.group_route("/api", |r| r.get("/ok", handler())).unwrap();
        app.post(
            "/deny",
            Handler::new(|_ctx| async { Err::<&str, _>(Failure::from(crate::http::Status::unauthorized())) }),
        )
        .unwrap();
        app.bind_route(
            Method::Get,
            "/deny",
            Handler::new(|_ctx| async { Err::<&str, _>(Failure::from(crate::http::Status::unauthorized())) }),
        )
        .unwrap();
        assert_eq!(app.router().len(), 2);

        let dispatcher = app.into_dispatcher(DiagnosticReporter::disabled()).unwrap();

        let ok = Request::get("/api/ok").body(Body::empty()).unwrap();
        assert_eq!(dispatcher.dispatch(ok, None).await.status(), 200);

        let deny = Request::get("/deny").body(Body::empty()).unwrap();
        let response = dispatcher.dispatch(deny, None).await;
        assert_eq!(response.status(), 401);
        assert_eq!(response.headers()["location"], "/login");

        // POST is bound but not allowed.
        let post = Request::post("/deny").body(Body::empty()).unwrap();
        assert_eq!(dispatcher.dispatch(post, None).await.status(), 405);
    }
}
