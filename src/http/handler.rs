//! Request handlers and adapter composition.
//!
//! An adapter turns one handler into another (logging, auth checks,
//! timing...). `adapt` stacks several of them around a handler.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::http::context::RequestContext;
use crate::http::status::Failure;

/// What every handler resolves to.
pub type HandlerResult = Result<Response, Failure>;

type HandlerFn = dyn Fn(RequestContext) -> BoxFuture<'static, HandlerResult> + Send + Sync;

/// A cloneable, type-erased async request handler.
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    /// Wrap an async function or closure.
    pub fn new<F, Fut, R>(f: F) -> Self
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, Failure>> + Send + 'static,
        R: IntoResponse,
    {
        Self(Arc::new(move |ctx| {
            f(ctx)
                .map(|result| result.map(IntoResponse::into_response))
                .boxed()
        }))
    }

    pub fn call(&self, ctx: RequestContext) -> BoxFuture<'static, HandlerResult> {
        (self.0)(ctx)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

/// A handler decorator.
pub trait Adapter {
    fn wrap(&self, next: Handler) -> Handler;
}

impl<F> Adapter for F
where
    F: Fn(Handler) -> Handler,
{
    fn wrap(&self, next: Handler) -> Handler {
        self(next)
    }
}

/// Compose adapters around `handler`.
///
/// Each adapter wraps everything before it, so `adapters[0]` sits closest to
/// the handler: `adapt(h, &[&a, &b])` runs b, then a, then h on the way in.
pub fn adapt(handler: Handler, adapters: &[&dyn Adapter]) -> Handler {
    adapters
        .iter()
        .fold(handler, |next, adapter| adapter.wrap(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Method;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Mutex;

    fn context() -> RequestContext {
        let (parts, body) = Request::builder()
            .uri("/")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        RequestContext::new(Method::Get, "/".into(), parts, body, None)
    }

    type Log = Arc<Mutex<Vec<&'static str>>>;

    fn tracing_adapter(log: Log, pre: &'static str, post: &'static str) -> impl Fn(Handler) -> Handler {
        move |next: Handler| {
            let log = log.clone();
            Handler::new(move |ctx| {
                let next = next.clone();
                let log = log.clone();
                async move {
                    log.lock().unwrap().push(pre);
                    let result = next.call(ctx).await;
                    log.lock().unwrap().push(post);
                    result
                }
            })
        }
    }

    fn logging_handler(log: Log) -> Handler {
        Handler::new(move |_ctx| {
            let log = log.clone();
            async move {
                log.lock().unwrap().push("h");
                Ok::<_, Failure>("done")
            }
        })
    }

    #[tokio::test]
    async fn test_adapt_order() {
        let log: Log = Arc::default();
        let a = tracing_adapter(log.clone(), "a-pre", "a-post");
        let b = tracing_adapter(log.clone(), "b-pre", "b-post");

        let composed = adapt(logging_handler(log.clone()), &[&a, &b]);
        composed.call(context()).await.unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["b-pre", "a-pre", "h", "a-post", "b-post"]
        );
    }

    #[tokio::test]
    async fn test_adapt_without_adapters() {
        let log: Log = Arc::default();
        let composed = adapt(logging_handler(log.clone()), &[]);
        let response = composed.call(context()).await.unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(*log.lock().unwrap(), vec!["h"]);
    }

    #[tokio::test]
    async fn test_adapter_can_short_circuit() {
        let log: Log = Arc::default();
        let deny = |_next: Handler| {
            Handler::new(|_ctx| async {
                Err::<Response, _>(Failure::Status(crate::http::Status::forbidden()))
            })
        };

        let composed = adapt(logging_handler(log.clone()), &[&deny]);
        let err = composed.call(context()).await.unwrap_err();

        assert_eq!(err.status().code, 403);
        assert!(log.lock().unwrap().is_empty());
    }
}
