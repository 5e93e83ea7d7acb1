//! Shared utilities for integration tests.

use std::net::SocketAddr;

use path_router::alerts::DiagnosticReporter;
use path_router::{App, HttpServer, Shutdown};
use tokio::net::TcpListener;

/// A server running on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start `app` on 127.0.0.1 with the given reporter.
pub async fn start_server(app: App, reporter: DiagnosticReporter) -> TestServer {
    let config = app.config().clone();
    let dispatcher = app.into_dispatcher(reporter).unwrap();
    let server = HttpServer::new(dispatcher, config);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer { addr, shutdown }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
