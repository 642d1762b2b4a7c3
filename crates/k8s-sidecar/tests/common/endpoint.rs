//! HTTP endpoints for exercising the change callback.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use wiremock::matchers::path;
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const HOOK_PATH: &str = "/hook";

/// Starts a server that answers every request to [`HOOK_PATH`] with `status`.
pub async fn hook_server(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(path(HOOK_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

pub fn hook_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), HOOK_PATH)
}

/// Polls until `count` requests were received or `timeout` passes.
pub async fn wait_for_requests(server: &MockServer, count: usize, timeout: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let seen = server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0);
        if seen >= count || tokio::time::Instant::now() >= deadline {
            return seen;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Accepts TCP connections and closes each one without answering.
pub struct ClosingEndpoint {
    pub url: String,
    connections: Arc<AtomicUsize>,
}

impl ClosingEndpoint {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind endpoint");
        let addr = listener.local_addr().expect("No local address");

        let connections = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&connections);
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                drop(socket);
            }
        });

        Self {
            url: format!("http://{}{}", addr, HOOK_PATH),
            connections,
        }
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

/// A URL on a local port nobody listens on.
pub fn unused_local_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    drop(listener);
    format!("http://{}{}", addr, HOOK_PATH)
}
