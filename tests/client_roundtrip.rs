//! End-to-end tests: a real listener driven by `ChatClient`.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use docchat::catalog::Catalog;
use docchat::client::ChatClient;
use docchat::config::DocchatConfig;
use docchat::server::ChatServer;
use docchat::{ChatRequest, Error};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Starts a server on an ephemeral port; send on the returned channel to stop it.
async fn spawn_server() -> (String, oneshot::Sender<()>, JoinHandle<docchat::Result<()>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let config = DocchatConfig::new().with_delay(0, 0);
    let server = ChatServer::new(config, Arc::new(Catalog::embedded().unwrap()));
    let handle = tokio::spawn(server.serve_on(listener, async move {
        stop_rx.await.ok();
    }));

    (format!("http://{addr}"), stop_tx, handle)
}

#[tokio::test]
async fn test_ask_and_health_over_tcp() {
    let (url, stop, handle) = spawn_server().await;
    let client = ChatClient::new(url).unwrap();

    let health = client.health().await.unwrap();
    assert_eq!(health.status, "OK");

    let request = ChatRequest::new("Give me the important findings summary").with_source_count(1);
    let response = client.send(&request).await.unwrap();
    assert_eq!(response.id, 6);
    assert!(response.sources.len() <= 1);

    stop.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_client_reports_unreachable_server() {
    // Bind then drop to get a port nothing listens on.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let client = ChatClient::new(format!("http://{addr}")).unwrap();

    let err = client.send(&ChatRequest::new("hello")).await.unwrap_err();
    match err {
        Error::OperationFailed { operation, .. } => assert_eq!(operation, "chat_request"),
        other => panic!("unexpected error: {other}"),
    }
}
