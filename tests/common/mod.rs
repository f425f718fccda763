//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

use mock_server::config::MockServerConfig;
use mock_server::http::{build_router, AppState, HttpServer};
use mock_server::lifecycle::Shutdown;
use mock_server::registry::MockRegistry;
use mock_server::responses::ResponsePicker;
use mock_server::storage::{MemoryStore, RouteStore};

/// Always picks the same index, clamped by the selector.
pub struct FixedPicker(pub usize);

impl ResponsePicker for FixedPicker {
    fn pick(&self, _len: usize) -> usize {
        self.0
    }
}

/// Router over an empty in-memory registry.
pub fn test_router() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let router = router_with(MockServerConfig::default(), store.clone(), FixedPicker(0));
    (router, store)
}

pub fn router_with(
    config: MockServerConfig,
    store: Arc<dyn RouteStore>,
    picker: impl ResponsePicker + 'static,
) -> Router {
    let registry = Arc::new(MockRegistry::with_table(store, Default::default()));
    let state = AppState::new(registry, Arc::new(picker));
    build_router(&config, state, &Shutdown::new())
}

/// Drive one request through the router; returns status and JSON body.
pub async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request(method, uri, body))
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Bind a real server on an ephemeral port.
pub async fn spawn_server(
    config: MockServerConfig,
    registry: Arc<MockRegistry>,
) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, registry, &shutdown);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });
    (addr, shutdown)
}
