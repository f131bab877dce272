//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use restkit::error::BoxError;
use restkit::health::HealthHandler;
use restkit::observability::MemorySink;
use restkit::{BasicRegistry, ServiceConfig, Service, Shutdown};

pub type TestService = Service<BasicRegistry<()>>;

/// Service with the liveness endpoint, a panicking route and a memory sink.
pub fn test_service() -> (TestService, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let registry = Arc::new(BasicRegistry::new((), sink.clone()));
    let mut service = Service::new(ServiceConfig::default(), registry);

    let health = HealthHandler::new(&service);
    service.router_mut().register(&[&health]);
    service.router_mut().get("/explode", |_req: Request<Body>| async move {
        if true {
            panic!("handler blew up");
        }
        Ok::<Response, BoxError>(Response::new(Body::empty()))
    });

    (service, sink)
}

pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Serve on an ephemeral port; trigger the returned `Shutdown` to stop.
pub async fn spawn_server(service: TestService) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let signal = shutdown.signal();

    tokio::spawn(async move {
        let _ = service.serve_with_shutdown(listener, signal).await;
    });

    (addr, shutdown)
}
