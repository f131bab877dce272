//! Service composition and serving.
//!
//! # Responsibilities
//! - Own the registry, codec and router
//! - Wire not-found and panic handlers through the shared codec
//! - Bind the listener and serve until it fails or shuts down
//!
//! # Design Decisions
//! - Framework-generated errors take the same encode/log path as handlers
//! - Serving consumes the service: the route table is frozen in an `Arc`
//!   before the first connection is accepted

use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::error::{BoxError, ClassifiedError, ErrorKind, Severity};
use crate::http::codec::JsonCodec;
use crate::observability::AccessLogger;
use crate::registry::Registry;
use crate::routing::{Handler, Router};

/// Error type for serving.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// A servable unit: registry, JSON pipeline and router.
pub struct Service<R: Registry> {
    config: ServiceConfig,
    registry: Arc<R>,
    codec: JsonCodec,
    router: Router,
}

impl<R: Registry> Service<R> {
    /// Build a service whose fallbacks answer with classified JSON errors.
    pub fn new(config: ServiceConfig, registry: Arc<R>) -> Self {
        let codec = JsonCodec::new(AccessLogger::new(registry.log_sink()));
        let router = Router::new()
            .with_not_found(not_found_handler(codec.clone()))
            .with_panic_handler(panic_handler(codec.clone()));

        Self {
            config,
            registry,
            codec,
            router,
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Router for registering routes before serving.
    pub fn router_mut(&mut self) -> &mut Router {
        &mut self.router
    }

    /// JSON reader/writer shared with handlers.
    pub fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    pub fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn bind_address(&self) -> String {
        self.config.bind_address()
    }

    /// Freeze the route table for in-process dispatch.
    pub fn into_router(self) -> Arc<Router> {
        Arc::new(self.router)
    }

    /// Bind the configured address and serve until the listener fails.
    pub async fn serve(self) -> Result<(), ServeError> {
        let address = self.bind_address();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| ServeError::Bind { address, source })?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve_on(self, listener: TcpListener) -> Result<(), ServeError> {
        self.serve_with_shutdown(listener, std::future::pending()).await
    }

    /// Serve until `signal` completes, then drain in-flight requests.
    pub async fn serve_with_shutdown<F>(
        self,
        listener: TcpListener,
        signal: F,
    ) -> Result<(), ServeError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        let router = self.into_router();
        tracing::info!(
            address = %addr,
            routes = router.route_count(),
            "HTTP server starting"
        );

        let app = axum::Router::new()
            .fallback(move |req: Request<Body>| async move { router.dispatch(req).await })
            .layer(TraceLayer::new_for_http());

        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(signal)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

impl<R: Registry> std::fmt::Debug for Service<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Service")
            .field("config", &self.config)
            .field("codec", &self.codec)
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}

fn not_found_handler(codec: JsonCodec) -> impl Handler {
    move |req: Request<Body>| {
        let codec = codec.clone();
        async move {
            let mut err =
                ClassifiedError::new("404 Not Found", ErrorKind::NotFound, Severity::Info);
            err.set_op("notFoundHandler");
            let (head, _) = req.into_parts();
            Ok::<_, BoxError>(codec.write_error_code(&head, StatusCode::NOT_FOUND.as_u16(), &err))
        }
    }
}

fn panic_handler(codec: JsonCodec) -> impl Handler {
    move |req: Request<Body>| {
        let codec = codec.clone();
        async move {
            let mut err = ClassifiedError::new(
                "Internal Server Error",
                ErrorKind::InternalServerError,
                Severity::Severe,
            );
            err.set_op("panicHandler");
            let (head, _) = req.into_parts();
            Ok::<_, BoxError>(codec.write_error(&head, &err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::MemorySink;
    use crate::registry::BasicRegistry;
    use axum::http::Method;
    use tracing::Level;

    fn service() -> (Service<BasicRegistry<()>>, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let registry = Arc::new(BasicRegistry::new((), sink.clone()));
        (Service::new(ServiceConfig::default(), registry), sink)
    }

    #[tokio::test]
    async fn test_not_found_goes_through_codec() {
        let (service, sink) = service();
        let router = service.into_router();

        let response = router
            .dispatch(
                Request::builder()
                    .method(Method::GET)
                    .uri("/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let record = sink.take().pop().unwrap();
        assert_eq!(record.level, Level::INFO);
        let details = record.error.unwrap();
        assert_eq!(details.operation, "notFoundHandler");
        assert_eq!(details.kind, ErrorKind::NotFound);
        assert_eq!(details.severity, "info");
    }

    #[test]
    fn test_accessors() {
        let (mut service, _) = service();
        assert_eq!(service.bind_address(), "0.0.0.0:8080");
        assert_eq!(service.router().route_count(), 0);

        let codec = service.codec().clone();
        service.router_mut().get("/x", move |req: Request<Body>| {
            let codec = codec.clone();
            async move {
                let (head, _) = req.into_parts();
                Ok::<_, BoxError>(codec.write(&head, &1))
            }
        });
        assert_eq!(service.router().route_count(), 1);
        assert_eq!(Arc::strong_count(service.registry()), 1);
    }
}
