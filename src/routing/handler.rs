//! Handler abstractions.
//!
//! A handler is any async function from a request to a [`HandlerResult`].
//! Returning `Err` signals a fault: the router treats it like a panic and
//! hands the request to the configured panic handler.

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

use crate::error::BoxError;
use crate::routing::Router;

/// Outcome of a handler invocation.
pub type HandlerResult = Result<Response, BoxError>;

/// Something that can serve a request.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request<Body>) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, req: Request<Body>) -> BoxFuture<'static, HandlerResult> {
        Box::pin(self(req))
    }
}

/// Reference-counted handler as stored in the route table.
pub type SharedHandler = Arc<dyn Handler>;

/// A collaborator that contributes a set of routes.
///
/// Invoked once at startup, before the service begins serving.
pub trait RouteSet {
    fn install_routes(&self, router: &mut Router);
}

/// Why a handler did not produce a response.
///
/// Inserted into the request extensions before the panic handler runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerFault {
    #[error("handler returned an error: {0}")]
    Failed(String),

    #[error("handler panicked: {0}")]
    Panicked(String),
}
