//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store handlers per method in exact-match path tables
//! - Dispatch requests, synthesizing OPTIONS and not-found responses
//! - Recover from handler faults through the panic handler
//!
//! # Design Decisions
//! - Paths are literal keys: no normalization, no trailing-slash folding
//! - Registering a (method, path) twice keeps the last handler
//! - Registration needs `&mut Router`; the service freezes the router in an
//!   `Arc` before serving, so the table is lock-free at runtime
//! - Fault recovery wraps the handler future only, never response writing

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::http::request::RequestStart;
use crate::routing::handler::{Handler, HandlerFault, RouteSet, SharedHandler};

/// Exact-match HTTP router.
pub struct Router {
    handle_options: bool,
    not_found: Option<SharedHandler>,
    panic_handler: Option<SharedHandler>,
    routes: HashMap<Method, HashMap<String, SharedHandler>>,
}

impl Router {
    /// Create a router with OPTIONS handling enabled and no fallbacks.
    pub fn new() -> Self {
        Self {
            handle_options: true,
            not_found: None,
            panic_handler: None,
            routes: HashMap::new(),
        }
    }

    /// Handler for requests that match no route.
    pub fn with_not_found(mut self, handler: impl Handler) -> Self {
        self.not_found = Some(Arc::new(handler));
        self
    }

    /// Handler invoked when a handler panics or returns `Err`.
    pub fn with_panic_handler(mut self, handler: impl Handler) -> Self {
        self.panic_handler = Some(Arc::new(handler));
        self
    }

    /// Enable or disable automatic OPTIONS responses.
    pub fn with_handle_options(mut self, enabled: bool) -> Self {
        self.handle_options = enabled;
        self
    }

    /// Register `handler` for `method` at the literal `path`.
    ///
    /// # Panics
    ///
    /// Panics if `path` does not begin with `/`.
    pub fn handle(&mut self, method: Method, path: &str, handler: impl Handler) -> &mut Self {
        assert!(
            path.starts_with('/'),
            "path must begin with '/' in path '{path}'"
        );

        let previous = self
            .routes
            .entry(method.clone())
            .or_default()
            .insert(path.to_string(), Arc::new(handler));

        if previous.is_some() {
            tracing::debug!(method = %method, path = %path, "Route replaced");
        }
        self
    }

    pub fn get(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.handle(Method::GET, path, handler)
    }

    pub fn post(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.handle(Method::POST, path, handler)
    }

    pub fn put(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.handle(Method::PUT, path, handler)
    }

    pub fn patch(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.handle(Method::PATCH, path, handler)
    }

    pub fn delete(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.handle(Method::DELETE, path, handler)
    }

    pub fn options(&mut self, path: &str, handler: impl Handler) -> &mut Self {
        self.handle(Method::OPTIONS, path, handler)
    }

    /// Let each collaborator install its routes.
    pub fn register(&mut self, sets: &[&dyn RouteSet]) {
        for set in sets {
            set.install_routes(self);
        }
    }

    /// Total number of registered (method, path) pairs.
    pub fn route_count(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    fn lookup(&self, method: &Method, path: &str) -> Option<&SharedHandler> {
        self.routes.get(method)?.get(path)
    }

    /// Value of the `Allow` header for synthesized OPTIONS responses.
    ///
    /// Lists every method with at least one route (except OPTIONS) followed
    /// by `OPTIONS`; `None` when nothing else is registered.
    pub fn allowed_methods(&self) -> Option<String> {
        let mut allowed: Vec<&str> = self
            .routes
            .iter()
            .filter(|(method, paths)| **method != Method::OPTIONS && !paths.is_empty())
            .map(|(method, _)| method.as_str())
            .collect();

        if allowed.is_empty() {
            return None;
        }

        allowed.sort_unstable();
        allowed.push("OPTIONS");
        Some(allowed.join(", "))
    }

    /// Dispatch one request to its handler.
    pub async fn dispatch(&self, mut req: Request<Body>) -> Response {
        req.extensions_mut().insert(RequestStart::now());

        if let Some(handler) = self.lookup(req.method(), req.uri().path()) {
            return self.invoke(Arc::clone(handler), req).await;
        }

        if req.method() == Method::OPTIONS && self.handle_options {
            if let Some(allowed) = self.allowed_methods() {
                return options_response(&allowed);
            }
        }

        self.handle_not_found(req).await
    }

    async fn handle_not_found(&self, req: Request<Body>) -> Response {
        match &self.not_found {
            Some(handler) => self.invoke(Arc::clone(handler), req).await,
            None => (StatusCode::NOT_FOUND, "404 page not found").into_response(),
        }
    }

    async fn invoke(&self, handler: SharedHandler, req: Request<Body>) -> Response {
        let Some(panic_handler) = &self.panic_handler else {
            return match handler.call(req).await {
                Ok(response) => response,
                Err(err) => {
                    tracing::error!(error = %err, "Handler failed without a panic handler");
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            };
        };

        let (head, body) = req.into_parts();
        let fallback_head = head.clone();

        let outcome = AssertUnwindSafe(handler.call(Request::from_parts(head, body)))
            .catch_unwind()
            .await;

        let fault = match outcome {
            Ok(Ok(response)) => return response,
            Ok(Err(err)) => HandlerFault::Failed(err.to_string()),
            Err(payload) => HandlerFault::Panicked(panic_message(payload.as_ref())),
        };

        tracing::debug!(
            method = %fallback_head.method,
            path = %fallback_head.uri.path(),
            fault = %fault,
            "Recovering from handler fault"
        );

        let mut req = Request::from_parts(fallback_head, Body::empty());
        req.extensions_mut().insert(fault);

        match panic_handler.call(req).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "Panic handler failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut routes: Vec<(&str, &str)> = self
            .routes
            .iter()
            .flat_map(|(method, paths)| {
                paths.keys().map(move |path| (method.as_str(), path.as_str()))
            })
            .collect();
        routes.sort_unstable();

        f.debug_struct("Router")
            .field("handle_options", &self.handle_options)
            .field("not_found", &self.not_found.is_some())
            .field("panic_handler", &self.panic_handler.is_some())
            .field("routes", &routes)
            .finish()
    }
}

fn options_response(allowed: &str) -> Response {
    let mut response = StatusCode::OK.into_response();
    if let Ok(value) = HeaderValue::from_str(allowed) {
        response.headers_mut().insert(header::ALLOW, value);
    }
    response
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
