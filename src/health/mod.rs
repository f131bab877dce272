//! Liveness endpoint.
//!
//! Reports whether the instance is up and able to handle HTTP requests.
//! It does not check the data store.

use axum::body::Body;
use axum::http::{request::Parts, Request};
use axum::response::Response;
use serde::{Deserialize, Serialize};

use crate::error::BoxError;
use crate::http::{JsonCodec, Service};
use crate::registry::Registry;
use crate::routing::{RouteSet, Router};

/// Path where the life state of the instance is reported.
pub const ALIVE_CHECK_PATH: &str = "/health/alive";

/// Body of the liveness response. `status` is always "ok".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Serves the health endpoints.
#[derive(Debug, Clone)]
pub struct HealthHandler {
    codec: JsonCodec,
}

impl HealthHandler {
    pub fn new<R: Registry>(service: &Service<R>) -> Self {
        Self {
            codec: service.codec().clone(),
        }
    }

    /// Answer with an ok status.
    pub fn alive(&self, head: &Parts) -> Response {
        self.codec.write(
            head,
            &HealthStatus {
                status: "ok".to_string(),
            },
        )
    }
}

impl RouteSet for HealthHandler {
    fn install_routes(&self, router: &mut Router) {
        let handler = self.clone();
        router.get(ALIVE_CHECK_PATH, move |req: Request<Body>| {
            let handler = handler.clone();
            async move {
                let (head, _) = req.into_parts();
                Ok::<_, BoxError>(handler.alive(&head))
            }
        });
    }
}
