//! HTTP pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum transport, Service composition)
//!     → routing::Router::dispatch (stamps request.rs RequestStart)
//!     → handler
//!     → codec.rs (decode body / encode value)
//!     → response.rs (JSON response, status resolution)
//!     → observability::access (one record per response)
//! ```

pub mod codec;
pub mod request;
pub mod response;
pub mod server;

pub use codec::{DecodeError, JsonCodec};
pub use request::RequestStart;
pub use server::{ServeError, Service};
