//! Minimal HTTP service scaffold.
//!
//! An exact-match router paired with a uniform JSON pipeline: every
//! response, including framework-generated not-found and fault responses,
//! is encoded by the same codec and produces exactly one access record.

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod routing;

pub use config::ServiceConfig;
pub use error::{ClassifiedError, ErrorKind, Severity};
pub use http::{JsonCodec, Service};
pub use lifecycle::Shutdown;
pub use registry::{BasicRegistry, Registry};
pub use routing::{Handler, HandlerResult, RouteSet, Router};
