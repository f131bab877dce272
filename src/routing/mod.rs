//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (stamp start time, exact lookup)
//!     → Matched handler
//!       | OPTIONS synthesis (Allow header)
//!       | not-found handler
//!     → handler fault? → panic handler
//!
//! Route registration (at startup):
//!     RouteSet::install_routes(&mut Router)
//!     → frozen in an Arc before serving
//! ```
//!
//! # Design Decisions
//! - Literal path matching only; no parameters, wildcards or prefixes
//! - Deterministic: same input always matches same handler

pub mod handler;
pub mod router;

pub use handler::{Handler, HandlerFault, HandlerResult, RouteSet, SharedHandler};
pub use router::Router;
