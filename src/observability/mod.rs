//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Codec writes a response
//!     → access.rs (one AccessRecord per request)
//!     → LogSink (tracing events by default)
//!     → metrics.rs (request counters and latency)
//!
//! Process startup:
//!     → logging.rs (global subscriber from config)
//! ```

pub mod access;
pub mod logging;
pub mod metrics;

pub use access::{AccessLogger, AccessRecord, ErrorDetails, LogSink, MemorySink, TracingSink};
