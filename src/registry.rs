//! Registry: the data-access and logging capabilities shared by handlers.
//!
//! The service never opens, pools or closes connections; whoever builds the
//! registry owns the connection's lifecycle. Registries are shared through
//! `Arc`, so every consumer observes the same connection and log sink.

use std::fmt;
use std::sync::Arc;

use crate::observability::{LogSink, TracingSink};

/// Capability bundle handed to the service and its handlers.
pub trait Registry: Send + Sync + 'static {
    /// Handle to the data store (a pool, a client, ...).
    type Connection: Send + Sync;

    fn connection(&self) -> &Self::Connection;

    /// Sink that receives access records.
    fn log_sink(&self) -> Arc<dyn LogSink>;
}

/// Registry over any connection handle and log sink.
pub struct BasicRegistry<C> {
    connection: C,
    log_sink: Arc<dyn LogSink>,
}

impl<C> BasicRegistry<C> {
    pub fn new(connection: C, log_sink: Arc<dyn LogSink>) -> Self {
        Self {
            connection,
            log_sink,
        }
    }

    /// Registry that logs through `tracing`.
    pub fn with_tracing(connection: C) -> Self {
        Self::new(connection, Arc::new(TracingSink))
    }
}

impl<C: Send + Sync + 'static> Registry for BasicRegistry<C> {
    type Connection = C;

    fn connection(&self) -> &C {
        &self.connection
    }

    fn log_sink(&self) -> Arc<dyn LogSink> {
        Arc::clone(&self.log_sink)
    }
}

impl<C: fmt::Debug> fmt::Debug for BasicRegistry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicRegistry")
            .field("connection", &self.connection)
            .field("log_sink", &self.log_sink)
            .finish()
    }
}
