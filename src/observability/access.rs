//! Access logging.
//!
//! # Responsibilities
//! - Build one structured record per handled request
//! - Attach error classification when the response carried a `ClassifiedError`
//! - Hand records to a pluggable sink
//!
//! # Design Decisions
//! - Log level follows the transport outcome: status >= 500 is Error,
//!   everything else Info. An error's own severity is carried as a field
//!   and never changes the level.
//! - A request that never went through the router has no start stamp; its
//!   duration is logged as zero with a warning instead of failing the write
//! - A recovered handler fault is logged with the record but never written
//!   to the client

use axum::http::{request::Parts, StatusCode};
use std::any::Any;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::Level;

use crate::error::{ClassifiedError, ErrorKind};
use crate::http::request::{self, RequestStart};
use crate::observability::metrics;
use crate::routing::HandlerFault;

/// Classification details attached to records of error responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    pub cause: String,
    pub operation: String,
    pub kind: ErrorKind,
    pub severity: &'static str,
}

/// One handled request.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessRecord {
    pub level: Level,
    pub path: String,
    pub method: String,
    pub status: u16,
    pub user_agent: String,
    pub remote_addr: String,
    pub referer: String,
    pub duration: Duration,
    pub error: Option<ErrorDetails>,
    /// Failure of the handler the panic handler stood in for.
    pub fault: Option<String>,
}

/// Destination for access records.
pub trait LogSink: Send + Sync + std::fmt::Debug {
    fn emit(&self, record: AccessRecord);
}

/// Emits every record as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

macro_rules! access_event {
    ($level:expr, $record:expr) => {{
        let record = $record;
        let error = record.error.as_ref();
        tracing::event!(
            $level,
            path = %record.path,
            method = %record.method,
            code = record.status,
            user_agent = %record.user_agent,
            remote_addr = %record.remote_addr,
            referer = %record.referer,
            duration = ?record.duration,
            error = error.map(|e| e.cause.as_str()),
            operation = error.map(|e| e.operation.as_str()),
            kind = error.map(|e| e.kind.as_str()),
            severity = error.map(|e| e.severity),
            fault = record.fault.as_deref(),
            "Request handled"
        );
    }};
}

impl LogSink for TracingSink {
    fn emit(&self, record: AccessRecord) {
        if record.level == Level::ERROR {
            access_event!(Level::ERROR, &record);
        } else {
            access_event!(Level::INFO, &record);
        }
    }
}

/// Keeps records in memory. Useful for tests and for embedding applications
/// that forward records elsewhere.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<AccessRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records emitted so far.
    pub fn records(&self) -> Vec<AccessRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return all records.
    pub fn take(&self) -> Vec<AccessRecord> {
        std::mem::take(&mut *self.records.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemorySink {
    fn emit(&self, record: AccessRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}

/// Builds access records and forwards them to a sink.
#[derive(Debug, Clone)]
pub struct AccessLogger {
    sink: Arc<dyn LogSink>,
}

impl AccessLogger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Record the outcome of one request.
    ///
    /// `value` is whatever was written to the client; when it is a
    /// [`ClassifiedError`] its classification is attached to the record.
    pub fn record(&self, head: &Parts, status: StatusCode, value: &dyn Any) {
        let record = build_record(head, status, value);
        metrics::record_response(&record);
        self.sink.emit(record);
    }
}

fn build_record(head: &Parts, status: StatusCode, value: &dyn Any) -> AccessRecord {
    let level = if status.is_server_error() {
        Level::ERROR
    } else {
        Level::INFO
    };

    let error = value
        .downcast_ref::<ClassifiedError>()
        .map(|err| ErrorDetails {
            cause: err.to_string(),
            operation: err.op().to_string(),
            kind: err.kind(),
            severity: err.severity().as_str(),
        });

    AccessRecord {
        level,
        path: head.uri.path().to_string(),
        method: head.method.to_string(),
        status: status.as_u16(),
        user_agent: request::user_agent(head).unwrap_or_default().to_string(),
        remote_addr: request::remote_addr(head)
            .map(|addr| addr.to_string())
            .unwrap_or_default(),
        referer: request::referer(head).unwrap_or_default().to_string(),
        duration: duration_since_start(head),
        error,
        fault: head
            .extensions
            .get::<HandlerFault>()
            .map(|fault| fault.to_string()),
    }
}

fn duration_since_start(head: &Parts) -> Duration {
    match RequestStart::from_extensions(&head.extensions) {
        Some(start) => start.elapsed(),
        None => {
            tracing::warn!(
                path = %head.uri.path(),
                method = %head.method,
                "Request has no start time; logging zero duration"
            );
            Duration::ZERO
        }
    }
}
