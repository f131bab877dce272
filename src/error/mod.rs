//! Error model.
//!
//! # Responsibilities
//! - Classify failures by kind (HTTP status family) and severity
//! - Carry an optional operation tag naming the step that failed
//! - Produce the client-facing wire body
//!
//! # Design Decisions
//! - Kind alone selects the HTTP status; severity is log metadata only
//! - The wire body exposes the cause text and nothing else
//! - A classified error always has a non-empty cause message

mod kind;
mod severity;

pub use kind::ErrorKind;
pub use severity::{ParseSeverityError, Severity};

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use axum::http::StatusCode;

/// Type-erased error used for causes and handler faults.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Short label identifying which logical step failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Op(String);

impl Op {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Op {
    fn from(op: &str) -> Self {
        Op(op.to_string())
    }
}

impl From<String> for Op {
    fn from(op: String) -> Self {
        Op(op)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// JSON body sent to clients for every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Plain-message cause for errors created from a string.
#[derive(Debug)]
struct Message(String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Message {}

/// A failure classified by kind and severity, optionally tagged with an operation.
///
/// Serializing a `ClassifiedError` yields its [`ErrorBody`], so it can be passed
/// to any JSON writer and still produce the error envelope. The conversion is
/// one-way; there is no `Deserialize` impl.
#[derive(Debug, thiserror::Error)]
#[error("{cause}")]
pub struct ClassifiedError {
    op: Op,
    kind: ErrorKind,
    severity: Severity,
    #[source]
    cause: BoxError,
}

impl ClassifiedError {
    /// Classify a plain message.
    ///
    /// An empty message is replaced by the kind's reason phrase.
    pub fn new(message: impl Into<String>, kind: ErrorKind, severity: Severity) -> Self {
        let mut message = message.into();
        if message.is_empty() {
            message = kind.reason().to_string();
        }
        Self {
            op: Op::default(),
            kind,
            severity,
            cause: Box::new(Message(message)),
        }
    }

    /// Classify an underlying error.
    pub fn with_cause(
        cause: impl Into<BoxError>,
        kind: ErrorKind,
        severity: Severity,
    ) -> Self {
        let cause = cause.into();
        if cause.to_string().is_empty() {
            return Self::new(String::new(), kind, severity);
        }
        Self {
            op: Op::default(),
            kind,
            severity,
            cause,
        }
    }

    /// Tag the error with the operation that detected it.
    pub fn set_op(&mut self, op: impl Into<Op>) {
        self.op = op.into();
    }

    /// Builder form of [`set_op`](Self::set_op).
    pub fn with_op(mut self, op: impl Into<Op>) -> Self {
        self.set_op(op);
        self
    }

    pub fn op(&self) -> &Op {
        &self.op
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The underlying cause.
    pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.cause.as_ref()
    }

    /// HTTP status for this error's kind.
    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    /// Client-facing body: the cause text only.
    pub fn wire_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.cause.to_string(),
        }
    }
}

impl Serialize for ClassifiedError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.wire_body().serialize(serializer)
    }
}
