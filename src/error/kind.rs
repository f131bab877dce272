//! Error kinds and their HTTP status families.

use axum::http::StatusCode;
use std::fmt;

/// Classification of a failure that decides the HTTP status sent to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The requested resource does not exist (404).
    NotFound,
    /// The caller is not authenticated (401).
    Unauthorized,
    /// The request could not be understood (400).
    BadRequest,
    /// The request took too long (408).
    RequestTimeout,
    /// Something failed on our side (500).
    InternalServerError,
}

impl ErrorKind {
    /// Canonical numeric status code for this kind.
    pub fn code(self) -> u16 {
        self.status().as_u16()
    }

    /// Canonical status code for this kind.
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            ErrorKind::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable name used in log records.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::BadRequest => "BadRequest",
            ErrorKind::RequestTimeout => "RequestTimeout",
            ErrorKind::InternalServerError => "InternalServerError",
        }
    }

    /// Reason phrase of the canonical status (e.g. "Not Found").
    pub(crate) fn reason(self) -> &'static str {
        self.status().canonical_reason().unwrap_or("Unknown Error")
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
