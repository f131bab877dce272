//! JSON request/response codec.
//!
//! Every `write*` call encodes the value, builds the response and records
//! exactly one access log entry, so a handler cannot answer without logging.

use axum::body::Body;
use axum::http::{request::Parts, StatusCode};
use axum::response::Response;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;

use crate::error::{ClassifiedError, ErrorKind, Severity};
use crate::http::response::{json_response, resolve_status, FALLBACK_ERROR_BODY};
use crate::observability::AccessLogger;

/// Error type for request body decoding.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("failed to read request body: {0}")]
    Read(#[source] axum::Error),

    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<DecodeError> for ClassifiedError {
    fn from(err: DecodeError) -> Self {
        ClassifiedError::with_cause(err, ErrorKind::BadRequest, Severity::Info)
            .with_op("decodeRequest")
    }
}

/// Reads JSON request bodies and writes JSON responses.
#[derive(Debug, Clone)]
pub struct JsonCodec {
    logger: AccessLogger,
}

impl JsonCodec {
    pub fn new(logger: AccessLogger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &AccessLogger {
        &self.logger
    }

    /// Decode a JSON body into `T`.
    ///
    /// The body is consumed, so it is released whether decoding succeeds or not.
    pub async fn read_json<T: DeserializeOwned>(&self, body: Body) -> Result<T, DecodeError> {
        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(DecodeError::Read)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Write `value` with status 200.
    ///
    /// `value` must be `'static` (the `Any` bound), since the access logger
    /// inspects it for a [`ClassifiedError`]. Borrowing response types have to
    /// own their data or be converted to a `serde_json::Value` first.
    pub fn write<T: Serialize + Any>(&self, head: &Parts, value: &T) -> Response {
        self.write_code(head, StatusCode::OK.as_u16(), value)
    }

    /// Write `value` with an explicit status (0 means 200).
    ///
    /// A [`ClassifiedError`] is written as its wire body.
    pub fn write_code<T: Serialize + Any>(&self, head: &Parts, code: u16, value: &T) -> Response {
        let status = resolve_status(code);
        match serde_json::to_vec(value) {
            Ok(body) => {
                let response = json_response(status, body);
                self.logger.record(head, status, value);
                response
            }
            Err(err) => self.write_encode_failure(head, err),
        }
    }

    /// Write an error with status 500.
    pub fn write_error(&self, head: &Parts, err: &ClassifiedError) -> Response {
        self.write_error_code(head, StatusCode::INTERNAL_SERVER_ERROR.as_u16(), err)
    }

    /// Write an error with a caller-forced status.
    pub fn write_error_code(&self, head: &Parts, code: u16, err: &ClassifiedError) -> Response {
        self.write_code(head, code, err)
    }

    // Does not go back through write_code: the envelope is encoded here once.
    fn write_encode_failure(&self, head: &Parts, cause: serde_json::Error) -> Response {
        let err =
            ClassifiedError::with_cause(cause, ErrorKind::InternalServerError, Severity::Critical)
                .with_op("encodeResponse");
        let body = serde_json::to_vec(&err.wire_body())
            .unwrap_or_else(|_| FALLBACK_ERROR_BODY.to_vec());

        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let response = json_response(status, body);
        self.logger.record(head, status, &err);
        response
    }
}
