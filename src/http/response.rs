//! Response construction.
//!
//! # Responsibilities
//! - Build JSON responses with the right content type
//! - Resolve caller-supplied numeric status codes
//!
//! # Design Decisions
//! - A zero status means "unset" and becomes 200
//! - Numbers that are not HTTP statuses become 500 rather than a panic

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;

/// Last-resort body when even the error envelope cannot be encoded.
pub(crate) const FALLBACK_ERROR_BODY: &[u8] = br#"{"error":"Internal Server Error"}"#;

/// Map a numeric code onto a status.
pub fn resolve_status(code: u16) -> StatusCode {
    if code == 0 {
        return StatusCode::OK;
    }

    StatusCode::from_u16(code).unwrap_or_else(|_| {
        tracing::warn!(code, "Invalid status code; responding with 500");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Response with a JSON body.
pub fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
