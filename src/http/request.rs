//! Request-scoped metadata.
//!
//! # Responsibilities
//! - Stamp the dispatch start time onto each request
//! - Extract client metadata (user agent, referer, peer address) for logging
//!
//! # Design Decisions
//! - The start time lives in the request's typed extensions, so a lookup
//!   can only miss, never mistype
//! - Header values that are not valid UTF-8 are treated as absent

use axum::extract::ConnectInfo;
use axum::http::{header, request::Parts, Extensions, HeaderMap};
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Instant at which the router began dispatching a request.
#[derive(Debug, Clone, Copy)]
pub struct RequestStart(Instant);

impl RequestStart {
    pub fn now() -> Self {
        Self(Instant::now())
    }

    pub fn instant(&self) -> Instant {
        self.0
    }

    /// Time elapsed since dispatch began.
    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }

    /// Read the stamp from request extensions.
    pub fn from_extensions(extensions: &Extensions) -> Option<Self> {
        extensions.get::<RequestStart>().copied()
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: header::HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// `User-Agent` header, if present.
pub fn user_agent(head: &Parts) -> Option<&str> {
    header_str(&head.headers, header::USER_AGENT)
}

/// `Referer` header, if present.
pub fn referer(head: &Parts) -> Option<&str> {
    header_str(&head.headers, header::REFERER)
}

/// Peer address recorded by the transport, if the request came over a socket.
pub fn remote_addr(head: &Parts) -> Option<SocketAddr> {
    head.extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
}
