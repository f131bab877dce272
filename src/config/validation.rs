//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the bind host is an IP or hostname and the metrics address parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>

use std::net::{IpAddr, SocketAddr};

use crate::config::schema::ServiceConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("bind_host must not be empty")]
    EmptyBindHost,

    #[error("bind_host {0:?} is not an IP address or hostname")]
    InvalidBindHost(String),

    #[error("metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("metrics_address {0} collides with the service listener")]
    MetricsAddressInUse(SocketAddr),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let bind_ip = if config.bind_host.is_empty() {
        errors.push(ValidationError::EmptyBindHost);
        None
    } else {
        match config.bind_host.parse::<IpAddr>() {
            Ok(ip) => Some(ip),
            Err(_) if is_hostname(&config.bind_host) => None,
            Err(_) => {
                errors.push(ValidationError::InvalidBindHost(config.bind_host.clone()));
                None
            }
        }
    };

    if let Some(raw) = &config.metrics_address {
        match raw.parse::<SocketAddr>() {
            Ok(addr) => {
                let collides = config.port != 0
                    && addr.port() == config.port
                    && bind_ip.is_some_and(|ip| {
                        ip == addr.ip() || ip.is_unspecified() || addr.ip().is_unspecified()
                    });
                if collides {
                    errors.push(ValidationError::MetricsAddressInUse(addr));
                }
            }
            Err(_) => errors.push(ValidationError::InvalidMetricsAddress(raw.clone())),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// Resolution is left to the listener; this only checks the shape.
fn is_hostname(host: &str) -> bool {
    host.len() <= 253
        && host.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
