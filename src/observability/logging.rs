//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the process-wide `tracing` subscriber
//! - Derive the default filter from the configured minimum severity
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level when set
//! - JSON output for production, compact text for development

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ServiceConfig};

/// Error returned when a global subscriber is already installed.
pub type InitError = tracing_subscriber::util::TryInitError;

/// Default filter directive for a configuration.
pub fn default_directive(config: &ServiceConfig) -> String {
    let level = config.log_level.level_filter();
    format!("{level},tower_http={level}").to_lowercase()
}

/// Install the global subscriber for `config`.
pub fn init(config: &ServiceConfig) -> Result<(), InitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init(),
    }
}
