//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): handled requests by method, status
//! - `http_request_duration_seconds` (histogram): latency by method
//!
//! # Design Decisions
//! - Recorded from access records, so every written response is counted once
//! - Without an installed recorder the `metrics` macros are no-ops

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::observability::access::AccessRecord;

/// Count one handled request and its latency.
pub fn record_response(record: &AccessRecord) {
    metrics::counter!(
        "http_requests_total",
        "method" => record.method.clone(),
        "status" => record.status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => record.method.clone()
    )
    .record(record.duration.as_secs_f64());
}

/// Install the Prometheus exporter, serving scrapes on `addr`.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}
