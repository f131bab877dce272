//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Severity;

/// Root configuration for a service.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Interface to bind: an IP address or a hostname (e.g., "0.0.0.0", "localhost").
    pub bind_host: String,

    /// Listen port.
    pub port: u16,

    /// Connection string handed to the data-access collaborator.
    pub data_source_name: DataSourceName,

    /// Minimum severity emitted by the log subscriber.
    pub log_level: Severity,

    /// Log output format.
    pub log_format: LogFormat,

    /// Prometheus exporter address (e.g., "0.0.0.0:9090"). Disabled when unset.
    pub metrics_address: Option<String>,
}

impl ServiceConfig {
    /// Address the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 8080,
            data_source_name: DataSourceName::default(),
            log_level: Severity::Debug,
            log_format: LogFormat::Json,
            metrics_address: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

/// Connection string for the data store.
///
/// Its `Debug` output is redacted since it usually embeds credentials.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct DataSourceName(String);

impl DataSourceName {
    pub fn new(dsn: impl Into<String>) -> Self {
        Self(dsn.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for DataSourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("DataSourceName(\"\")")
        } else {
            f.write_str("DataSourceName(****)")
        }
    }
}
