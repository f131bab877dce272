//! Operational severity of a failure.
//!
//! Severity is orthogonal to [`ErrorKind`](super::ErrorKind): it is carried as
//! log metadata and used as the configured minimum log level, but it never
//! selects an HTTP status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

/// Ordered operational importance, from `Debug` up to `Severe`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Debug,
    Info,
    Warn,
    Error,
    Critical,
    Severe,
}

impl Severity {
    /// All levels in ascending order.
    pub const ALL: [Severity; 6] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Critical,
        Severity::Severe,
    ];

    /// Stable lowercase name of this level.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Critical => "critical",
            Severity::Severe => "severe",
        }
    }

    /// Level for a raw numeric rank (0 = debug), if in range.
    pub fn from_rank(rank: u8) -> Option<Severity> {
        Self::ALL.get(usize::from(rank)).copied()
    }

    /// Name for a raw numeric rank; out-of-range ranks are "unknown".
    pub fn name_of_rank(rank: u8) -> &'static str {
        Self::from_rank(rank).map_or("unknown", Severity::as_str)
    }

    /// The `tracing` filter that lets this severity and everything above through.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Severity::Debug => LevelFilter::DEBUG,
            Severity::Info => LevelFilter::INFO,
            Severity::Warn => LevelFilter::WARN,
            Severity::Error | Severity::Critical | Severity::Severe => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a severity level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown severity level: {0}")]
pub struct ParseSeverityError(String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseSeverityError(s.to_string()))
    }
}
