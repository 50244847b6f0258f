//! # Error Types
//!
//! Failures raised by the outer layers (configuration, tracker client, chart
//! rendering) share [`AnalyticsError`]. The aggregation core never fails on a
//! single bad record; per-record problems are reported as diagnostics instead,
//! with [`ParseFailure`] describing why a timestamp was rejected.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("request to Jira failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Jira returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to render chart: {0}")]
    Visualization(String),

    #[error("smoothing window must be a positive odd number, got {0}")]
    InvalidWindow(usize),
}

/// Why a tracker timestamp could not be turned into a date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("timestamp is missing")]
    Missing,

    #[error("timestamp `{0}` does not match YYYY-MM-DDTHH:MM:SS")]
    Malformed(String),
}
