//! Error types for the telemetry service
//!
//! Only the `timestamp` field can fail an ingest request; optional sensor
//! fields that fail numeric conversion are dropped silently by the
//! coalescer and never surface here.

use thiserror::Error;

/// Validation errors raised while accepting an ingest request
///
/// Every variant maps to HTTP 400; nothing is stored when one is raised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// Request body carries no `timestamp` member
    #[error("missing required field 'timestamp'")]
    MissingTimestamp,

    /// Timestamp text could not be parsed as an ISO-8601 date-time
    #[error("invalid timestamp '{given}': expected an ISO-8601 date-time")]
    InvalidTimestamp {
        /// The offending input, echoed back to the client
        given: String,
    },

    /// Timestamp was present but not a string or date-time value
    #[error("unsupported timestamp type: expected an ISO-8601 string")]
    UnsupportedTimestampType,
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
