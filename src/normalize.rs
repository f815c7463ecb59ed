//! Timestamp normalization
//!
//! Sensor firmware revisions disagree on how they write timestamps: some
//! send a trailing `Z`, some an explicit offset, and the oldest send naive
//! ISO-8601 with no zone at all. Everything is resolved here into one
//! canonical `DateTime<Utc>` before a reading is stored, so no ambiguous
//! timestamp ever reaches the store.
//!
//! Rules:
//!
//! - Offset-carrying input (including `Z`) is converted to UTC.
//! - Naive input is taken as already-UTC; no local-timezone guessing.
//! - Sub-second precision is preserved.
//! - Anything else is an [`IngestError`] and the request is rejected.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde_json::Value;

use crate::error::IngestError;

/// Naive formats accepted when the input carries no offset, tried in order.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Accepted timestamp input shapes
///
/// One tagged union resolved by [`normalize`] with a single fallback error,
/// rather than duck-typed coercion at each call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTimestamp {
    /// ISO-8601 text, with or without zone information
    Text(String),
    /// Already-parsed date-time carrying an offset
    Instant(DateTime<FixedOffset>),
}

/// Resolve a raw timestamp into a canonical UTC instant.
pub fn normalize(raw: &RawTimestamp) -> Result<DateTime<Utc>, IngestError> {
    match raw {
        RawTimestamp::Instant(dt) => Ok(dt.with_timezone(&Utc)),
        RawTimestamp::Text(text) => normalize_str(text),
    }
}

/// Parse an ISO-8601-like string into a UTC instant.
///
/// Offset-carrying forms go through RFC 3339 parsing; naive forms fall back
/// to [`NAIVE_FORMATS`] and are interpreted as UTC.
pub fn normalize_str(text: &str) -> Result<DateTime<Utc>, IngestError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(IngestError::MissingTimestamp);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    Err(IngestError::InvalidTimestamp {
        given: trimmed.to_string(),
    })
}

/// Resolve the `timestamp` member of a raw JSON ingest payload.
///
/// Strings are the only accepted JSON shape. A missing key, `null`, or any
/// other JSON type rejects the whole request before anything is stored.
pub fn normalize_json(value: Option<&Value>) -> Result<DateTime<Utc>, IngestError> {
    match value {
        None | Some(Value::Null) => Err(IngestError::MissingTimestamp),
        Some(Value::String(text)) => normalize_str(text),
        Some(_) => Err(IngestError::UnsupportedTimestampType),
    }
}
