//! Request and response types for the HTTP API
//!
//! The ingest body is taken as a raw JSON object rather than a typed struct
//! so the coalescer can see legacy field names; everything outbound goes
//! through [`ReadingDto`] so timestamps always serialize as RFC 3339 with an
//! explicit offset.

use serde::Serialize;

use crate::store::Reading;

/// Reading as serialized over the wire.
///
/// Absent optional fields serialize as `null`, and the all-`None` value
/// doubles as the explicit "no data yet" shape returned by `/latest` before
/// the first ingest.
#[derive(Debug, Default, Serialize)]
pub struct ReadingDto {
    /// RFC 3339 timestamp with offset, `null` only in the no-data shape
    pub timestamp: Option<String>,
    pub temperature_f: Option<f64>,
    pub tds_us_cm: Option<f64>,
    pub do_mg_per_l: Option<f64>,
    pub gh: Option<f64>,
    pub kh: Option<f64>,
    pub light_lux: Option<f64>,
}

impl ReadingDto {
    /// The explicit no-data shape: every field `null`.
    pub fn no_data() -> Self {
        Self::default()
    }
}

impl From<&Reading> for ReadingDto {
    fn from(reading: &Reading) -> Self {
        Self {
            timestamp: Some(reading.timestamp.to_rfc3339()),
            temperature_f: reading.fields.temperature_f,
            tds_us_cm: reading.fields.tds_us_cm,
            do_mg_per_l: reading.fields.do_mg_per_l,
            gh: reading.fields.gh,
            kh: reading.fields.kh,
            light_lux: reading.fields.light_lux,
        }
    }
}

/// Ingest response
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stored: Option<usize>,
    /// Echo of the reading now considered latest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<ReadingDto>,
    /// Readings retained after pruning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IngestResponse {
    /// Successful ingest of one reading.
    pub fn stored(latest: ReadingDto, count: usize) -> Self {
        Self {
            ok: true,
            stored: Some(1),
            latest: Some(latest),
            count: Some(count),
            error: None,
        }
    }

    /// Rejected ingest; nothing was stored.
    pub fn rejected(message: String) -> Self {
        Self {
            ok: false,
            stored: None,
            latest: None,
            count: None,
            error: Some(message),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// Configured sliding retention window in days
    pub retention_days: u32,
    /// Readings currently retained
    pub count: usize,
    /// RFC 3339 timestamp of the latest reading, if any
    pub latest_timestamp: Option<String>,
}
