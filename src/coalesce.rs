//! Sensor field coalescing across schema versions
//!
//! Older firmware posts `temp_f` where current firmware posts
//! `temperature_f`, and so on for every probe. Each logical field is
//! resolved canonical-name-first, then alias by alias, taking the first
//! value that converts to a finite number. A field that never converts is
//! simply unknown; a bad optional field never fails the whole request.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Optional sensor values carried by one reading
///
/// Each probe is independently present or absent; absent values serialize
/// as `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorFields {
    /// Water temperature in degrees Fahrenheit
    pub temperature_f: Option<f64>,
    /// Total dissolved solids in microsiemens per centimetre
    pub tds_us_cm: Option<f64>,
    /// Dissolved oxygen in milligrams per litre
    pub do_mg_per_l: Option<f64>,
    /// General hardness in degrees
    pub gh: Option<f64>,
    /// Carbonate hardness in degrees
    pub kh: Option<f64>,
    /// Illuminance at the water surface in lux
    pub light_lux: Option<f64>,
}

/// Resolve raw request fields into the canonical reading shape.
///
/// The `timestamp` member is deliberately not handled here; it is the one
/// required field and is validated by [`crate::normalize`].
pub fn coalesce(raw: &Map<String, Value>) -> SensorFields {
    SensorFields {
        temperature_f: pick(raw, &["temperature_f", "temp_f", "temperature"]),
        tds_us_cm: pick(raw, &["tds_us_cm", "tds", "tds_ppm"]),
        do_mg_per_l: pick(raw, &["do_mg_per_l", "do", "dissolved_oxygen"]),
        gh: pick(raw, &["gh", "gh_dh"]),
        kh: pick(raw, &["kh", "kh_dh"]),
        light_lux: pick(raw, &["light_lux", "lux", "light"]),
    }
}

/// First name in `names` whose value converts to a finite number.
fn pick(raw: &Map<String, Value>, names: &[&str]) -> Option<f64> {
    names.iter().find_map(|name| raw.get(*name).and_then(numeric))
}

/// Lenient numeric conversion for optional sensor values.
///
/// Empty or blank strings mean "no measurement", not zero. Non-finite
/// numbers, malformed text, and non-numeric JSON types all convert to
/// unknown rather than an error.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}
