//! In-memory reading store with sliding-window retention
//!
//! The store is the single shared mutable resource in the service. Readings
//! are immutable once appended; retention is a filter over timestamps, never
//! a reorder or an in-place fix-up. All access goes through one
//! `parking_lot::RwLock` (see [`SharedStore`]) so concurrent append, prune,
//! and query are serialized.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::coalesce::SensorFields;

/// Minimum effective history window; smaller requests are clamped up.
pub const MIN_WINDOW_HOURS: i64 = 1;
/// Default history window when the client does not ask for one.
pub const DEFAULT_WINDOW_HOURS: i64 = 24;
/// Upper bound on the history window; keeps arithmetic on client-supplied
/// hours comfortably inside `Duration`'s range.
pub const MAX_WINDOW_HOURS: i64 = 24 * 3_650;
/// Default row cap for history queries.
pub const DEFAULT_HISTORY_LIMIT: usize = 5_000;
/// Hard row cap for history queries, bounding response size regardless of
/// client-supplied values.
pub const MAX_HISTORY_LIMIT: usize = 20_000;

/// One normalized sensor sample
///
/// The timestamp is always an unambiguous UTC instant; naive or
/// offset-carrying client input never reaches a `Reading` unconverted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Canonical UTC instant of the sample
    pub timestamp: DateTime<Utc>,
    /// Optional sensor values
    #[serde(flatten)]
    pub fields: SensorFields,
}

impl Reading {
    /// Reading at `timestamp` with every sensor value unknown.
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            fields: SensorFields::default(),
        }
    }
}

/// Append-only reading history plus the most recent sample.
///
/// Readings are held in arrival order, which is expected (but not enforced)
/// to be roughly chronological. `latest` tracks the last ingested reading
/// independently of the history, so it survives a prune that evicts it from
/// the window - matching what a dashboard wants from "current conditions".
#[derive(Debug, Default)]
pub struct ReadingStore {
    readings: Vec<Reading>,
    latest: Option<Reading>,
}

/// Store handle shared between request handlers.
pub type SharedStore = Arc<RwLock<ReadingStore>>;

impl ReadingStore {
    /// Empty store; created once at process start.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a fresh store for injection into handlers.
    pub fn new_shared() -> SharedStore {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Append one reading and mark it as the latest.
    ///
    /// This is the sole mutation entry point besides [`prune`](Self::prune);
    /// no dedup, no sort-on-insert.
    pub fn append(&mut self, reading: Reading) {
        self.latest = Some(reading);
        self.readings.push(reading);
    }

    /// Most recently ingested reading, if any.
    pub fn latest(&self) -> Option<&Reading> {
        self.latest.as_ref()
    }

    /// Full history in arrival order.
    pub fn all(&self) -> &[Reading] {
        &self.readings
    }

    /// Number of retained readings.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// True before the first ingest or after everything aged out.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Drop every reading older than `now - window`.
    ///
    /// A filter, not a truncation by count: arrival order is preserved and
    /// nothing is reordered. Runs after every successful append rather than
    /// on a timer, so an idle store shrinks only on the next ingest.
    pub fn prune(&mut self, now: DateTime<Utc>, window: Duration) {
        let cutoff = now - window;
        self.readings.retain(|r| r.timestamp >= cutoff);
    }

    /// Readings within `window` of `now`, capped at the `limit` most recent.
    ///
    /// When more than `limit` readings match, the tail of the filtered
    /// sequence is kept, so the result is always the most recent matches in
    /// chronological order. Filtering here (and not only in `prune`) keeps
    /// the retention invariant at query time even when the service has been
    /// idle since the last ingest.
    pub fn history(&self, now: DateTime<Utc>, window: Duration, limit: usize) -> Vec<Reading> {
        let cutoff = now - window;
        let matched: Vec<Reading> = self
            .readings
            .iter()
            .filter(|r| r.timestamp >= cutoff)
            .copied()
            .collect();
        let skip = matched.len().saturating_sub(limit.max(1));
        matched.into_iter().skip(skip).collect()
    }
}

/// Clamp a client-supplied window into `[MIN_WINDOW_HOURS, MAX_WINDOW_HOURS]`.
pub fn clamp_window_hours(hours: i64) -> i64 {
    hours.clamp(MIN_WINDOW_HOURS, MAX_WINDOW_HOURS)
}

/// Clamp a client-supplied row cap into `[1, MAX_HISTORY_LIMIT]`.
pub fn clamp_limit(limit: usize) -> usize {
    limit.clamp(1, MAX_HISTORY_LIMIT)
}
