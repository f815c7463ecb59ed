//! HTTP handlers
//!
//! Only `/ingest` can fail, and only over the timestamp; validation happens
//! before the store lock is taken, so a rejected request leaves the store
//! and latest pointer untouched. `/health`, `/latest`, and `/history` never
//! produce error statuses - empty stores and invalid query parameters come
//! back as well-formed responses.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::types::{HealthResponse, IngestResponse, ReadingDto};
use super::AppState;
use crate::coalesce;
use crate::normalize;
use crate::store::{
    clamp_limit, clamp_window_hours, Reading, DEFAULT_HISTORY_LIMIT, DEFAULT_WINDOW_HOURS,
};

/// Health check: store size and the latest timestamp, never an error.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let store = state.store.read();
    Json(HealthResponse {
        ok: true,
        retention_days: state.config.retention.days,
        count: store.len(),
        latest_timestamp: store.latest().map(|r| r.timestamp.to_rfc3339()),
    })
}

/// Ingest one reading.
///
/// The timestamp is validated first; on failure the request is rejected
/// with 400 and nothing is stored. Optional sensor fields are coalesced
/// leniently and can never fail the request. Append and prune run under a
/// single write-lock acquisition.
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Map<String, Value>>,
) -> impl IntoResponse {
    let timestamp = match normalize::normalize_json(body.get("timestamp")) {
        Ok(ts) => ts,
        Err(e) => {
            warn!(error = %e, "rejected ingest");
            return (
                StatusCode::BAD_REQUEST,
                Json(IngestResponse::rejected(e.to_string())),
            );
        }
    };

    let reading = Reading {
        timestamp,
        fields: coalesce::coalesce(&body),
    };

    let now = Utc::now();
    let window = state.config.retention_window();
    let mut store = state.store.write();
    store.append(reading);
    store.prune(now, window);
    let count = store.len();
    drop(store);

    debug!(timestamp = %reading.timestamp, count, "stored reading");
    (
        StatusCode::OK,
        Json(IngestResponse::stored(ReadingDto::from(&reading), count)),
    )
}

/// Latest reading, or the all-null no-data shape before the first ingest.
pub async fn latest(State(state): State<Arc<AppState>>) -> Json<ReadingDto> {
    let store = state.store.read();
    Json(store.latest().map(ReadingDto::from).unwrap_or_else(ReadingDto::no_data))
}

/// Windowed history, most recent `limit` readings in chronological order.
///
/// Query parameters are parsed leniently: anything that fails to parse
/// falls back to its default, and out-of-range values are clamped. The
/// endpoint never rejects a request.
pub async fn history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<ReadingDto>> {
    let hours = params
        .get("hours")
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(DEFAULT_WINDOW_HOURS);
    let limit = params
        .get("limit")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_HISTORY_LIMIT);

    let window = Duration::hours(clamp_window_hours(hours));
    let limit = clamp_limit(limit);

    let store = state.store.read();
    let rows = store.history(Utc::now(), window, limit);
    Json(rows.iter().map(ReadingDto::from).collect())
}
