//! HTTP server integration tests
//!
//! Drives the real router end to end: ingest validation, timestamp
//! normalization across schema versions, retention pruning, and windowed
//! history queries.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use aqualog::config::AppConfig;
use aqualog::server::{build_router, AppState};

/// Router over a fresh store with the given retention window.
fn test_router(retention_days: u32) -> Router {
    let mut config = AppConfig::default();
    config.retention.days = retention_days;
    build_router(Arc::new(AppState::new(config)))
}

/// Retention wide enough that fixed historical timestamps never age out.
fn archival_router() -> Router {
    test_router(36_500)
}

async fn json_request(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let body = match body {
        Some(value) => Body::from(serde_json::to_vec(&value).unwrap()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap_or(json!({}));
    (status, value)
}

async fn get_request(router: &Router, uri: &str) -> (StatusCode, Value) {
    json_request(router, "GET", uri, None).await
}

async fn post_ingest(router: &Router, body: Value) -> (StatusCode, Value) {
    json_request(router, "POST", "/ingest", Some(body)).await
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_empty_store() {
    let router = test_router(1);

    let (status, body) = get_request(&router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["retention_days"], 1);
    assert_eq!(body["count"], 0);
    assert_eq!(body["latest_timestamp"], Value::Null);
}

#[tokio::test]
async fn health_tracks_count_and_latest() {
    let router = archival_router();
    let now = Utc::now();

    post_ingest(&router, json!({"timestamp": now.to_rfc3339()})).await;
    let (status, body) = get_request(&router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["latest_timestamp"], json!(now.to_rfc3339()));
}

// =============================================================================
// Ingest and latest
// =============================================================================

#[tokio::test]
async fn ingest_then_latest_returns_last_appended() {
    let router = archival_router();

    let (status, body) = post_ingest(
        &router,
        json!({"timestamp": "2025-01-01T00:00:00Z", "temperature_f": 78.5}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["stored"], 1);
    assert_eq!(body["count"], 1);
    assert_eq!(body["latest"]["temperature_f"], 78.5);

    let (status, body) = get_request(&router, "/latest").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timestamp"], "2025-01-01T00:00:00+00:00");
    assert_eq!(body["temperature_f"], 78.5);
    assert_eq!(body["tds_us_cm"], Value::Null);
}

#[tokio::test]
async fn legacy_alias_and_naive_timestamp_normalize_like_current_schema() {
    let router = archival_router();

    // Current schema, zone-carrying timestamp.
    let (status, _) = post_ingest(
        &router,
        json!({"timestamp": "2025-01-01T00:00:00Z", "temperature_f": 78.5}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Legacy alias and naive timestamp; both normalize the same way.
    let (status, body) = post_ingest(
        &router,
        json!({"timestamp": "2025-01-01T01:00:00", "temp_f": 79.0}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["latest"]["timestamp"], "2025-01-01T01:00:00+00:00");
    assert_eq!(body["latest"]["temperature_f"], 79.0);
}

#[tokio::test]
async fn empty_legacy_alias_is_unknown_not_zero() {
    let router = archival_router();

    let (status, body) = post_ingest(
        &router,
        json!({"timestamp": "2025-01-01T00:00:00Z", "tds": ""}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["latest"]["tds_us_cm"], Value::Null);
}

#[tokio::test]
async fn latest_is_all_null_before_first_ingest() {
    let router = test_router(1);

    let (status, body) = get_request(&router, "/latest").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timestamp"], Value::Null);
    assert_eq!(body["temperature_f"], Value::Null);
    assert_eq!(body["light_lux"], Value::Null);
}

// =============================================================================
// Ingest validation
// =============================================================================

#[tokio::test]
async fn unparseable_timestamp_is_rejected_and_nothing_stored() {
    let router = archival_router();

    let (status, body) = post_ingest(&router, json!({"timestamp": "not-a-date"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["ok"], false);
    assert!(body["error"].as_str().unwrap().contains("invalid timestamp"));

    let (_, health) = get_request(&router, "/health").await;
    assert_eq!(health["count"], 0);
    assert_eq!(health["latest_timestamp"], Value::Null);
}

#[tokio::test]
async fn missing_timestamp_is_rejected() {
    let router = archival_router();

    let (status, body) = post_ingest(&router, json!({"temperature_f": 78.5})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("timestamp"));
}

#[tokio::test]
async fn non_string_timestamp_is_rejected() {
    let router = archival_router();

    let (status, body) = post_ingest(&router, json!({"timestamp": 1735689600})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("unsupported timestamp type"));
}

// =============================================================================
// Retention
// =============================================================================

#[tokio::test]
async fn readings_older_than_the_window_age_out_on_ingest() {
    let router = test_router(1);
    let now = Utc::now();
    let stale = now - Duration::days(3);

    // Appended, then immediately pruned by the 1-day window.
    let (status, body) = post_ingest(&router, json!({"timestamp": stale.to_rfc3339()})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    // Latest still reflects the most recent ingest even after pruning.
    let (_, latest) = get_request(&router, "/latest").await;
    assert_eq!(latest["timestamp"], json!(stale.to_rfc3339()));

    let (_, body) = post_ingest(&router, json!({"timestamp": now.to_rfc3339()})).await;
    assert_eq!(body["count"], 1);

    let (_, health) = get_request(&router, "/health").await;
    assert_eq!(health["count"], 1);
}

// =============================================================================
// History
// =============================================================================

#[tokio::test]
async fn history_returns_most_recent_matches_in_order() {
    let router = test_router(1);
    let now = Utc::now();

    // Five readings spread over roughly two hours.
    for minutes_ago in [115, 85, 55, 25, 5] {
        let ts = now - Duration::minutes(minutes_ago);
        let (status, _) = post_ingest(&router, json!({"timestamp": ts.to_rfc3339()})).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = get_request(&router, "/history?hours=1&limit=2").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0]["timestamp"],
        json!((now - Duration::minutes(25)).to_rfc3339())
    );
    assert_eq!(
        rows[1]["timestamp"],
        json!((now - Duration::minutes(5)).to_rfc3339())
    );
}

#[tokio::test]
async fn history_defaults_cover_the_last_day() {
    let router = test_router(7);
    let now = Utc::now();

    post_ingest(&router, json!({"timestamp": (now - Duration::days(2)).to_rfc3339()})).await;
    post_ingest(&router, json!({"timestamp": (now - Duration::hours(2)).to_rfc3339()})).await;

    let (status, body) = get_request(&router, "/history").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    // Default 24-hour window excludes the two-day-old reading.
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0]["timestamp"],
        json!((now - Duration::hours(2)).to_rfc3339())
    );
}

#[tokio::test]
async fn history_clamps_invalid_params_instead_of_rejecting() {
    let router = test_router(1);
    let now = Utc::now();
    post_ingest(&router, json!({"timestamp": now.to_rfc3339()})).await;

    for uri in [
        "/history?hours=abc&limit=-5",
        "/history?hours=0&limit=0",
        "/history?hours=-3",
        "/history?limit=999999999",
    ] {
        let (status, body) = get_request(&router, uri).await;
        assert_eq!(status, StatusCode::OK, "uri {uri}");
        assert!(body.is_array(), "uri {uri}");
    }
}

#[tokio::test]
async fn history_is_empty_for_an_empty_store() {
    let router = test_router(1);

    let (status, body) = get_request(&router, "/history").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
