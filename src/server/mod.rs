//! HTTP server assembly
//!
//! Router and CORS wiring over a shared [`ReadingStore`]. The binary only
//! loads configuration, installs tracing, and serves the router built here;
//! keeping assembly in the library lets the integration tests drive the real
//! handlers.

pub mod handlers;
pub mod types;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::AppConfig;
use crate::store::{ReadingStore, SharedStore};

/// Shared application state injected into every handler.
pub struct AppState {
    /// The one store instance; all access goes through its lock.
    pub store: SharedStore,
    /// Startup configuration (retention window, CORS origins).
    pub config: AppConfig,
}

impl AppState {
    /// Fresh state with an empty store.
    pub fn new(config: AppConfig) -> Self {
        Self {
            store: ReadingStore::new_shared(),
            config,
        }
    }
}

/// Build the CORS layer from configuration.
///
/// An empty origin list allows any origin, which is the dashboard-friendly
/// development default; configured origins that fail to parse are skipped.
fn build_cors_layer(cors_origins: &[String]) -> CorsLayer {
    if cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    }
}

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = build_cors_layer(&state.config.security.cors_allowed_origins);
    Router::new()
        .route("/health", get(handlers::health))
        .route("/ingest", post(handlers::ingest))
        .route("/latest", get(handlers::latest))
        .route("/history", get(handlers::history))
        .with_state(state)
        .layer(cors)
}
