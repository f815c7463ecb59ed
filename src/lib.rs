//! Aqualog - in-memory telemetry service for a single aquarium sensor feed
//!
//! The library holds the whole functional core; the server binary is thin
//! plumbing around it:
//!
//! - **`normalize`**: heterogeneous client timestamps -> canonical UTC instants
//! - **`coalesce`**: canonical/legacy sensor field names -> one reading shape
//! - **`store`**: append-only reading history with sliding-window retention
//! - **`config`**: TOML configuration with environment overrides
//! - **`server`**: axum router and handlers over a shared store
//!
//! # Example
//!
//! ```rust
//! use aqualog::normalize::normalize_str;
//! use aqualog::store::ReadingStore;
//!
//! let ts = normalize_str("2025-01-01T00:00:00Z").unwrap();
//! let mut store = ReadingStore::new();
//! store.append(aqualog::store::Reading::at(ts));
//! assert_eq!(store.len(), 1);
//! ```

pub mod coalesce;
pub mod config;
pub mod error;
pub mod normalize;
pub mod server;
pub mod store;

pub use config::AppConfig;
pub use error::IngestError;
pub use store::{Reading, ReadingStore, SharedStore};
