//! # trailhead-trails
//!
//! Offline-first trail data for the Trailhead map, with pluggable IO.
//!
//! ## Features
//!
//! - **Classification**: every OSM way gets exactly one trail category
//! - **Normalization**: Overpass responses become typed [`TrailRecord`]s with
//!   Haversine lengths
//! - **Offline cache**: results are stored per grid cell and served back by
//!   nearest cell
//! - **Pluggable IO**: bring your own HTTP client, connectivity signal and
//!   key-value store
//!
//! ## Example
//!
//! ```
//! use trailhead_trails::prelude::*;
//!
//! let body = br#"{"elements": [
//!     {"type": "way", "id": 7, "nodes": [1, 2], "tags": {"highway": "cycleway", "name": "Canal Way"}},
//!     {"type": "node", "id": 1, "lat": 51.5074, "lon": -0.1278},
//!     {"type": "node", "id": 2, "lat": 51.5090, "lon": -0.1300}
//! ]}"#;
//!
//! let response = OverpassResponse::from_slice(body).unwrap();
//! let trails = process(&response, None);
//!
//! assert_eq!(trails.len(), 1);
//! assert_eq!(trails[0].trail_type(), TrailType::Cycleway);
//! assert_eq!(trails[0].name(), "Canal Way");
//! ```

pub mod cache;
pub mod classify;
pub mod identifiers;
pub mod models;
pub mod network;
pub mod overpass;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::cache::{CacheEntry, CacheKey, MemoryStore, OfflineCache};
    pub use crate::classify::{classify, RawTagSet};
    pub use crate::identifiers::*;
    pub use crate::models::*;
    pub use crate::network::traits::*;
    pub use crate::overpass::{process, OverpassResponse, TrailQuery, DEFAULT_RADIUS_M};
    pub use crate::spatial::{dedupe_similar, path_distance_km, segment_distance_km};
}

pub use prelude::*;
