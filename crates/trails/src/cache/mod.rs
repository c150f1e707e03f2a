//! Offline cache of processed trail lists.
//!
//! Results are stored per ~1 km grid cell, keyed `trails_<lat>_<lon>` with
//! both coordinates rounded to 2 decimal places. Reads pick whichever cached
//! cell is nearest to the requested point, so a user who moved slightly while
//! offline still gets the trails they saw last.
//!
//! Entries carry their write time but are never expired.

pub mod memory;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::types::{Coordinate, Result, TrailRecord};
use crate::network::traits::KeyValueStore;
use crate::spatial::queries::round_to_hundredths;

pub use memory::MemoryStore;

pub const CACHE_KEY_PREFIX: &str = "trails_";

// ============================================================================
// Keys
// ============================================================================

/// A grid cell, stored as its rounded corner coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CacheKey {
    lat: f64,
    lon: f64,
}

impl CacheKey {
    pub fn for_location(location: Coordinate) -> Self {
        Self {
            lat: round_to_hundredths(location.lat),
            lon: round_to_hundredths(location.lon),
        }
    }

    /// Parse a stored key. Keys from other features return `None`.
    pub fn parse(key: &str) -> Option<Self> {
        let (lat, lon) = key.strip_prefix(CACHE_KEY_PREFIX)?.split_once('_')?;
        let lat: f64 = lat.parse().ok()?;
        let lon: f64 = lon.parse().ok()?;

        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }

        Some(Self::for_location(Coordinate::new(lat, lon)))
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }

    /// Planar distance in rounded-degree space
    pub fn distance_to(&self, other: &CacheKey) -> f64 {
        (self.lat - other.lat).hypot(self.lon - other.lon)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CACHE_KEY_PREFIX}{:.2}_{:.2}", self.lat, self.lon)
    }
}

// ============================================================================
// Entries
// ============================================================================

/// One persisted fetch result
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Epoch milliseconds
    pub timestamp: i64,
    pub data: Vec<TrailRecord>,
}

#[derive(Serialize)]
struct CacheEntryRef<'a> {
    timestamp: i64,
    data: &'a [TrailRecord],
}

impl CacheEntry {
    pub fn written_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// How old the entry is. Nothing in the pipeline acts on this.
    pub fn age(&self) -> Option<chrono::TimeDelta> {
        self.written_at().map(|t| Utc::now() - t)
    }
}

// ============================================================================
// Cache
// ============================================================================

/// Trail cache over any key-value store.
///
/// This type is cheap to clone; clones share the store.
#[derive(Clone)]
pub struct OfflineCache {
    store: Arc<dyn KeyValueStore>,
}

impl OfflineCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Store `trails` for the cell containing `location`, replacing what was
    /// there.
    pub async fn try_write(&self, location: Coordinate, trails: &[TrailRecord]) -> Result<()> {
        let key = CacheKey::for_location(location).to_string();
        let value = serde_json::to_string(&CacheEntryRef {
            timestamp: Utc::now().timestamp_millis(),
            data: trails,
        })?;

        self.store.set(&key, value).await?;
        tracing::debug!("cached {} trails under {key}", trails.len());
        Ok(())
    }

    /// Like [`try_write`](Self::try_write), but failures are only logged.
    pub async fn write(&self, location: Coordinate, trails: &[TrailRecord]) {
        if let Err(e) = self.try_write(location, trails).await {
            tracing::warn!("failed to cache trails near {location:?}: {e}");
        }
    }

    /// Load the entry stored under an exact key
    pub async fn read_entry(&self, key: &CacheKey) -> Result<Option<CacheEntry>> {
        match self.store.get(&key.to_string()).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// The cached cell nearest to `location`, if any cell is cached.
    pub async fn nearest_key(&self, location: Coordinate) -> Result<Option<CacheKey>> {
        let query = CacheKey::for_location(location);
        let keys = self.store.keys_with_prefix(CACHE_KEY_PREFIX).await?;

        let mut best: Option<(CacheKey, f64)> = None;
        for candidate in keys.iter().filter_map(|k| CacheKey::parse(k)) {
            let distance = query.distance_to(&candidate);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((candidate, distance));
            }
        }

        Ok(best.map(|(key, _)| key))
    }

    pub async fn try_read_nearest(&self, location: Coordinate) -> Result<Vec<TrailRecord>> {
        let Some(key) = self.nearest_key(location).await? else {
            tracing::debug!("no cached trails at all");
            return Ok(Vec::new());
        };

        let trails = self
            .read_entry(&key)
            .await?
            .map(|entry| entry.data)
            .unwrap_or_default();

        tracing::debug!("read {} cached trails from {key}", trails.len());
        Ok(trails)
    }

    /// Nearest cached trail list; empty when nothing usable is cached.
    pub async fn read_nearest(&self, location: Coordinate) -> Vec<TrailRecord> {
        match self.try_read_nearest(location).await {
            Ok(trails) => trails,
            Err(e) => {
                tracing::warn!("failed to read cached trails near {location:?}: {e}");
                Vec::new()
            }
        }
    }
}
