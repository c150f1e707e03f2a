use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use trailhead_core::trails::cache::OfflineCache;
use trailhead_core::trails::models::{ActiveFilters, Coordinate, TrailError, TrailRecord, TrailType};
use trailhead_core::trails::network::ConnectivityProbe;
use trailhead_core::{FetchConfig, SqliteStore, TrailFetcher};

#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum ServiceError {
    #[error("{0}")]
    Storage(String),
    #[error("{0}")]
    Setup(String),
}

impl From<TrailError> for ServiceError {
    fn from(err: TrailError) -> Self {
        match err {
            TrailError::Storage(msg) => ServiceError::Storage(msg),
            other => ServiceError::Setup(other.to_string()),
        }
    }
}

/// Implemented by the host app; reports the platform's connectivity state.
#[uniffi::export(with_foreign)]
pub trait NetworkMonitor: Send + Sync {
    fn is_connected(&self) -> bool;
}

struct MonitorProbe(Arc<dyn NetworkMonitor>);

impl ConnectivityProbe for MonitorProbe {
    fn is_connected<'a>(&'a self) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        let connected = self.0.is_connected();
        Box::pin(async move { connected })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum TrailCategory {
    Bridleway,
    Cycleway,
    Footpath,
    Path,
}

impl From<TrailType> for TrailCategory {
    fn from(value: TrailType) -> Self {
        match value {
            TrailType::Bridleway => TrailCategory::Bridleway,
            TrailType::Cycleway => TrailCategory::Cycleway,
            TrailType::Footpath => TrailCategory::Footpath,
            TrailType::Path => TrailCategory::Path,
        }
    }
}

impl From<TrailCategory> for TrailType {
    fn from(value: TrailCategory) -> Self {
        match value {
            TrailCategory::Bridleway => TrailType::Bridleway,
            TrailCategory::Cycleway => TrailType::Cycleway,
            TrailCategory::Footpath => TrailType::Footpath,
            TrailCategory::Path => TrailType::Path,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, uniffi::Record)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinate> for LatLon {
    fn from(value: Coordinate) -> Self {
        Self {
            latitude: value.lat,
            longitude: value.lon,
        }
    }
}

/// A trail as the map UI sees it. Point trails carry a single coordinate.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct Trail {
    pub id: String,
    pub name: String,
    pub category: TrailCategory,
    pub distance_km: f64,
    pub coordinates: Vec<LatLon>,
}

impl From<&TrailRecord> for Trail {
    fn from(record: &TrailRecord) -> Self {
        let coordinates = match (record.coordinates(), record.point()) {
            (Some(line), _) => line.iter().copied().map(LatLon::from).collect(),
            (None, Some(point)) => vec![point.into()],
            (None, None) => Vec::new(),
        };

        Self {
            id: record.id().to_string(),
            name: record.name().to_string(),
            category: record.trail_type().into(),
            distance_km: record.distance_km(),
            coordinates,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Record)]
pub struct TrailFilters {
    pub bridleway: bool,
    pub footpath: bool,
    pub cycleway: bool,
    pub path: bool,
}

impl From<TrailFilters> for ActiveFilters {
    fn from(value: TrailFilters) -> Self {
        ActiveFilters {
            bridleway: value.bridleway,
            footpath: value.footpath,
            cycleway: value.cycleway,
            path: value.path,
        }
    }
}

fn to_ffi(records: &[TrailRecord]) -> Vec<Trail> {
    records.iter().map(Trail::from).collect()
}

/// Only the trails whose category is switched on.
#[uniffi::export]
pub fn visible_trails(trails: Vec<Trail>, filters: TrailFilters) -> Vec<Trail> {
    let filters = ActiveFilters::from(filters);
    trails
        .into_iter()
        .filter(|t| filters.is_active(t.category.into()))
        .collect()
}

#[derive(uniffi::Object)]
pub struct TrailService {
    fetcher: TrailFetcher,
}

#[uniffi::export(async_runtime = "tokio")]
impl TrailService {
    /// Open (or create) the offline cache at `cache_path`.
    #[uniffi::constructor]
    pub fn new(
        cache_path: String,
        monitor: Arc<dyn NetworkMonitor>,
    ) -> Result<Arc<Self>, ServiceError> {
        crate::logging::setup_logging();

        let store = SqliteStore::open(&cache_path)?;
        let fetcher = TrailFetcher::with_http(
            Arc::new(MonitorProbe(monitor)),
            OfflineCache::new(Arc::new(store)),
            FetchConfig::default(),
        )?;

        tracing::info!("trail service ready, cache at {cache_path}");
        Ok(Arc::new(Self { fetcher }))
    }

    pub async fn fetch_nearby_trails(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: Option<f64>,
        filters: Option<TrailFilters>,
    ) -> Vec<Trail> {
        let filters = filters.map(ActiveFilters::from);
        let trails = self
            .fetcher
            .fetch_nearby_trails(
                Coordinate::new(latitude, longitude),
                radius_meters,
                filters.as_ref(),
            )
            .await;
        to_ffi(&trails)
    }

    pub async fn cached_trails_near(&self, latitude: f64, longitude: f64) -> Vec<Trail> {
        let trails = self
            .fetcher
            .cached_trails_near(Coordinate::new(latitude, longitude))
            .await;
        to_ffi(&trails)
    }
}
