//! Top-level trail fetching: network first, offline cache as fallback.
//!
//! Every fetch resolves to a trail list. Failures at any stage (offline,
//! transport, status, timeout, unparseable body) are logged and answered from
//! the cache cell nearest the requested point, which may be empty.

use std::sync::Arc;

use trailhead_trails::cache::OfflineCache;
use trailhead_trails::models::{ActiveFilters, Coordinate, Result, TrailError, TrailRecord};
use trailhead_trails::network::{ConnectivityProbe, DataFetcher};
use trailhead_trails::overpass::{OverpassResponse, TrailQuery, process};

use crate::config::FetchConfig;
use crate::http::{HttpFetcher, overpass_url};

/// Where a result came from
#[derive(Debug, Clone)]
pub enum TrailSource {
    Network,
    /// Served from cache; `reason` is the failure that forced the fallback,
    /// or `None` if the device reported being offline.
    Cache { reason: Option<TrailError> },
}

#[derive(Debug, Clone)]
pub struct FetchReport {
    pub trails: Vec<TrailRecord>,
    pub source: TrailSource,
}

impl FetchReport {
    pub fn is_fresh(&self) -> bool {
        matches!(self.source, TrailSource::Network)
    }
}

/// Cheap to clone; clones share the fetcher, probe and cache.
#[derive(Clone)]
pub struct TrailFetcher {
    fetcher: Arc<dyn DataFetcher>,
    connectivity: Arc<dyn ConnectivityProbe>,
    cache: OfflineCache,
    config: FetchConfig,
}

impl TrailFetcher {
    pub fn new(
        fetcher: Arc<dyn DataFetcher>,
        connectivity: Arc<dyn ConnectivityProbe>,
        cache: OfflineCache,
        config: FetchConfig,
    ) -> Self {
        Self {
            fetcher,
            connectivity,
            cache,
            config,
        }
    }

    /// Fetcher talking to Overpass over HTTP, configured from `config`.
    pub fn with_http(
        connectivity: Arc<dyn ConnectivityProbe>,
        cache: OfflineCache,
        config: FetchConfig,
    ) -> Result<Self> {
        let http = HttpFetcher::new(&config)?;
        Ok(Self::new(Arc::new(http), connectivity, cache, config))
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    pub fn cache(&self) -> &OfflineCache {
        &self.cache
    }

    /// Trails within `radius_m` (default from config) of `center`.
    ///
    /// Never fails; see [`fetch_with_source`](Self::fetch_with_source) to
    /// learn whether the result is fresh.
    pub async fn fetch_nearby_trails(
        &self,
        center: Coordinate,
        radius_m: Option<f64>,
        active_filters: Option<&ActiveFilters>,
    ) -> Vec<TrailRecord> {
        self.fetch_with_source(center, radius_m, active_filters)
            .await
            .trails
    }

    pub async fn fetch_with_source(
        &self,
        center: Coordinate,
        radius_m: Option<f64>,
        active_filters: Option<&ActiveFilters>,
    ) -> FetchReport {
        if !self.connectivity.is_connected().await {
            tracing::info!("offline, serving cached trails near {center:?}");
            return FetchReport {
                trails: self.cache.read_nearest(center).await,
                source: TrailSource::Cache { reason: None },
            };
        }

        let radius_m = radius_m.unwrap_or(self.config.default_radius_m);

        match self.fetch_online(center, radius_m, active_filters).await {
            Ok(trails) => {
                tracing::info!("fetched {} trails near {center:?}", trails.len());
                self.write_through(center, &trails).await;
                FetchReport {
                    trails,
                    source: TrailSource::Network,
                }
            }
            Err(err) => {
                match &err {
                    TrailError::Timeout(_) | TrailError::Network(_) | TrailError::HttpStatus(_) => {
                        tracing::warn!("trail fetch failed, falling back to cache: {err}")
                    }
                    TrailError::MalformedResponse(_) => {
                        tracing::warn!("unusable overpass response, falling back to cache: {err}")
                    }
                    _ => tracing::error!("unexpected trail fetch error: {err}"),
                }

                FetchReport {
                    trails: self.cache.read_nearest(center).await,
                    source: TrailSource::Cache { reason: Some(err) },
                }
            }
        }
    }

    /// Read the cache directly, without touching the network.
    pub async fn cached_trails_near(&self, center: Coordinate) -> Vec<TrailRecord> {
        self.cache.read_nearest(center).await
    }

    async fn fetch_online(
        &self,
        center: Coordinate,
        radius_m: f64,
        active_filters: Option<&ActiveFilters>,
    ) -> Result<Vec<TrailRecord>> {
        let query = TrailQuery::new(center, radius_m);
        let url = overpass_url(&self.config.overpass_url, &query)?;

        tracing::debug!("querying overpass within {radius_m} m of {center:?}");
        let body = tokio::time::timeout(self.config.timeout, self.fetcher.fetch(&url))
            .await
            .map_err(|_| TrailError::Timeout(self.config.timeout))??;

        let response = OverpassResponse::from_slice(&body)?;
        Ok(process(&response, active_filters))
    }

    async fn write_through(&self, center: Coordinate, trails: &[TrailRecord]) {
        if self.config.await_cache_write {
            self.cache.write(center, trails).await;
            return;
        }

        let cache = self.cache.clone();
        let trails = trails.to_vec();
        tokio::spawn(async move {
            cache.write(center, &trails).await;
        });
    }
}
