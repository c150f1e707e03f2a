use std::time::Duration;

use serde::{Deserialize, Serialize};
use trailhead_trails::overpass::DEFAULT_RADIUS_M;

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for [`TrailFetcher`](crate::fetch::TrailFetcher) and
/// [`HttpFetcher`](crate::http::HttpFetcher).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Overpass interpreter endpoint
    pub overpass_url: String,

    /// Deadline for the whole network round trip
    pub timeout: Duration,

    /// Search radius when the caller doesn't give one
    pub default_radius_m: f64,

    pub user_agent: String,

    /// Wait for the cache write before returning fetched trails. Off by
    /// default so callers aren't held up by storage; short-lived processes
    /// turn it on so the write isn't lost at exit.
    pub await_cache_write: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            default_radius_m: DEFAULT_RADIUS_M,
            user_agent: concat!("trailhead/", env!("CARGO_PKG_VERSION")).to_string(),
            await_cache_write: false,
        }
    }
}

impl FetchConfig {
    pub fn with_overpass_url(mut self, url: impl Into<String>) -> Self {
        self.overpass_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_default_radius(mut self, radius_m: f64) -> Self {
        self.default_radius_m = radius_m;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_await_cache_write(mut self, await_write: bool) -> Self {
        self.await_cache_write = await_write;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.default_radius_m, 5000.0);
        assert!(config.user_agent.starts_with("trailhead/"));
        assert!(!config.await_cache_write);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: FetchConfig =
            serde_json::from_str(r#"{"overpass_url": "http://localhost:12345/api"}"#).unwrap();
        assert_eq!(config.overpass_url, "http://localhost:12345/api");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_builders() {
        let config = FetchConfig::default()
            .with_timeout(Duration::from_secs(3))
            .with_default_radius(250.0)
            .with_await_cache_write(true);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.default_radius_m, 250.0);
        assert!(config.await_cache_write);
    }
}
