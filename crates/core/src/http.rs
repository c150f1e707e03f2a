//! reqwest-backed [`DataFetcher`].

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use trailhead_trails::models::{Result, TrailError};
use trailhead_trails::network::DataFetcher;
use trailhead_trails::overpass::TrailQuery;

use crate::config::FetchConfig;

/// GET requests over a shared reqwest client.
///
/// This type is cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| TrailError::Network(format!("failed to build http client: {e}")))?;

        Ok(Self::with_client(client, config.timeout))
    }

    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    fn map_error(&self, err: reqwest::Error) -> TrailError {
        if err.is_timeout() {
            TrailError::Timeout(self.timeout)
        } else {
            TrailError::Network(err.to_string())
        }
    }
}

impl DataFetcher for HttpFetcher {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| self.map_error(e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(TrailError::HttpStatus(status.as_u16()));
            }

            let body = response.bytes().await.map_err(|e| self.map_error(e))?;
            tracing::debug!("fetched {} bytes", body.len());
            Ok(body.to_vec())
        })
    }
}

/// Full GET URL for a query, with the QL in the `data` parameter.
pub fn overpass_url(endpoint: &str, query: &TrailQuery) -> Result<String> {
    reqwest::Url::parse_with_params(endpoint, &[("data", query.to_ql())])
        .map(String::from)
        .map_err(|e| TrailError::Network(format!("invalid overpass endpoint {endpoint}: {e}")))
}
