//! Pluggable networking and storage traits.
//!
//! External crates implement these to provide data fetching, connectivity
//! and persistence. Tests use in-memory fakes.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::models::types::Result;

/// Fetch raw bytes from a URL
pub trait DataFetcher: Send + Sync {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;
}

/// Host platform's "is connected" signal
pub trait ConnectivityProbe: Send + Sync {
    fn is_connected<'a>(&'a self) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>>;
}

/// String key-value persistence
pub trait KeyValueStore: Send + Sync {
    fn get<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + 'a>>;

    /// Insert or replace
    fn set<'a>(
        &'a self,
        key: &'a str,
        value: String,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

    /// All stored keys starting with `prefix`, in a stable order
    fn keys_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + 'a>>;
}

/// Connectivity from a flag the host flips
#[derive(Debug, Default)]
pub struct FixedConnectivity {
    connected: AtomicBool,
}

impl FixedConnectivity {
    pub fn new(connected: bool) -> Self {
        Self {
            connected: AtomicBool::new(connected),
        }
    }

    pub fn online() -> Self {
        Self::new(true)
    }

    pub fn offline() -> Self {
        Self::new(false)
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }
}

impl ConnectivityProbe for FixedConnectivity {
    fn is_connected<'a>(&'a self) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        let connected = self.connected.load(Ordering::Relaxed);
        Box::pin(async move { connected })
    }
}
