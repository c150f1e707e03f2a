//! Network and IO abstractions.

pub mod traits;

pub use traits::{ConnectivityProbe, DataFetcher, FixedConnectivity, KeyValueStore};
