pub mod config;
pub mod fetch;
pub mod http;
pub mod sqlite;

pub use config::FetchConfig;
pub use fetch::{FetchReport, TrailFetcher, TrailSource};
pub use http::HttpFetcher;
pub use sqlite::SqliteStore;

// Re-export the domain crate so callers need only one dependency
pub use trailhead_trails as trails;
