//! Trail data models, types, and filters.

pub mod filters;
pub mod geocode;
pub mod types;

// Re-exports for convenience
pub use filters::ActiveFilters;
pub use geocode::GeocodeResult;
pub use types::{Coordinate, Result, TrailError, TrailGeometry, TrailRecord, TrailType};
