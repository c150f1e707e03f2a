//! Distance and similarity utilities.

pub mod queries;
pub mod similarity;

pub use queries::{path_distance_km, round_to_hundredths, segment_distance_km};
pub use similarity::{dedupe_similar, paths_similar};
