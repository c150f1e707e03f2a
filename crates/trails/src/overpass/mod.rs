//! Overpass API query building and response processing.

pub mod process;
pub mod query;
pub mod response;

pub use process::{process, NodeIndex};
pub use query::{TrailQuery, DEFAULT_RADIUS_M};
pub use response::{ElementKind, OverpassElement, OverpassResponse};
