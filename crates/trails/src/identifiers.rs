//! Type-safe identifiers for trail records.
//!
//! Identifiers use Arc<str> for cheap cloning, since trail lists are cloned
//! between the fetch path, the cache and the UI.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::overpass::response::ElementKind;

/// Stable identifier of a trail record, e.g. `osm-123`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrailIdentifier(Arc<str>);

impl TrailIdentifier {
    pub fn new(s: impl AsRef<str>) -> Self {
        Self(s.as_ref().into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrailIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TrailIdentifier {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for TrailIdentifier {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// Hand-written so serde's `rc` feature isn't needed for `Arc<str>`
impl Serialize for TrailIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TrailIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

impl TrailIdentifier {
    /// Identifier for an OSM element.
    ///
    /// Ways keep the short `osm-<id>` form; other element kinds carry their
    /// kind in the prefix so a way and a relation sharing a numeric id never
    /// collide.
    pub fn for_element(kind: ElementKind, id: i64) -> Self {
        match kind {
            ElementKind::Way => Self::new(format!("osm-{id}")),
            ElementKind::Relation => Self::new(format!("osm-relation-{id}")),
            ElementKind::Node => Self::new(format!("osm-node-{id}")),
        }
    }
}
