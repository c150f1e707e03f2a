//! Wire types for Overpass `[out:json]` responses.

use serde::Deserialize;

use crate::classify::RawTagSet;
use crate::models::types::{Coordinate, Result, TrailError};

/// OSM element kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Node,
    Way,
    Relation,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<OverpassElement>,

    /// Set by the server when the query hit a runtime error or timeout
    #[serde(default)]
    pub remark: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OverpassElement {
    Node(NodeElement),
    Way(WayElement),
    Relation(RelationElement),
    #[serde(other)]
    Other,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NodeElement {
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(default)]
    pub tags: RawTagSet,
}

impl NodeElement {
    pub fn coordinate(&self) -> Option<Coordinate> {
        Some(Coordinate::new(self.lat?, self.lon?))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct WayElement {
    pub id: i64,
    /// Ordered node references
    #[serde(default)]
    pub nodes: Vec<i64>,
    #[serde(default)]
    pub tags: RawTagSet,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RelationElement {
    pub id: i64,
    #[serde(default)]
    pub tags: RawTagSet,
}

impl OverpassElement {
    pub fn kind(&self) -> Option<ElementKind> {
        match self {
            OverpassElement::Node(_) => Some(ElementKind::Node),
            OverpassElement::Way(_) => Some(ElementKind::Way),
            OverpassElement::Relation(_) => Some(ElementKind::Relation),
            OverpassElement::Other => None,
        }
    }
}

impl OverpassResponse {
    /// Parse a response body. Anything without an `elements` list is rejected.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let response: OverpassResponse = serde_json::from_slice(body)
            .map_err(|e| TrailError::MalformedResponse(e.to_string()))?;

        if let Some(remark) = &response.remark {
            tracing::warn!("overpass remark: {remark}");
        }

        Ok(response)
    }
}
