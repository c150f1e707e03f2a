//! Core data types and enums for trail data.

use std::time::Duration;

use geo::Point;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::identifiers::TrailIdentifier;
use crate::spatial::queries::{path_distance_km, round_to_hundredths};

// ============================================================================
// Enums
// ============================================================================

/// Display/filter category of a trail.
///
/// Variants are declared in classification precedence order: a multi-use way
/// that could be several categories is labelled with the earliest one.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum TrailType {
    Bridleway,
    Cycleway,
    Footpath,
    Path,
}

impl TrailType {
    /// Name used for trails the source left unnamed, e.g. "Footpath Path".
    pub fn default_name(self) -> String {
        format!("{self} Path")
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// A WGS84 position in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl From<Coordinate> for Point {
    fn from(c: Coordinate) -> Self {
        Point::new(c.lon, c.lat)
    }
}

impl From<Point> for Coordinate {
    fn from(p: Point) -> Self {
        Coordinate::new(p.y(), p.x())
    }
}

/// Where a trail is on the map.
///
/// Serialized flat into the record, so a line shows up as a `coordinates`
/// array and a point as `lat`/`lon` fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrailGeometry {
    Line { coordinates: Vec<Coordinate> },
    Point { lat: f64, lon: f64 },
}

/// A normalized trail, ready for display or caching.
///
/// Deserialized records go through the same checks as the constructors: a
/// line needs at least 2 points and its stored distance is recomputed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrailRecord")]
pub struct TrailRecord {
    id: TrailIdentifier,
    name: String,
    #[serde(rename = "type")]
    trail_type: TrailType,
    /// Kilometers, rounded to 2 decimal places
    distance: f64,
    #[serde(flatten)]
    geometry: TrailGeometry,
}

#[derive(Deserialize)]
struct RawTrailRecord {
    id: TrailIdentifier,
    name: String,
    #[serde(rename = "type")]
    trail_type: TrailType,
    #[serde(flatten)]
    geometry: TrailGeometry,
}

impl TryFrom<RawTrailRecord> for TrailRecord {
    type Error = String;

    fn try_from(raw: RawTrailRecord) -> std::result::Result<Self, Self::Error> {
        match raw.geometry {
            TrailGeometry::Line { coordinates } => {
                let points = coordinates.len();
                TrailRecord::from_line(raw.id.clone(), Some(raw.name), raw.trail_type, coordinates)
                    .ok_or_else(|| format!("trail {} has {points} points, need at least 2", raw.id))
            }
            TrailGeometry::Point { lat, lon } => Ok(TrailRecord::from_point(
                raw.id,
                Some(raw.name),
                raw.trail_type,
                Coordinate::new(lat, lon),
            )),
        }
    }
}

impl TrailRecord {
    /// Build a record for a linear trail.
    ///
    /// Returns `None` when fewer than 2 points are given. The distance is
    /// always derived from the coordinates.
    pub fn from_line(
        id: TrailIdentifier,
        name: Option<String>,
        trail_type: TrailType,
        coordinates: Vec<Coordinate>,
    ) -> Option<Self> {
        if coordinates.len() < 2 {
            return None;
        }

        Some(Self {
            id,
            name: name.unwrap_or_else(|| trail_type.default_name()),
            trail_type,
            distance: round_to_hundredths(path_distance_km(&coordinates)),
            geometry: TrailGeometry::Line { coordinates },
        })
    }

    /// Build a marker-only record (e.g. a route relation without geometry).
    pub fn from_point(
        id: TrailIdentifier,
        name: Option<String>,
        trail_type: TrailType,
        location: Coordinate,
    ) -> Self {
        Self {
            id,
            name: name.unwrap_or_else(|| trail_type.default_name()),
            trail_type,
            distance: 0.0,
            geometry: TrailGeometry::Point {
                lat: location.lat,
                lon: location.lon,
            },
        }
    }

    pub fn id(&self) -> &TrailIdentifier {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trail_type(&self) -> TrailType {
        self.trail_type
    }

    pub fn distance_km(&self) -> f64 {
        self.distance
    }

    pub fn geometry(&self) -> &TrailGeometry {
        &self.geometry
    }

    /// Ordered polyline, if this is a linear trail
    pub fn coordinates(&self) -> Option<&[Coordinate]> {
        match &self.geometry {
            TrailGeometry::Line { coordinates } => Some(coordinates),
            TrailGeometry::Point { .. } => None,
        }
    }

    /// Marker position, if this is a point-only trail
    pub fn point(&self) -> Option<Coordinate> {
        match self.geometry {
            TrailGeometry::Point { lat, lon } => Some(Coordinate::new(lat, lon)),
            TrailGeometry::Line { .. } => None,
        }
    }

    /// First and last position along the trail.
    pub fn endpoints(&self) -> (Coordinate, Coordinate) {
        match &self.geometry {
            TrailGeometry::Line { coordinates } => match coordinates.as_slice() {
                [first, .., last] => (*first, *last),
                _ => unreachable!("line trails always hold at least 2 points"),
            },
            TrailGeometry::Point { lat, lon } => {
                let p = Coordinate::new(*lat, *lon);
                (p, p)
            }
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum TrailError {
    #[error("Device is offline")]
    Offline,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for TrailError {
    fn from(err: serde_json::Error) -> Self {
        TrailError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrailError>;
