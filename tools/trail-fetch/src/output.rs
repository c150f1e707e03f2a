use anyhow::{Context, Result};
use clap::ValueEnum;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use std::path::Path;
use trailhead_core::trails::models::{TrailGeometry, TrailRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON array of trail records, the same shape the cache stores
    Json,
    /// GeoJSON FeatureCollection
    Geojson,
}

/// Convert a trail's geometry to a GeoJSON Value (positions are lon, lat)
fn geometry_to_geojson(geometry: &TrailGeometry) -> Value {
    match geometry {
        TrailGeometry::Line { coordinates } => {
            Value::LineString(coordinates.iter().map(|c| vec![c.lon, c.lat]).collect())
        }
        TrailGeometry::Point { lat, lon } => Value::Point(vec![*lon, *lat]),
    }
}

fn trail_to_feature(trail: &TrailRecord) -> Feature {
    let mut properties = serde_json::Map::new();
    properties.insert("id".to_string(), serde_json::json!(trail.id().as_str()));
    properties.insert("name".to_string(), serde_json::json!(trail.name()));
    properties.insert(
        "type".to_string(),
        serde_json::json!(trail.trail_type().to_string()),
    );
    properties.insert(
        "distance_km".to_string(),
        serde_json::json!(trail.distance_km()),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geometry_to_geojson(trail.geometry()))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn render(trails: &[TrailRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(trails).context("Failed to serialize trails")
        }
        OutputFormat::Geojson => {
            let feature_collection = FeatureCollection {
                bbox: None,
                features: trails.iter().map(trail_to_feature).collect(),
                foreign_members: None,
            };

            let geojson = GeoJson::from(feature_collection);
            serde_json::to_string_pretty(&geojson).context("Failed to serialize GeoJSON")
        }
    }
}

/// Write to `output_path`, or stdout when none is given
pub fn write_trails(
    trails: &[TrailRecord],
    format: OutputFormat,
    output_path: Option<&Path>,
) -> Result<()> {
    let rendered = render(trails, format)?;

    match output_path {
        Some(path) => {
            log::info!("Writing {} trails to {}", trails.len(), path.display());
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write trails to {}", path.display()))?;
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
