//! Address-search results, as handed to the trail pipeline.
//!
//! Only the data contract lives here. Talking to a geocoder is the host
//! application's job; a picked result just becomes the next search centre.

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::types::Coordinate;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub display_name: String,
    #[serde(deserialize_with = "degrees")]
    pub lat: f64,
    #[serde(deserialize_with = "degrees")]
    pub lon: f64,
}

impl GeocodeResult {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

// Nominatim sends coordinates as strings
fn degrees<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Degrees {
        Number(f64),
        Text(String),
    }

    match Degrees::deserialize(deserializer)? {
        Degrees::Number(value) => Ok(value),
        Degrees::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_string_coordinates() {
        let json = r#"[{"place_id": 1, "display_name": "Box Hill, Surrey", "lat": "51.2538", "lon": "-0.3087"}]"#;
        let results: Vec<GeocodeResult> = serde_json::from_str(json).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].display_name, "Box Hill, Surrey");
        assert_eq!(results[0].coordinate(), Coordinate::new(51.2538, -0.3087));
    }

    #[test]
    fn test_parses_numeric_coordinates() {
        let json = r#"{"display_name": "Somewhere", "lat": 10.5, "lon": 20.25}"#;
        let result: GeocodeResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.lat, 10.5);
        assert_eq!(result.lon, 20.25);
    }

    #[test]
    fn test_rejects_garbage_coordinates() {
        let json = r#"{"display_name": "Nowhere", "lat": "north", "lon": "0"}"#;
        assert!(serde_json::from_str::<GeocodeResult>(json).is_err());
    }
}
