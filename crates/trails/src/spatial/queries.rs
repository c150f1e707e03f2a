//! Distance calculations on Earth's surface.
//!
//! Uses the Haversine formula with a spherical Earth of radius 6371 km.

use itertools::Itertools;

use crate::models::types::Coordinate;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers
pub fn segment_distance_km(p1: Coordinate, p2: Coordinate) -> f64 {
    let d_lat = (p2.lat - p1.lat).to_radians();
    let d_lon = (p2.lon - p1.lon).to_radians();
    let lat1 = p1.lat.to_radians();
    let lat2 = p2.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Length of a polyline in kilometers (0 for fewer than 2 points)
pub fn path_distance_km(points: &[Coordinate]) -> f64 {
    points
        .iter()
        .tuple_windows()
        .map(|(a, b)| segment_distance_km(*a, *b))
        .sum()
}

/// Round to 2 decimal places
pub fn round_to_hundredths(value: f64) -> f64 {
    // `+ 0.0` folds -0.0 into 0.0
    (value * 100.0).round() / 100.0 + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{HaversineDistance, Point};

    #[test]
    fn test_segment_distance() {
        // Distance from NYC to LA is approximately 3,936 km
        let nyc = Coordinate::new(40.7128, -74.0060);
        let la = Coordinate::new(34.0522, -118.2437);

        let dist = segment_distance_km(nyc, la);
        assert!((dist - 3_936.0).abs() < 50.0);
    }

    #[test]
    fn test_agrees_with_geo_haversine() {
        let a = Coordinate::new(51.5074, -0.1278);
        let b = Coordinate::new(48.8566, 2.3522);

        let ours = segment_distance_km(a, b);
        let theirs = Point::from(a).haversine_distance(&Point::from(b)) / 1000.0;

        // geo uses a slightly different mean radius
        assert_relative_eq!(ours, theirs, max_relative = 1e-3);
    }

    #[test]
    fn test_zero_and_symmetry() {
        let a = Coordinate::new(51.5, -0.12);
        let b = Coordinate::new(51.51, -0.14);

        assert_eq!(segment_distance_km(a, a), 0.0);
        assert_eq!(segment_distance_km(a, b), segment_distance_km(b, a));
    }

    #[test]
    fn test_path_distance_is_sum_of_segments() {
        let points = vec![
            Coordinate::new(51.5074, -0.1278),
            Coordinate::new(51.5080, -0.1290),
            Coordinate::new(51.5090, -0.1300),
            Coordinate::new(51.5100, -0.1350),
        ];

        let expected = segment_distance_km(points[0], points[1])
            + segment_distance_km(points[1], points[2])
            + segment_distance_km(points[2], points[3]);

        assert_relative_eq!(path_distance_km(&points), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_path_distance_short_inputs() {
        assert_eq!(path_distance_km(&[]), 0.0);
        assert_eq!(path_distance_km(&[Coordinate::new(1.0, 2.0)]), 0.0);
    }

    #[test]
    fn test_round_to_hundredths() {
        assert_eq!(round_to_hundredths(1.23456), 1.23);
        assert_eq!(round_to_hundredths(1.235001), 1.24);
        assert_eq!(round_to_hundredths(-0.001).to_string(), "0");
    }
}
