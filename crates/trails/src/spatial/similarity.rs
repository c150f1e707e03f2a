//! Near-duplicate detection between trails.
//!
//! OSM often carries the same route twice (a footway and a parallel
//! bridleway, or a way split and re-drawn). Two trails count as similar when
//! their endpoints line up, in either direction.

use crate::models::types::{Coordinate, TrailRecord};
use crate::spatial::queries::segment_distance_km;

/// Endpoint proximity test between two polylines.
pub fn paths_similar(a: &[Coordinate], b: &[Coordinate], threshold_km: f64) -> bool {
    let (Some(a_start), Some(a_end), Some(b_start), Some(b_end)) =
        (a.first(), a.last(), b.first(), b.last())
    else {
        return false;
    };

    let close = |p: &Coordinate, q: &Coordinate| segment_distance_km(*p, *q) <= threshold_km;

    let forward = close(a_start, b_start) && close(a_end, b_end);
    let reversed = close(a_start, b_end) && close(a_end, b_start);

    forward || reversed
}

fn trails_similar(a: &TrailRecord, b: &TrailRecord, threshold_km: f64) -> bool {
    let (a_start, a_end) = a.endpoints();
    let (b_start, b_end) = b.endpoints();
    paths_similar(&[a_start, a_end], &[b_start, b_end], threshold_km)
}

/// Keep the first trail of every near-duplicate group, in input order.
pub fn dedupe_similar(trails: Vec<TrailRecord>, threshold_km: f64) -> Vec<TrailRecord> {
    let mut kept: Vec<TrailRecord> = Vec::with_capacity(trails.len());

    for trail in trails {
        if kept.iter().any(|k| trails_similar(k, &trail, threshold_km)) {
            tracing::debug!("dropping {} as a near-duplicate", trail.id());
            continue;
        }
        kept.push(trail);
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::TrailIdentifier;
    use crate::models::types::TrailType;

    fn line(points: &[(f64, f64)]) -> Vec<Coordinate> {
        points.iter().map(|(lat, lon)| Coordinate::new(*lat, *lon)).collect()
    }

    fn trail(id: &str, points: &[(f64, f64)]) -> TrailRecord {
        TrailRecord::from_line(TrailIdentifier::new(id), None, TrailType::Path, line(points))
            .unwrap()
    }

    #[test]
    fn test_same_direction() {
        let a = line(&[(51.0, 0.0), (51.01, 0.0)]);
        let b = line(&[(51.0001, 0.0), (51.005, 0.001), (51.0101, 0.0)]);
        assert!(paths_similar(&a, &b, 0.05));
    }

    #[test]
    fn test_reversed_direction() {
        let a = line(&[(51.0, 0.0), (51.01, 0.0)]);
        let b = line(&[(51.01, 0.0), (51.0, 0.0)]);
        assert!(paths_similar(&a, &b, 0.05));
    }

    #[test]
    fn test_distinct_paths() {
        let a = line(&[(51.0, 0.0), (51.01, 0.0)]);
        let b = line(&[(51.0, 0.0), (51.0, 0.02)]);
        assert!(!paths_similar(&a, &b, 0.05));
        assert!(!paths_similar(&a, &[], 0.05));
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let trails = vec![
            trail("osm-1", &[(51.0, 0.0), (51.01, 0.0)]),
            trail("osm-2", &[(51.01, 0.0), (51.0, 0.0)]),
            trail("osm-3", &[(52.0, 1.0), (52.01, 1.0)]),
        ];

        let kept = dedupe_similar(trails, 0.05);
        let ids: Vec<&str> = kept.iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["osm-1", "osm-3"]);
    }
}
