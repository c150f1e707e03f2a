//! Turns a raw Overpass response into trail records.

use std::collections::HashMap;

use crate::classify::{classify, is_bridleway, is_trail};
use crate::identifiers::TrailIdentifier;
use crate::models::{ActiveFilters, Coordinate, TrailRecord};
use crate::overpass::response::{ElementKind, OverpassElement, OverpassResponse, WayElement};

/// Node ID to coordinate mapping
pub struct NodeIndex {
    nodes: HashMap<i64, Coordinate>,
}

impl NodeIndex {
    pub fn build(elements: &[OverpassElement]) -> Self {
        let nodes = elements
            .iter()
            .filter_map(|element| match element {
                OverpassElement::Node(node) => Some((node.id, node.coordinate()?)),
                _ => None,
            })
            .collect();

        Self { nodes }
    }

    pub fn get(&self, id: i64) -> Option<Coordinate> {
        self.nodes.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolve a way's node refs in order, skipping unknown nodes.
    pub fn resolve(&self, node_refs: &[i64]) -> Vec<Coordinate> {
        node_refs.iter().filter_map(|id| self.get(*id)).collect()
    }
}

fn way_to_record(
    way: &WayElement,
    index: &NodeIndex,
    active_filters: Option<&ActiveFilters>,
) -> Option<TrailRecord> {
    if !(is_trail(&way.tags) || is_bridleway(&way.tags)) {
        return None;
    }

    let coordinates = index.resolve(&way.nodes);
    if coordinates.len() < 2 {
        tracing::debug!(
            "way {} resolved only {} of {} nodes, skipping",
            way.id,
            coordinates.len(),
            way.nodes.len()
        );
        return None;
    }

    TrailRecord::from_line(
        TrailIdentifier::for_element(ElementKind::Way, way.id),
        way.tags.get("name").cloned(),
        classify(&way.tags, active_filters),
        coordinates,
    )
}

/// Normalize every trail-like way in the response, in source order.
///
/// Route relations are not expanded into geometry and produce no records.
pub fn process(
    response: &OverpassResponse,
    active_filters: Option<&ActiveFilters>,
) -> Vec<TrailRecord> {
    let index = NodeIndex::build(&response.elements);

    let mut relations = 0usize;
    let trails: Vec<TrailRecord> = response
        .elements
        .iter()
        .filter_map(|element| match element {
            OverpassElement::Way(way) => way_to_record(way, &index, active_filters),
            OverpassElement::Relation(_) => {
                relations += 1;
                None
            }
            _ => None,
        })
        .collect();

    tracing::debug!(
        "processed {} elements ({} nodes indexed, {} relations skipped) into {} trails",
        response.elements.len(),
        index.len(),
        relations,
        trails.len()
    );

    trails
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrailType;
    use crate::spatial::queries::{path_distance_km, round_to_hundredths};

    fn response(json: &str) -> OverpassResponse {
        OverpassResponse::from_slice(json.as_bytes()).unwrap()
    }

    const THREE_NODE_FOOTWAY: &str = r#"{"elements": [
        {"type": "way", "id": 10, "nodes": [1, 2, 3], "tags": {"highway": "footway"}},
        {"type": "node", "id": 1, "lat": 51.5074, "lon": -0.1278},
        {"type": "node", "id": 2, "lat": 51.5080, "lon": -0.1290},
        {"type": "node", "id": 3, "lat": 51.5090, "lon": -0.1300}
    ]}"#;

    #[test]
    fn test_single_footway() {
        let trails = process(&response(THREE_NODE_FOOTWAY), None);
        assert_eq!(trails.len(), 1);

        let trail = &trails[0];
        assert_eq!(trail.id().as_str(), "osm-10");
        assert_eq!(trail.trail_type(), TrailType::Footpath);
        assert_eq!(trail.name(), "Footpath Path");

        let coords = trail.coordinates().unwrap();
        assert_eq!(coords.len(), 3);
        assert_eq!(
            trail.distance_km(),
            round_to_hundredths(path_distance_km(coords))
        );
    }

    #[test]
    fn test_single_resolvable_node_is_dropped() {
        let json = r#"{"elements": [
            {"type": "way", "id": 10, "nodes": [1, 2, 3], "tags": {"highway": "footway"}},
            {"type": "node", "id": 1, "lat": 51.5, "lon": -0.12}
        ]}"#;
        assert!(process(&response(json), None).is_empty());
    }

    #[test]
    fn test_unresolved_refs_are_skipped() {
        let json = r#"{"elements": [
            {"type": "way", "id": 10, "nodes": [1, 99, 3], "tags": {"highway": "path", "name": "Lane"}},
            {"type": "node", "id": 1, "lat": 51.5, "lon": -0.12},
            {"type": "node", "id": 3, "lat": 51.51, "lon": -0.12}
        ]}"#;
        let trails = process(&response(json), None);
        assert_eq!(trails.len(), 1);
        assert_eq!(trails[0].coordinates().unwrap().len(), 2);
        assert_eq!(trails[0].name(), "Lane");
        assert_eq!(trails[0].trail_type(), TrailType::Path);
    }

    #[test]
    fn test_non_trail_ways_and_relations_are_ignored() {
        let json = r#"{"elements": [
            {"type": "way", "id": 10, "nodes": [1, 2], "tags": {"highway": "residential"}},
            {"type": "way", "id": 11, "nodes": [1, 2]},
            {"type": "relation", "id": 12, "tags": {"route": "hiking", "name": "Thames Path"}},
            {"type": "node", "id": 1, "lat": 51.5, "lon": -0.12},
            {"type": "node", "id": 2, "lat": 51.51, "lon": -0.12}
        ]}"#;
        assert!(process(&response(json), None).is_empty());
    }

    #[test]
    fn test_source_order_and_filters() {
        let json = r#"{"elements": [
            {"type": "node", "id": 1, "lat": 51.5, "lon": -0.12},
            {"type": "node", "id": 2, "lat": 51.51, "lon": -0.12},
            {"type": "way", "id": 30, "nodes": [1, 2], "tags": {"highway": "bridleway", "foot": "yes"}},
            {"type": "way", "id": 20, "nodes": [2, 1], "tags": {"highway": "cycleway"}},
            {"type": "way", "id": 25, "nodes": [1, 2], "tags": {"highway": "cycleway"}}
        ]}"#;
        let filters = ActiveFilters::all().with(TrailType::Bridleway, false);
        let trails = process(&response(json), Some(&filters));

        let ids: Vec<&str> = trails.iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["osm-30", "osm-20", "osm-25"]);
        assert_eq!(trails[0].trail_type(), TrailType::Footpath);
        assert_eq!(trails[0].name(), "Footpath Path");
        assert_eq!(trails[1].trail_type(), TrailType::Cycleway);
    }

    #[test]
    fn test_horse_only_ways_become_bridleways() {
        let json = r#"{"elements": [
            {"type": "node", "id": 1, "lat": 51.5, "lon": -0.12},
            {"type": "node", "id": 2, "lat": 51.51, "lon": -0.12},
            {"type": "way", "id": 40, "nodes": [1, 2], "tags": {"highway": "bridleway"}},
            {"type": "way", "id": 41, "nodes": [2, 1], "tags": {"highway": "track", "horse": "designated"}}
        ]}"#;
        let trails = process(&response(json), None);

        let ids: Vec<&str> = trails.iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["osm-40", "osm-41"]);
        assert!(trails.iter().all(|t| t.trail_type() == TrailType::Bridleway));
    }

    #[test]
    fn test_node_index() {
        let parsed = response(THREE_NODE_FOOTWAY);
        let index = NodeIndex::build(&parsed.elements);
        assert_eq!(index.len(), 3);
        assert_eq!(index.resolve(&[3, 42, 1]).len(), 2);
        assert!(index.get(42).is_none());
    }
}
