//! Per-category visibility toggles.

use serde::{Deserialize, Serialize};

use crate::models::types::{TrailRecord, TrailType};

/// Which trail categories the user currently wants to see.
///
/// Classification consults these so that a multi-use way is labelled with a
/// visible category when it has one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ActiveFilters {
    pub bridleway: bool,
    pub footpath: bool,
    pub cycleway: bool,
    pub path: bool,
}

impl ActiveFilters {
    pub fn all() -> Self {
        Self {
            bridleway: true,
            footpath: true,
            cycleway: true,
            path: true,
        }
    }

    pub fn none() -> Self {
        Self {
            bridleway: false,
            footpath: false,
            cycleway: false,
            path: false,
        }
    }

    pub fn is_active(&self, trail_type: TrailType) -> bool {
        match trail_type {
            TrailType::Bridleway => self.bridleway,
            TrailType::Footpath => self.footpath,
            TrailType::Cycleway => self.cycleway,
            TrailType::Path => self.path,
        }
    }

    pub fn set(&mut self, trail_type: TrailType, active: bool) {
        match trail_type {
            TrailType::Bridleway => self.bridleway = active,
            TrailType::Footpath => self.footpath = active,
            TrailType::Cycleway => self.cycleway = active,
            TrailType::Path => self.path = active,
        }
    }

    pub fn with(mut self, trail_type: TrailType, active: bool) -> Self {
        self.set(trail_type, active);
        self
    }

    /// Drop trails whose category is hidden.
    pub fn retain_visible(&self, trails: Vec<TrailRecord>) -> Vec<TrailRecord> {
        trails
            .into_iter()
            .filter(|t| self.is_active(t.trail_type()))
            .collect()
    }
}

impl Default for ActiveFilters {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::TrailIdentifier;
    use crate::models::types::Coordinate;

    fn trail(id: &str, trail_type: TrailType) -> TrailRecord {
        TrailRecord::from_line(
            TrailIdentifier::new(id),
            None,
            trail_type,
            vec![Coordinate::new(51.0, 0.0), Coordinate::new(51.001, 0.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_default_shows_everything() {
        let filters = ActiveFilters::default();
        assert!(filters.is_active(TrailType::Bridleway));
        assert!(filters.is_active(TrailType::Path));
    }

    #[test]
    fn test_set_and_query() {
        let filters = ActiveFilters::all().with(TrailType::Cycleway, false);
        assert!(!filters.is_active(TrailType::Cycleway));
        assert!(filters.is_active(TrailType::Footpath));
    }

    #[test]
    fn test_retain_visible() {
        let filters = ActiveFilters::none().with(TrailType::Footpath, true);
        let trails = vec![
            trail("osm-1", TrailType::Footpath),
            trail("osm-2", TrailType::Bridleway),
            trail("osm-3", TrailType::Footpath),
        ];

        let visible = filters.retain_visible(trails);
        let ids: Vec<&str> = visible.iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["osm-1", "osm-3"]);
    }

    #[test]
    fn test_json_keys_match_category_names() {
        let filters = ActiveFilters::all().with(TrailType::Bridleway, false);
        let value = serde_json::to_value(filters).unwrap();
        assert_eq!(value["Bridleway"], false);
        assert_eq!(value["Footpath"], true);
    }
}
