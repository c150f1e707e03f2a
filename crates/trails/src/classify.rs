//! Assigns each OSM way exactly one trail category.
//!
//! Tags are tested against independent predicates per category, so a shared
//! use way (say `foot=yes` + `bicycle=yes`) can match several. The winner is
//! the first match in `TrailType` declaration order, with the user's active
//! filters allowed to promote a visible category over a hidden one.

use std::collections::HashMap;

use crate::models::{ActiveFilters, TrailType};

/// Tag key/value pairs exactly as the source delivered them
pub type RawTagSet = HashMap<String, String>;

fn tag<'a>(tags: &'a RawTagSet, key: &str) -> Option<&'a str> {
    tags.get(key).map(String::as_str)
}

fn permits(tags: &RawTagSet, key: &str) -> bool {
    matches!(tag(tags, key), Some("yes" | "designated"))
}

pub fn is_bridleway(tags: &RawTagSet) -> bool {
    tag(tags, "highway") == Some("bridleway")
        || permits(tags, "horse")
        || tag(tags, "designation") == Some("public_bridleway")
}

pub fn is_cycleway(tags: &RawTagSet) -> bool {
    tag(tags, "highway") == Some("cycleway") || permits(tags, "bicycle")
}

pub fn is_footpath(tags: &RawTagSet) -> bool {
    tag(tags, "highway") == Some("footway")
        || permits(tags, "foot")
        || tag(tags, "designation") == Some("public_footpath")
}

/// Whether a way is something the map should show as a path or trail.
///
/// Bridleways are handled separately by [`is_bridleway`].
pub fn is_trail(tags: &RawTagSet) -> bool {
    matches!(tag(tags, "highway"), Some("footway" | "cycleway" | "path"))
        || permits(tags, "foot")
        || permits(tags, "bicycle")
        || tag(tags, "designation") == Some("public_footpath")
}

/// Every category the tags qualify for, in precedence order.
pub fn possible_types(tags: &RawTagSet) -> Vec<TrailType> {
    let mut possible = Vec::with_capacity(3);
    if is_bridleway(tags) {
        possible.push(TrailType::Bridleway);
    }
    if is_cycleway(tags) {
        possible.push(TrailType::Cycleway);
    }
    if is_footpath(tags) {
        possible.push(TrailType::Footpath);
    }
    possible
}

/// Pick the single category for a way.
///
/// When none of the possible categories is active the first one is returned
/// anyway; hiding it is left to the caller.
pub fn classify(tags: &RawTagSet, active_filters: Option<&ActiveFilters>) -> TrailType {
    let possible = possible_types(tags);

    let Some(&first) = possible.first() else {
        return TrailType::Path;
    };

    match active_filters {
        Some(filters) => possible
            .iter()
            .copied()
            .find(|t| filters.is_active(*t))
            .unwrap_or(first),
        None => first,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> RawTagSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_single_predicate_ignores_filters() {
        let cases = [
            (tags(&[("highway", "bridleway")]), TrailType::Bridleway),
            (tags(&[("highway", "cycleway")]), TrailType::Cycleway),
            (tags(&[("highway", "footway")]), TrailType::Footpath),
            (tags(&[("designation", "public_footpath")]), TrailType::Footpath),
            (tags(&[("horse", "designated")]), TrailType::Bridleway),
        ];

        for (tag_set, expected) in cases {
            assert_eq!(classify(&tag_set, None), expected);
            assert_eq!(classify(&tag_set, Some(&ActiveFilters::all())), expected);
            assert_eq!(classify(&tag_set, Some(&ActiveFilters::none())), expected);
        }
    }

    #[test]
    fn test_unmatched_is_path() {
        assert_eq!(classify(&tags(&[("highway", "path")]), None), TrailType::Path);
        assert_eq!(classify(&RawTagSet::new(), None), TrailType::Path);
        assert_eq!(
            classify(&tags(&[("foot", "no"), ("bicycle", "permissive")]), None),
            TrailType::Path
        );
    }

    #[test]
    fn test_precedence_without_filters() {
        let shared = tags(&[("highway", "path"), ("foot", "yes"), ("bicycle", "yes")]);
        assert_eq!(classify(&shared, None), TrailType::Cycleway);

        let everything = tags(&[("horse", "yes"), ("bicycle", "yes"), ("foot", "yes")]);
        assert_eq!(classify(&everything, None), TrailType::Bridleway);
    }

    #[test]
    fn test_filters_promote_visible_category() {
        let tag_set = tags(&[("designation", "public_bridleway"), ("foot", "yes")]);
        let filters = ActiveFilters::all()
            .with(TrailType::Bridleway, false)
            .with(TrailType::Footpath, true);

        assert_eq!(classify(&tag_set, Some(&filters)), TrailType::Footpath);
        assert_eq!(classify(&tag_set, None), TrailType::Bridleway);
    }

    #[test]
    fn test_all_hidden_passes_through_first() {
        let tag_set = tags(&[("bicycle", "designated"), ("foot", "designated")]);
        assert_eq!(
            classify(&tag_set, Some(&ActiveFilters::none())),
            TrailType::Cycleway
        );
    }

    #[test]
    fn test_trail_predicate() {
        assert!(is_trail(&tags(&[("highway", "path")])));
        assert!(is_trail(&tags(&[("highway", "residential"), ("foot", "yes")])));
        assert!(!is_trail(&tags(&[("highway", "bridleway")])));
        assert!(is_bridleway(&tags(&[("highway", "bridleway")])));
        assert!(!is_trail(&tags(&[("highway", "residential")])));
    }

    #[test]
    fn test_possible_types_order() {
        let tag_set = tags(&[("foot", "yes"), ("horse", "yes")]);
        assert_eq!(
            possible_types(&tag_set),
            vec![TrailType::Bridleway, TrailType::Footpath]
        );
    }
}
