//! Overpass QL for "trails around a point".

use std::fmt::Write;

use crate::models::types::Coordinate;

pub const DEFAULT_RADIUS_M: f64 = 5000.0;

/// Way filters, as `[key=value]` pairs
const WAY_FILTERS: &[(&str, &str)] = &[
    ("highway", "footway"),
    ("highway", "cycleway"),
    ("highway", "bridleway"),
    ("highway", "path"),
    ("designation", "public_footpath"),
    ("designation", "public_bridleway"),
];

/// Long-distance route relations
const ROUTE_FILTERS: &[&str] = &["hiking", "bicycle", "horse"];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailQuery {
    pub center: Coordinate,
    pub radius_m: f64,
    /// Server-side evaluation limit, in seconds
    pub server_timeout_s: u32,
}

impl TrailQuery {
    pub fn new(center: Coordinate, radius_m: f64) -> Self {
        Self {
            center,
            radius_m,
            server_timeout_s: 25,
        }
    }

    /// Render the query text.
    ///
    /// Ways and relations come back with tags (`out body`), followed by the
    /// nodes they reference as bare coordinates (`>; out skel qt`).
    pub fn to_ql(&self) -> String {
        let around = format!(
            "(around:{:.0},{},{})",
            self.radius_m, self.center.lat, self.center.lon
        );

        let mut ql = format!("[out:json][timeout:{}];\n(\n", self.server_timeout_s);
        for (key, value) in WAY_FILTERS {
            let _ = writeln!(ql, "  way[\"{key}\"=\"{value}\"]{around};");
        }
        for route in ROUTE_FILTERS {
            let _ = writeln!(ql, "  relation[\"route\"=\"{route}\"]{around};");
        }
        ql.push_str(");\nout body;\n>;\nout skel qt;");
        ql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_text() {
        let query = TrailQuery::new(Coordinate::new(51.5, -0.12), DEFAULT_RADIUS_M);
        let ql = query.to_ql();

        assert!(ql.starts_with("[out:json][timeout:25];"));
        assert!(ql.contains("way[\"highway\"=\"footway\"](around:5000,51.5,-0.12);"));
        assert!(ql.contains("way[\"designation\"=\"public_bridleway\"](around:5000,51.5,-0.12);"));
        assert!(ql.contains("relation[\"route\"=\"horse\"](around:5000,51.5,-0.12);"));
        assert!(ql.ends_with("out body;\n>;\nout skel qt;"));
    }

    #[test]
    fn test_radius_rounds_to_meters() {
        let query = TrailQuery::new(Coordinate::new(1.0, 2.0), 1234.6);
        assert!(query.to_ql().contains("(around:1235,1,2)"));
    }

    #[test]
    fn test_every_filter_present() {
        let ql = TrailQuery::new(Coordinate::new(0.0, 0.0), 100.0).to_ql();
        assert_eq!(ql.matches("way[").count(), WAY_FILTERS.len());
        assert_eq!(ql.matches("relation[").count(), ROUTE_FILTERS.len());
    }
}
