//! Polygonal regions of interest ("zones") in normalized frame coordinates.
//!
//! Zone membership is evaluated against a box's centroid with the standard
//! even-odd ray cast. Polygons are taken as configured: the last vertex
//! closes back to the first, and no winding or self-intersection checks are
//! applied.

use serde::{Deserialize, Serialize};

use crate::detect::BoundingBox;

const EDGE_EPS: f32 = 1e-6;

/// A named polygon, vertices as `[x, y]` pairs in [0, 1] relative to the
/// frame. The name doubles as the alert-grouping key.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub polygon: Vec<[f32; 2]>,
}

/// Immutable set of zones, fixed at construction. Stateless per check.
#[derive(Clone, Debug, Default)]
pub struct ZoneManager {
    zones: Vec<Zone>,
}

impl ZoneManager {
    pub fn new(zones: Vec<Zone>) -> Self {
        Self { zones }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Names of every zone containing the box's centroid, in configuration
    /// order. Centroids outside the frame are not clamped; any finite input
    /// yields a (possibly empty) result.
    pub fn check(&self, bbox: &BoundingBox, width: u32, height: u32) -> Vec<String> {
        let (cx, cy) = bbox.centroid();
        let px = cx / width as f32;
        let py = cy / height as f32;
        self.zones
            .iter()
            .filter(|zone| point_in_polygon(px, py, &zone.polygon))
            .map(|zone| zone.name.clone())
            .collect()
    }
}

/// Even-odd ray cast: count crossings of the horizontal ray from the point
/// toward +x. The epsilon in the slope denominator tolerates horizontal
/// edges without a division by zero.
fn point_in_polygon(px: f32, py: f32, polygon: &[[f32; 2]]) -> bool {
    let mut inside = false;
    let n = polygon.len();
    for i in 0..n {
        let [x1, y1] = polygon[i];
        let [x2, y2] = polygon[(i + 1) % n];
        if ((y1 > py) != (y2 > py)) && px < (x2 - x1) * (py - y1) / (y2 - y1 + EDGE_EPS) + x1 {
            inside = !inside;
        }
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(name: &str) -> Zone {
        Zone {
            name: name.to_string(),
            polygon: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
        }
    }

    #[test]
    fn full_frame_square_contains_any_in_frame_box() {
        let zones = ZoneManager::new(vec![square("frame")]);
        let bbox = BoundingBox::new(100.0, 100.0, 200.0, 200.0);
        assert_eq!(zones.check(&bbox, 640, 480), vec!["frame"]);
    }

    #[test]
    fn far_outside_point_hits_nothing() {
        let zones = ZoneManager::new(vec![square("frame")]);
        let bbox = BoundingBox::new(5000.0, 5000.0, 5100.0, 5100.0);
        assert!(zones.check(&bbox, 640, 480).is_empty());
    }

    #[test]
    fn convex_polygon_contains_its_centroid() {
        let triangle = Zone {
            name: "tri".to_string(),
            polygon: vec![[0.2, 0.2], [0.8, 0.2], [0.5, 0.8]],
        };
        let zones = ZoneManager::new(vec![triangle]);
        // Centroid of the triangle is (0.5, 0.4): box centered there.
        let bbox = BoundingBox::new(310.0, 182.0, 330.0, 202.0);
        assert_eq!(zones.check(&bbox, 640, 480), vec!["tri"]);
    }

    #[test]
    fn overlapping_zones_all_reported_in_config_order() {
        let inner = Zone {
            name: "inner".to_string(),
            polygon: vec![[0.25, 0.25], [0.75, 0.25], [0.75, 0.75], [0.25, 0.75]],
        };
        let zones = ZoneManager::new(vec![square("outer"), inner]);
        let bbox = BoundingBox::new(300.0, 220.0, 340.0, 260.0);
        assert_eq!(zones.check(&bbox, 640, 480), vec!["outer", "inner"]);
    }

    #[test]
    fn point_outside_inner_zone_hits_only_outer() {
        let inner = Zone {
            name: "inner".to_string(),
            polygon: vec![[0.25, 0.25], [0.75, 0.25], [0.75, 0.75], [0.25, 0.75]],
        };
        let zones = ZoneManager::new(vec![square("outer"), inner]);
        let bbox = BoundingBox::new(10.0, 10.0, 30.0, 30.0);
        assert_eq!(zones.check(&bbox, 640, 480), vec!["outer"]);
    }

    #[test]
    fn horizontal_edges_do_not_divide_by_zero() {
        // Degenerate polygon made of two horizontal edges.
        let flat = Zone {
            name: "flat".to_string(),
            polygon: vec![[0.0, 0.5], [1.0, 0.5]],
        };
        let zones = ZoneManager::new(vec![flat]);
        let bbox = BoundingBox::new(300.0, 230.0, 340.0, 250.0);
        let hits = zones.check(&bbox, 640, 480);
        assert!(hits.len() <= 1); // must not panic; membership is unspecified
    }

    #[test]
    fn no_zones_means_no_hits() {
        let zones = ZoneManager::default();
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(zones.check(&bbox, 640, 480).is_empty());
    }
}
