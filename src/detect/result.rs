use serde::{Deserialize, Serialize};

/// Axis-aligned box in pixel coordinates, `x1 < x2` and `y1 < y2` expected.
///
/// Inverted or degenerate boxes are accepted as given; downstream geometry
/// neutralizes them numerically instead of raising, so malformed detector
/// output never halts the frame loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Center point in pixel coordinates.
    pub fn centroid(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }
}

/// One detector output for one frame. Ephemeral: detections never outlive
/// the frame that produced them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub bbox: BoundingBox,
    /// Confidence in [0, 1]. Carried for collaborators; the control core
    /// itself does not consume it.
    pub confidence: f32,
    pub class_id: u32,
}

impl Detection {
    pub fn new(bbox: BoundingBox, confidence: f32, class_id: u32) -> Self {
        Self {
            bbox,
            confidence,
            class_id,
        }
    }

    /// Build from the detector wire contract `[x1, y1, x2, y2, conf, class]`.
    pub fn from_array(raw: [f32; 6]) -> Self {
        Self {
            bbox: BoundingBox::new(raw[0], raw[1], raw[2], raw[3]),
            confidence: raw[4],
            class_id: raw[5] as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_is_box_center() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 20.0);
        assert_eq!(bbox.centroid(), (5.0, 10.0));
    }

    #[test]
    fn from_array_truncates_class_to_integer() {
        let det = Detection::from_array([1.0, 2.0, 3.0, 4.0, 0.9, 7.0]);
        assert_eq!(det.class_id, 7);
        assert_eq!(det.bbox, BoundingBox::new(1.0, 2.0, 3.0, 4.0));
        assert!((det.confidence - 0.9).abs() < f32::EPSILON);
    }
}
