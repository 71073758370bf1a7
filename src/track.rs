//! Frame-to-frame identity association.
//!
//! `IouTracker` keeps a live set of tracks and matches each new frame's
//! detections against them by bounding-box overlap. Matching is greedy in
//! stored track order with a first-wins tie-break, which keeps the update
//! O(tracks x detections) and fully deterministic. It is not an optimal
//! bipartite assignment: crossing trajectories of same-class objects can
//! swap identities.

use crate::detect::{BoundingBox, Detection};

const IOU_EPS: f32 = 1e-6;

/// Intersection-over-Union of two boxes.
///
/// The epsilon in the denominator keeps degenerate pairs (both boxes
/// zero-area) finite. Inverted boxes produce non-positive values, which can
/// never reach a match threshold, so malformed input ages a track out
/// instead of panicking.
pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let xa = a.x1.max(b.x1);
    let ya = a.y1.max(b.y1);
    let xb = a.x2.min(b.x2);
    let yb = a.y2.min(b.y2);
    let inter = (xb - xa).max(0.0) * (yb - ya).max(0.0);
    let area_a = (a.x2 - a.x1) * (a.y2 - a.y1);
    let area_b = (b.x2 - b.x1) * (b.y2 - b.y1);
    inter / (area_a + area_b - inter + IOU_EPS)
}

/// A persistent identity across frames. Owned exclusively by the tracker.
#[derive(Clone, Debug)]
pub struct Track {
    /// Monotonically increasing, never reused.
    pub id: u64,
    pub bbox: BoundingBox,
    pub class_id: u32,
    /// Consecutive frames since the last successful match.
    pub age: u32,
    /// Total successful matches. Informational only.
    pub hits: u32,
}

impl Track {
    fn spawn(id: u64, detection: &Detection) -> Self {
        Self {
            id,
            bbox: detection.bbox,
            class_id: detection.class_id,
            age: 0,
            hits: 1,
        }
    }
}

/// Greedy IoU tracker.
#[derive(Debug)]
pub struct IouTracker {
    max_age: u32,
    iou_threshold: f32,
    next_id: u64,
    tracks: Vec<Track>,
}

impl IouTracker {
    pub fn new(max_age: u32, iou_threshold: f32) -> Self {
        Self {
            max_age,
            iou_threshold,
            next_id: 1,
            tracks: Vec::new(),
        }
    }

    /// Live tracks, in held order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Match one frame's detections against the live set.
    ///
    /// Each existing track (in held order) claims the unclaimed detection
    /// with the highest IoU, provided it reaches the match threshold; ties
    /// go to the first detection in input order. Matched tracks adopt the
    /// detection's box and class and reset `age`; unmatched tracks age by
    /// one. Every unclaimed detection spawns a fresh track. Tracks whose
    /// age exceeds `max_age` are pruned before returning.
    pub fn update(&mut self, detections: &[Detection]) -> &[Track] {
        let mut claimed = vec![false; detections.len()];

        for track in &mut self.tracks {
            let mut best: Option<usize> = None;
            let mut best_iou = 0.0f32;
            for (i, det) in detections.iter().enumerate() {
                if claimed[i] {
                    continue;
                }
                let overlap = iou(&track.bbox, &det.bbox);
                if overlap > best_iou {
                    best_iou = overlap;
                    best = Some(i);
                }
            }
            match best {
                Some(i) if best_iou >= self.iou_threshold => {
                    track.bbox = detections[i].bbox;
                    track.class_id = detections[i].class_id;
                    track.age = 0;
                    track.hits += 1;
                    claimed[i] = true;
                }
                _ => track.age += 1,
            }
        }

        for (i, det) in detections.iter().enumerate() {
            if !claimed[i] {
                self.tracks.push(Track::spawn(self.next_id, det));
                self.next_id += 1;
            }
        }

        let max_age = self.max_age;
        self.tracks.retain(|t| t.age <= max_age);
        &self.tracks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det(x1: f32, y1: f32, x2: f32, y2: f32, class_id: u32) -> Detection {
        Detection::new(BoundingBox::new(x1, y1, x2, y2), 0.9, class_id)
    }

    #[test]
    fn iou_of_identical_box_is_one() {
        let b = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!((iou(&b, &b) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(20.0, 20.0, 30.0, 30.0);
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn iou_of_inverted_box_never_matches() {
        let a = BoundingBox::new(10.0, 10.0, 0.0, 0.0);
        let b = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(iou(&a, &b) <= 0.0);
    }

    #[test]
    fn first_frame_spawns_track_per_detection() {
        let mut tracker = IouTracker::new(2, 0.3);
        let tracks = tracker.update(&[
            det(0.0, 0.0, 10.0, 10.0, 1),
            det(50.0, 50.0, 60.0, 60.0, 2),
        ]);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, 1);
        assert_eq!(tracks[1].id, 2);
        assert!(tracks.iter().all(|t| t.age == 0 && t.hits == 1));
    }

    #[test]
    fn fresh_tracks_bounded_by_detection_count() {
        let mut tracker = IouTracker::new(5, 0.3);
        tracker.update(&[det(0.0, 0.0, 10.0, 10.0, 1)]);
        tracker.update(&[]);
        let tracks = tracker.update(&[det(100.0, 100.0, 110.0, 110.0, 1)]);
        let fresh = tracks.iter().filter(|t| t.age == 0).count();
        assert!(fresh <= 1);
    }

    #[test]
    fn matched_track_adopts_box_and_class() {
        let mut tracker = IouTracker::new(2, 0.3);
        tracker.update(&[det(0.0, 0.0, 10.0, 10.0, 1)]);
        let tracks = tracker.update(&[det(1.0, 1.0, 11.0, 11.0, 3)]);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, 1);
        assert_eq!(tracks[0].class_id, 3);
        assert_eq!(tracks[0].bbox, BoundingBox::new(1.0, 1.0, 11.0, 11.0));
        assert_eq!(tracks[0].age, 0);
        assert_eq!(tracks[0].hits, 2);
    }

    #[test]
    fn tie_break_prefers_first_detection_in_input_order() {
        let mut tracker = IouTracker::new(2, 0.3);
        tracker.update(&[det(0.0, 0.0, 10.0, 10.0, 1)]);
        // Two identical candidates: the first must be claimed, the second
        // must spawn a new track.
        let tracks = tracker.update(&[
            det(0.0, 0.0, 10.0, 10.0, 1),
            det(0.0, 0.0, 10.0, 10.0, 1),
        ]);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, 1);
        assert_eq!(tracks[0].hits, 2);
        assert_eq!(tracks[1].id, 2);
        assert_eq!(tracks[1].hits, 1);
    }

    #[test]
    fn track_survives_exactly_max_age_missed_frames() {
        let mut tracker = IouTracker::new(2, 0.3);
        tracker.update(&[det(0.0, 0.0, 10.0, 10.0, 1)]);
        tracker.update(&[]);
        let tracks = tracker.update(&[]);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].age, 2);
        // One more missed frame pushes it past max_age.
        assert!(tracker.update(&[]).is_empty());
    }

    #[test]
    fn match_at_deadline_resets_age() {
        let mut tracker = IouTracker::new(2, 0.3);
        tracker.update(&[det(0.0, 0.0, 10.0, 10.0, 1)]);
        tracker.update(&[]);
        tracker.update(&[]);
        let tracks = tracker.update(&[det(0.0, 0.0, 10.0, 10.0, 1)]);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].age, 0);
        assert_eq!(tracks[0].hits, 2);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut tracker = IouTracker::new(0, 0.3);
        tracker.update(&[det(0.0, 0.0, 10.0, 10.0, 1)]);
        tracker.update(&[]); // track 1 aged out (max_age = 0)
        let tracks = tracker.update(&[det(0.0, 0.0, 10.0, 10.0, 1)]);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, 2);
    }

    #[test]
    fn four_frame_lifecycle_scenario() {
        let mut tracker = IouTracker::new(2, 0.3);

        // Frame 1: two objects appear.
        let tracks = tracker.update(&[
            det(0.0, 0.0, 10.0, 10.0, 1),
            det(50.0, 50.0, 60.0, 60.0, 2),
        ]);
        assert_eq!(
            tracks.iter().map(|t| t.id).collect::<Vec<_>>(),
            vec![1, 2]
        );

        // Frame 2: only the first shifts slightly; the second goes missing.
        let tracks = tracker.update(&[det(1.0, 1.0, 11.0, 11.0, 1)]);
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].age, 0);
        assert_eq!(tracks[1].age, 1);

        // Frame 3: empty input ages both.
        let tracks = tracker.update(&[]);
        assert_eq!(tracks[0].age, 1);
        assert_eq!(tracks[1].age, 2);

        // Frame 4: track 2 crosses max_age and is removed; track 1 remains.
        let tracks = tracker.update(&[]);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].id, 1);
        assert_eq!(tracks[0].age, 2);
    }
}
