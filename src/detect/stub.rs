use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::detect::detector::{Detector, LabelLookup, LabelTable};
use crate::detect::result::{BoundingBox, Detection};

const PERSON_CLASS: u32 = 0;
const CAR_CLASS: u32 = 2;

/// Stub detector for daemon bring-up and tests.
///
/// Emits two synthetic objects drifting across the frame (a "person" moving
/// left to right, a "car" moving right to left) with light positional
/// jitter, so the full tracker/zone/alert path can run with no camera or
/// inference model attached.
pub struct StubDetector {
    width: f32,
    height: f32,
    frame: u64,
    rng: StdRng,
    labels: LabelTable,
}

impl StubDetector {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_seed(width, height, rand::thread_rng().gen())
    }

    /// Seeded constructor so tests get reproducible trajectories.
    pub fn with_seed(width: u32, height: u32, seed: u64) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
            frame: 0,
            rng: StdRng::seed_from_u64(seed),
            labels: LabelTable::from_names(["person", "bicycle", "car"]),
        }
    }

    fn jitter(&mut self) -> f32 {
        self.rng.gen_range(-2.0..=2.0)
    }
}

impl Detector for StubDetector {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn detect(&mut self) -> Result<Vec<Detection>> {
        let t = self.frame as f32;
        self.frame += 1;

        // Person: 60x120 box walking left to right, wrapping at the edge.
        let px = (t * 4.0) % (self.width + 60.0) - 60.0 + self.jitter();
        let py = self.height * 0.4 + self.jitter();
        let person = Detection::new(
            BoundingBox::new(px, py, px + 60.0, py + 120.0),
            0.9,
            PERSON_CLASS,
        );

        // Car: 180x90 box rolling right to left along the lower third.
        let cx = self.width - (t * 6.0) % (self.width + 180.0) + self.jitter();
        let cy = self.height * 0.65 + self.jitter();
        let car = Detection::new(
            BoundingBox::new(cx, cy, cx + 180.0, cy + 90.0),
            0.8,
            CAR_CLASS,
        );

        Ok(vec![person, car])
    }
}

impl LabelLookup for StubDetector {
    fn label(&self, class_id: u32) -> String {
        self.labels.label(class_id)
    }
}
