use anyhow::Result;
use std::collections::HashMap;

use crate::detect::result::Detection;

/// Per-frame detection source.
///
/// Implementations wrap whatever inference engine feeds the pipeline; the
/// control core only requires that each call yields the detections for one
/// frame in a stable order (the tracker's tie-break depends on that order).
pub trait Detector: Send {
    /// Detector identifier, used in daemon logging.
    fn name(&self) -> &'static str;

    /// Produce the detections for the next frame.
    fn detect(&mut self) -> Result<Vec<Detection>>;
}

/// Class-id to display-label resolution, provided by the detector side.
pub trait LabelLookup {
    /// Resolve a label, falling back to the stringified id for unknown
    /// classes. Never fails.
    fn label(&self, class_id: u32) -> String;
}

/// Static label table backed by a class-id map.
#[derive(Clone, Debug, Default)]
pub struct LabelTable {
    names: HashMap<u32, String>,
}

impl LabelTable {
    pub fn new(names: HashMap<u32, String>) -> Self {
        Self { names }
    }

    /// Build from an indexed list of names (index = class id).
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names
                .into_iter()
                .enumerate()
                .map(|(id, name)| (id as u32, name.into()))
                .collect(),
        }
    }
}

impl LabelLookup for LabelTable {
    fn label(&self, class_id: u32) -> String {
        self.names
            .get(&class_id)
            .cloned()
            .unwrap_or_else(|| class_id.to_string())
    }
}
