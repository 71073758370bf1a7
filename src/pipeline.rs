//! Per-frame event assembly: joins tracker output with zone checks and the
//! target-class filter into a single alertable batch.

use serde::Serialize;
use std::collections::HashSet;

use crate::detect::LabelLookup;
use crate::track::Track;
use crate::zones::ZoneManager;

/// One zone intrusion by one track, valid only for the frame that produced
/// it. Serializes with the webhook payload field names.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Event {
    pub track: u64,
    pub class: u32,
    pub label: String,
    pub zones: Vec<String>,
}

/// Stateless per-frame join of tracks, zones, and the target-class filter.
#[derive(Clone, Debug)]
pub struct EventPipeline {
    zones: ZoneManager,
    target_classes: HashSet<u32>,
}

impl EventPipeline {
    pub fn new(zones: ZoneManager, target_classes: HashSet<u32>) -> Self {
        Self {
            zones,
            target_classes,
        }
    }

    pub fn zone_manager(&self) -> &ZoneManager {
        &self.zones
    }

    /// Build the frame's event batch. A track produces an event only when
    /// its centroid lies in at least one zone and its class is a configured
    /// target. The batch (possibly empty) is handed to the alerter exactly
    /// once per frame by the caller.
    pub fn assemble(
        &self,
        tracks: &[Track],
        labels: &dyn LabelLookup,
        width: u32,
        height: u32,
    ) -> Vec<Event> {
        let mut events = Vec::new();
        for track in tracks {
            let zones_hit = self.zones.check(&track.bbox, width, height);
            if zones_hit.is_empty() || !self.target_classes.contains(&track.class_id) {
                continue;
            }
            events.push(Event {
                track: track.id,
                class: track.class_id,
                label: labels.label(track.class_id),
                zones: zones_hit,
            });
        }
        events
    }
}
