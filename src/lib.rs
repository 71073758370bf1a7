//! Vigil control core.
//!
//! This crate is the control core of a video-surveillance pipeline: it
//! assigns persistent identities to detected objects, evaluates which
//! tracked objects sit inside operator-defined polygonal zones, and emits
//! rate-limited webhook notifications for targets of interest.
//!
//! # Architecture
//!
//! Per frame, data flows through four components:
//!
//! 1. A [`Detector`] collaborator supplies the frame's detections.
//! 2. [`IouTracker::update`](track::IouTracker::update) matches them
//!    against the live track set by greedy IoU association.
//! 3. [`EventPipeline::assemble`](pipeline::EventPipeline::assemble) joins
//!    the tracks with [`ZoneManager`] checks and the target-class filter
//!    into one event batch.
//! 4. [`Alerter::maybe_alert`](alert::Alerter::maybe_alert) dispatches the
//!    batch to every configured webhook, gated by a cooldown.
//!
//! The whole path is single-threaded and synchronous: one frame completes
//! before the next begins, and the only blocking operation is webhook
//! delivery, bounded by a short per-request timeout. No condition in the
//! core is fatal; malformed geometry is neutralized numerically and
//! delivery failures are logged and swallowed, so frame processing never
//! halts.
//!
//! # Module structure
//!
//! - `detect`: detection types and the detector/label collaborator seams
//! - `track`: IoU helper, [`Track`], [`IouTracker`]
//! - `zones`: [`Zone`], [`ZoneManager`] point-in-polygon evaluation
//! - `pipeline`: [`Event`], per-frame [`EventPipeline`]
//! - `alert`: payload, transport seam, cooldown-gated [`Alerter`]
//! - `config`: JSON config file + `VIGIL_*` env overrides

pub mod alert;
pub mod config;
pub mod detect;
pub mod pipeline;
pub mod track;
pub mod zones;

pub use alert::{AlertPayload, AlertTransport, Alerter, HttpTransport};
pub use config::{AlertSettings, TrackerSettings, VigilConfig};
pub use detect::{BoundingBox, Detection, Detector, LabelLookup, LabelTable, StubDetector};
pub use pipeline::{Event, EventPipeline};
pub use track::{iou, IouTracker, Track};
pub use zones::{Zone, ZoneManager};
