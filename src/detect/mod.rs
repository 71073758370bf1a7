mod detector;
mod result;
mod stub;

pub use detector::{Detector, LabelLookup, LabelTable};
pub use result::{BoundingBox, Detection};
pub use stub::StubDetector;
