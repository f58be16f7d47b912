pub mod buffer;
pub mod keypoint;
pub mod progress;

pub use buffer::AnnotationBuffer;
pub use keypoint::{FrameRecord, Keypoint, KeypointSet};
pub use progress::{KeypointProgress, ProgressReport};
