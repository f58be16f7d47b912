//! Core of the pose keypoint annotator.
//!
//! Holds the frame-indexed keypoint buffer, its sparse CSV table codec and
//! the interactive session that front ends drive with click, drag, release
//! and navigation events.

pub mod annotation;
pub mod codec;
pub mod math;
pub mod media;
pub mod prelude;
pub mod session;
pub mod telemetry;

pub use annotation::{AnnotationBuffer, FrameRecord, Keypoint, KeypointSet};
pub use prelude::{AnnotationError, AnnotationResult, MouseButton, Point, SessionConfig, UserPrompt};
pub use session::{AnnotationSession, ClickOutcome};
