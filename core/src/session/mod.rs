pub mod controller;
pub mod selection;

pub use controller::{AnnotationSession, ClickOutcome, UNSAVED_CHANGES_PROMPT};
pub use selection::Selection;
