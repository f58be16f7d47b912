use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Canvas coordinate of a placed keypoint, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the point only when both coordinates are finite.
    pub fn finite(x: f64, y: f64) -> Option<Self> {
        if x.is_finite() && y.is_finite() {
            Some(Self { x, y })
        } else {
            None
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Mouse button reported by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
}

/// Configuration consumed by an annotation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Ordered keypoint names; order defines column order on disk.
    pub keypoints: Vec<String>,
    /// Placement tolerance used when grabbing an existing keypoint.
    pub radius: f64,
    /// Button that places the selected keypoint; the other one drags.
    pub click_type_to_add_keypoint: MouseButton,
    /// Directory for save files. Defaults to the media's directory.
    pub save_loc: Option<PathBuf>,
    /// Save after every committed edit.
    pub autosave: bool,
    /// Append an `image_name` column to saved tables.
    pub save_image_names: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            keypoints: Vec::new(),
            radius: 20.0,
            click_type_to_add_keypoint: MouseButton::Right,
            save_loc: None,
            autosave: false,
            save_image_names: false,
        }
    }
}

/// Error taxonomy shared by the buffer, codec and session.
#[derive(thiserror::Error, Debug)]
pub enum AnnotationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("frame index {index} out of range for {len} frames")]
    OutOfRange { index: usize, len: usize },
    #[error("malformed keypoint table: {0}")]
    MalformedTable(String),
    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for AnnotationError {
    fn from(err: csv::Error) -> Self {
        let message = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => AnnotationError::Io(io),
            _ => AnnotationError::MalformedTable(message),
        }
    }
}

pub type AnnotationResult<T> = Result<T, AnnotationError>;

/// Blocking question/notification channel to the interactive user.
pub trait UserPrompt {
    /// Asks a yes/no question. `true` means yes.
    fn confirm(&mut self, message: &str) -> bool;
    fn notify(&mut self, message: &str);
}
