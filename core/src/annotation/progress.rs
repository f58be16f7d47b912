use serde::{Deserialize, Serialize};

/// Placement count for one keypoint across all frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeypointProgress {
    pub name: String,
    pub placed: usize,
}

/// Summary of how much of a buffer has been annotated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub frame_count: usize,
    pub annotated_frames: usize,
    pub keypoints: Vec<KeypointProgress>,
}

impl ProgressReport {
    pub fn completion(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        self.annotated_frames as f64 / self.frame_count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_is_fraction_of_annotated_frames() {
        let report = ProgressReport {
            frame_count: 4,
            annotated_frames: 1,
            keypoints: Vec::new(),
        };
        assert_eq!(report.completion(), 0.25);
    }
}
