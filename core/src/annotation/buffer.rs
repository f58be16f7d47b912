use crate::annotation::keypoint::{FrameRecord, KeypointSet};
use crate::annotation::progress::{KeypointProgress, ProgressReport};
use crate::prelude::{AnnotationError, AnnotationResult};
use log::warn;

/// Authoritative per-frame keypoint state for one loaded media item.
#[derive(Debug, Clone)]
pub struct AnnotationBuffer {
    keypoints: KeypointSet,
    frames: Vec<FrameRecord>,
    dirty: bool,
}

impl AnnotationBuffer {
    /// Builds `frame_count` all-unplaced records over `keypoint_names`.
    pub fn create<I, S>(frame_count: usize, keypoint_names: I) -> AnnotationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keypoints = KeypointSet::new(keypoint_names)?;
        Self::with_keypoints(frame_count, keypoints)
    }

    pub fn with_keypoints(frame_count: usize, keypoints: KeypointSet) -> AnnotationResult<Self> {
        if frame_count < 1 {
            return Err(AnnotationError::InvalidArgument(
                "frame count must be at least 1".into(),
            ));
        }

        let empty = FrameRecord::unplaced(&keypoints);
        Ok(Self {
            frames: vec![empty; frame_count],
            keypoints,
            dirty: false,
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn keypoints(&self) -> &KeypointSet {
        &self.keypoints
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    pub fn get(&self, frame_index: usize) -> AnnotationResult<&FrameRecord> {
        self.frames
            .get(frame_index)
            .ok_or(AnnotationError::OutOfRange {
                index: frame_index,
                len: self.frames.len(),
            })
    }

    /// Stores a copy of `record` aligned to the configured keypoint set.
    pub fn set(&mut self, frame_index: usize, record: &FrameRecord) -> AnnotationResult<()> {
        self.check_index(frame_index)?;
        let (conformed, extra) = record.conform(&self.keypoints);
        if !extra.is_empty() {
            warn!(
                "frame {}: dropping keypoints outside the configured set: {:?}",
                frame_index, extra
            );
        }
        self.frames[frame_index] = conformed;
        self.dirty = true;
        Ok(())
    }

    pub fn clear(&mut self, frame_index: usize) -> AnnotationResult<()> {
        self.check_index(frame_index)?;
        self.frames[frame_index].clear();
        self.dirty = true;
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Only a successful save or load may reset the flag.
    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn progress(&self) -> ProgressReport {
        let keypoints = self
            .keypoints
            .iter()
            .enumerate()
            .map(|(index, name)| KeypointProgress {
                name: name.to_string(),
                placed: self
                    .frames
                    .iter()
                    .filter(|frame| frame.keypoints()[index].is_placed())
                    .count(),
            })
            .collect();

        ProgressReport {
            frame_count: self.frames.len(),
            annotated_frames: self.frames.iter().filter(|f| f.has_any_placed()).count(),
            keypoints,
        }
    }

    fn check_index(&self, frame_index: usize) -> AnnotationResult<()> {
        if frame_index < self.frames.len() {
            Ok(())
        } else {
            Err(AnnotationError::OutOfRange {
                index: frame_index,
                len: self.frames.len(),
            })
        }
    }
}

/// Buffers compare by content; the dirty flag is session bookkeeping.
impl PartialEq for AnnotationBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.keypoints == other.keypoints && self.frames == other.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::keypoint::Keypoint;
    use crate::prelude::Point;

    #[test]
    fn create_builds_unplaced_frames_with_declared_keys() {
        let buffer = AnnotationBuffer::create(4, ["nose", "left_paw", "tail"]).unwrap();
        assert_eq!(buffer.len(), 4);
        for frame in buffer.frames() {
            let names: Vec<&str> = frame.keypoints().iter().map(|k| k.name.as_str()).collect();
            assert_eq!(names, vec!["nose", "left_paw", "tail"]);
            assert!(!frame.has_any_placed());
        }
        assert!(!buffer.is_dirty());
    }

    #[test]
    fn create_rejects_bad_arguments() {
        assert!(matches!(
            AnnotationBuffer::create(0, ["nose"]),
            Err(AnnotationError::InvalidArgument(_))
        ));
        assert!(matches!(
            AnnotationBuffer::create(3, Vec::<&str>::new()),
            Err(AnnotationError::InvalidArgument(_))
        ));
        assert!(matches!(
            AnnotationBuffer::create(3, ["nose", "nose"]),
            Err(AnnotationError::InvalidArgument(_))
        ));
    }

    #[test]
    fn get_out_of_range_fails() {
        let buffer = AnnotationBuffer::create(2, ["nose"]).unwrap();
        assert!(matches!(
            buffer.get(2),
            Err(AnnotationError::OutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn set_copies_and_marks_dirty() {
        let mut buffer = AnnotationBuffer::create(2, ["nose", "left_paw"]).unwrap();
        let mut record = FrameRecord::from_keypoints(vec![Keypoint::placed("nose", 4.0, 5.0)]);
        buffer.set(1, &record).unwrap();
        record.set_position("nose", Some(Point::new(9.0, 9.0)));

        let stored = buffer.get(1).unwrap();
        assert_eq!(stored.position("nose"), Some(Point::new(4.0, 5.0)));
        assert_eq!(stored.position("left_paw"), None);
        assert_eq!(stored.len(), 2);
        assert!(buffer.is_dirty());
    }

    #[test]
    fn clear_unplaces_frame_and_marks_dirty() {
        let mut buffer = AnnotationBuffer::create(1, ["nose"]).unwrap();
        let record = FrameRecord::from_keypoints(vec![Keypoint::placed("nose", 1.0, 1.0)]);
        buffer.set(0, &record).unwrap();
        buffer.mark_clean();

        buffer.clear(0).unwrap();
        assert!(!buffer.get(0).unwrap().has_any_placed());
        assert!(buffer.is_dirty());
        assert!(buffer.clear(1).is_err());
    }

    #[test]
    fn progress_counts_placements_per_keypoint() {
        let mut buffer = AnnotationBuffer::create(3, ["nose", "tail"]).unwrap();
        let record = FrameRecord::from_keypoints(vec![Keypoint::placed("nose", 1.0, 1.0)]);
        buffer.set(0, &record).unwrap();
        buffer.set(2, &record).unwrap();

        let report = buffer.progress();
        assert_eq!(report.frame_count, 3);
        assert_eq!(report.annotated_frames, 2);
        assert_eq!(report.keypoints[0].placed, 2);
        assert_eq!(report.keypoints[1].placed, 0);
    }
}
