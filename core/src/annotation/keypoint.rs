use crate::prelude::{AnnotationError, AnnotationResult, Point};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered, duplicate-free list of keypoint names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeypointSet {
    names: Vec<String>,
}

impl KeypointSet {
    pub fn new<I, S>(names: I) -> AnnotationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(AnnotationError::InvalidArgument(
                "keypoint list is empty".into(),
            ));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if name.is_empty() {
                return Err(AnnotationError::InvalidArgument(
                    "keypoint names must not be empty".into(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(AnnotationError::InvalidArgument(format!(
                    "duplicate keypoint name `{}`",
                    name
                )));
            }
        }

        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|candidate| candidate == name)
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// A named landmark and its placement in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub name: String,
    pub position: Option<Point>,
}

impl Keypoint {
    pub fn unplaced(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: None,
        }
    }

    pub fn placed(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            position: Point::finite(x, y),
        }
    }

    /// Placed means a position with finite coordinates.
    pub fn is_placed(&self) -> bool {
        self.position.map_or(false, |point| point.is_finite())
    }
}

/// Keypoint placements for a single frame, in declared keypoint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    keypoints: Vec<Keypoint>,
}

impl FrameRecord {
    pub fn unplaced(set: &KeypointSet) -> Self {
        Self {
            keypoints: set.iter().map(Keypoint::unplaced).collect(),
        }
    }

    /// Builds a record from arbitrary keypoints. Order and key set follow
    /// whatever the caller passed; use `conform` to align it to a set.
    pub fn from_keypoints(keypoints: Vec<Keypoint>) -> Self {
        Self { keypoints }
    }

    /// Realigns the record to `set`: missing names become unplaced, names
    /// outside the set are returned so the caller can report them.
    pub fn conform(&self, set: &KeypointSet) -> (FrameRecord, Vec<String>) {
        let keypoints = set
            .iter()
            .map(|name| Keypoint {
                name: name.to_string(),
                position: self.position(name).and_then(|p| Point::finite(p.x, p.y)),
            })
            .collect();
        let extra = self
            .keypoints
            .iter()
            .filter(|keypoint| set.index_of(&keypoint.name).is_none())
            .map(|keypoint| keypoint.name.clone())
            .collect();
        (FrameRecord { keypoints }, extra)
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    pub fn get(&self, name: &str) -> Option<&Keypoint> {
        self.keypoints.iter().find(|keypoint| keypoint.name == name)
    }

    pub fn position(&self, name: &str) -> Option<Point> {
        self.get(name).and_then(|keypoint| keypoint.position)
    }

    pub fn position_at(&self, index: usize) -> Option<Point> {
        self.keypoints.get(index).and_then(|keypoint| keypoint.position)
    }

    /// Places (or with `None` unplaces) the keypoint at `index`. Non-finite
    /// points leave the keypoint unplaced. Returns false for a bad index.
    pub fn set_position_at(&mut self, index: usize, position: Option<Point>) -> bool {
        match self.keypoints.get_mut(index) {
            Some(keypoint) => {
                keypoint.position = position.filter(Point::is_finite);
                true
            }
            None => false,
        }
    }

    pub fn set_position(&mut self, name: &str, position: Option<Point>) -> bool {
        match self.keypoints.iter().position(|keypoint| keypoint.name == name) {
            Some(index) => self.set_position_at(index, position),
            None => false,
        }
    }

    pub fn clear(&mut self) {
        for keypoint in &mut self.keypoints {
            keypoint.position = None;
        }
    }

    pub fn has_any_placed(&self) -> bool {
        self.keypoints.iter().any(Keypoint::is_placed)
    }

    pub fn first_unplaced(&self) -> Option<usize> {
        self.keypoints.iter().position(|keypoint| !keypoint.is_placed())
    }

    /// First unplaced keypoint strictly after `index`.
    pub fn next_unplaced_after(&self, index: usize) -> Option<usize> {
        self.keypoints
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, keypoint)| !keypoint.is_placed())
            .map(|(idx, _)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypoint_set_rejects_empty_and_duplicates() {
        assert!(matches!(
            KeypointSet::new(Vec::<String>::new()),
            Err(AnnotationError::InvalidArgument(_))
        ));
        assert!(matches!(
            KeypointSet::new(["nose", "tail", "nose"]),
            Err(AnnotationError::InvalidArgument(_))
        ));
    }

    #[test]
    fn conform_fills_missing_and_reports_extra() {
        let set = KeypointSet::new(["nose", "left_paw"]).unwrap();
        let record = FrameRecord::from_keypoints(vec![
            Keypoint::placed("left_paw", 1.0, 2.0),
            Keypoint::placed("whisker", 3.0, 4.0),
        ]);

        let (conformed, extra) = record.conform(&set);
        assert_eq!(conformed.keypoints()[0], Keypoint::unplaced("nose"));
        assert_eq!(conformed.position("left_paw"), Some(Point::new(1.0, 2.0)));
        assert_eq!(extra, vec!["whisker".to_string()]);
    }

    #[test]
    fn non_finite_positions_stay_unplaced() {
        let set = KeypointSet::new(["nose"]).unwrap();
        let mut record = FrameRecord::unplaced(&set);
        record.set_position("nose", Some(Point::new(f64::NAN, 1.0)));
        assert!(!record.has_any_placed());
    }

    #[test]
    fn next_unplaced_skips_placed_keypoints() {
        let set = KeypointSet::new(["a", "b", "c", "d"]).unwrap();
        let mut record = FrameRecord::unplaced(&set);
        record.set_position("b", Some(Point::new(1.0, 1.0)));
        assert_eq!(record.next_unplaced_after(0), Some(2));
        assert_eq!(record.next_unplaced_after(3), None);
        assert_eq!(record.first_unplaced(), Some(0));
    }
}
