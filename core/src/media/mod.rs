pub mod source;

pub use source::{
    open_media, ImageDirectory, MediaKind, MediaSource, SingleImage, VideoFile, IMAGE_ENDINGS,
    VIDEO_ENDINGS,
};

use crate::prelude::{AnnotationError, AnnotationResult};
use std::path::{Path, PathBuf};

pub const SAVE_SUFFIX: &str = "_keypoints.csv";

/// `<stem>_keypoints.csv` inside `save_loc`, or beside the media.
pub fn save_path_for(media: &Path, save_loc: Option<&Path>) -> AnnotationResult<PathBuf> {
    let stem = media
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| {
            AnnotationError::InvalidArgument(format!(
                "cannot derive a save name from {}",
                media.display()
            ))
        })?;

    let directory = match save_loc {
        Some(dir) => {
            if !dir.is_dir() {
                return Err(AnnotationError::InvalidArgument(format!(
                    "save directory does not exist: {}",
                    dir.display()
                )));
            }
            dir.to_path_buf()
        }
        None => media
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };

    Ok(directory.join(format!("{}{}", stem, SAVE_SUFFIX)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_path_defaults_to_media_directory() {
        let path = save_path_for(Path::new("/data/mice/session1.mp4"), None).unwrap();
        assert_eq!(path, PathBuf::from("/data/mice/session1_keypoints.csv"));
    }

    #[test]
    fn save_path_uses_configured_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_path_for(Path::new("/data/frames"), Some(dir.path())).unwrap();
        assert_eq!(path, dir.path().join("frames_keypoints.csv"));

        assert!(save_path_for(Path::new("a.mp4"), Some(Path::new("/no/such/dir"))).is_err());
    }
}
