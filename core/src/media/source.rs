use crate::prelude::{AnnotationError, AnnotationResult};
use std::fs;
use std::path::{Path, PathBuf};

pub const IMAGE_ENDINGS: [&str; 5] = ["png", "jpg", "tiff", "tif", "bmp"];
pub const VIDEO_ENDINGS: [&str; 3] = ["mov", "mp4", "avi"];

/// How a media path is read frame by frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    ImageDirectory,
}

impl MediaKind {
    pub fn detect(path: &Path) -> AnnotationResult<Self> {
        if !path.exists() {
            return Err(AnnotationError::InvalidArgument(format!(
                "media path does not exist: {}",
                path.display()
            )));
        }
        if path.is_dir() {
            return Ok(MediaKind::ImageDirectory);
        }

        let ending = extension(path);
        if IMAGE_ENDINGS.contains(&ending.as_str()) {
            Ok(MediaKind::Image)
        } else if VIDEO_ENDINGS.contains(&ending.as_str()) {
            Ok(MediaKind::Video)
        } else {
            Err(AnnotationError::InvalidArgument(format!(
                "filetype of input not known: {}",
                path.display()
            )))
        }
    }
}

/// What the session needs from the external frame reader.
pub trait MediaSource {
    fn path(&self) -> &Path;
    fn frame_count(&self) -> usize;
    /// One name per frame, used for the optional `image_name` column.
    fn image_names(&self) -> Vec<String>;
}

pub struct SingleImage {
    path: PathBuf,
}

impl SingleImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MediaSource for SingleImage {
    fn path(&self) -> &Path {
        &self.path
    }

    fn frame_count(&self) -> usize {
        1
    }

    fn image_names(&self) -> Vec<String> {
        vec![self.path.display().to_string()]
    }
}

/// A directory of still images read as consecutive frames, sorted by name.
pub struct ImageDirectory {
    path: PathBuf,
    files: Vec<PathBuf>,
}

impl ImageDirectory {
    pub fn open(path: impl Into<PathBuf>) -> AnnotationResult<Self> {
        let path = path.into();
        let mut files = Vec::new();
        for entry in fs::read_dir(&path)? {
            let candidate = entry?.path();
            if candidate.is_file() && IMAGE_ENDINGS.contains(&extension(&candidate).as_str()) {
                files.push(candidate);
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(AnnotationError::InvalidArgument(format!(
                "no image files in directory {}",
                path.display()
            )));
        }
        Ok(Self { path, files })
    }
}

impl MediaSource for ImageDirectory {
    fn path(&self) -> &Path {
        &self.path
    }

    fn frame_count(&self) -> usize {
        self.files.len()
    }

    fn image_names(&self) -> Vec<String> {
        self.files
            .iter()
            .map(|file| {
                file.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default()
            })
            .collect()
    }
}

/// A video whose length was reported by the decoder.
pub struct VideoFile {
    path: PathBuf,
    frame_count: usize,
}

impl VideoFile {
    pub fn new(path: impl Into<PathBuf>, frame_count: usize) -> Self {
        Self {
            path: path.into(),
            frame_count,
        }
    }
}

impl MediaSource for VideoFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn frame_count(&self) -> usize {
        self.frame_count
    }

    fn image_names(&self) -> Vec<String> {
        vec![self.path.display().to_string(); self.frame_count]
    }
}

/// Opens `path` as the matching source. Videos need `video_frames`, since
/// decoding happens outside this crate.
pub fn open_media(
    path: &Path,
    video_frames: Option<usize>,
) -> AnnotationResult<Box<dyn MediaSource>> {
    match MediaKind::detect(path)? {
        MediaKind::Image => Ok(Box::new(SingleImage::new(path))),
        MediaKind::ImageDirectory => Ok(Box::new(ImageDirectory::open(path)?)),
        MediaKind::Video => {
            let frames = video_frames.ok_or_else(|| {
                AnnotationError::InvalidArgument(format!(
                    "frame count for video {} must come from the frame reader",
                    path.display()
                ))
            })?;
            Ok(Box::new(VideoFile::new(path, frames)))
        }
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
