use anyhow::Context;
use posecore::prelude::SessionConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Full driver configuration: session settings plus what to open.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    #[serde(flatten)]
    pub session: SessionConfig,
    /// Image, video or image directory to annotate.
    pub path: Option<PathBuf>,
    /// Frame count reported by the video reader.
    pub frames: Option<usize>,
}

/// Command-line values that win over the config file.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub path: Option<PathBuf>,
    pub frames: Option<usize>,
    pub save_loc: Option<PathBuf>,
    pub keypoints: Option<Vec<String>>,
    pub radius: Option<f64>,
    pub autosave: bool,
}

impl AnnotatorConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading annotator config {}", path_ref.display()))?;
        let config: AnnotatorConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing annotator config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Defaults, then the optional YAML file, then command-line overrides.
    pub fn resolve(file: Option<&Path>, overrides: &ConfigOverrides) -> anyhow::Result<Self> {
        let mut config = match file {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        Ok(config)
    }

    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(path) = &overrides.path {
            self.path = Some(path.clone());
        }
        if let Some(frames) = overrides.frames {
            self.frames = Some(frames);
        }
        if let Some(save_loc) = &overrides.save_loc {
            self.session.save_loc = Some(save_loc.clone());
        }
        if let Some(keypoints) = &overrides.keypoints {
            self.session.keypoints = keypoints.clone();
        }
        if let Some(radius) = overrides.radius {
            self.session.radius = radius;
        }
        if overrides.autosave {
            self.session.autosave = true;
        }
    }

    pub fn media_path(&self) -> anyhow::Result<&Path> {
        self.path
            .as_deref()
            .context("no media to open; pass --path or set `path` in the config")
    }
}
