use crate::annotation::{AnnotationBuffer, FrameRecord, KeypointSet, ProgressReport};
use crate::codec::{decode, encode, load_table, save_table};
use crate::math::nearest_within;
use crate::media::{save_path_for, MediaSource};
use crate::prelude::{
    AnnotationError, AnnotationResult, MouseButton, Point, SessionConfig, UserPrompt,
};
use crate::session::selection::Selection;
use crate::telemetry::{EditMetrics, LogManager};
use std::path::{Path, PathBuf};

pub const UNSAVED_CHANGES_PROMPT: &str = "You have unsaved changes. Do you want to save?";

/// Result of a canvas click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The selected keypoint was placed at the click position.
    Placed { keypoint: usize },
    /// A placed keypoint was grabbed for dragging.
    Grabbed { keypoint: usize },
    Ignored,
}

/// One open media item and everything edited on it.
///
/// The session owns the annotation buffer. Edits go into a live record for
/// the current frame; placements and clears are committed to the buffer
/// immediately, drags on release or when the frame changes.
pub struct AnnotationSession {
    config: SessionConfig,
    buffer: AnnotationBuffer,
    media_path: PathBuf,
    image_names: Vec<String>,
    save_path: PathBuf,
    frame: usize,
    live: FrameRecord,
    pending: bool,
    selection: Selection,
    drag: Option<usize>,
    logger: LogManager,
    metrics: EditMetrics,
}

impl AnnotationSession {
    /// Creates an all-unplaced session for `media`. Call [`restore`] to pick
    /// up an existing save file.
    ///
    /// [`restore`]: AnnotationSession::restore
    pub fn new(config: SessionConfig, media: &dyn MediaSource) -> AnnotationResult<Self> {
        if !(config.radius.is_finite() && config.radius > 0.0) {
            return Err(AnnotationError::InvalidArgument(format!(
                "radius must be positive, got {}",
                config.radius
            )));
        }

        let keypoints = KeypointSet::new(config.keypoints.iter().cloned())?;
        let buffer = AnnotationBuffer::with_keypoints(media.frame_count(), keypoints)?;
        let save_path = save_path_for(media.path(), config.save_loc.as_deref())?;
        let live = buffer.get(0)?.clone();
        let selection = Selection::new(buffer.keypoints().len());

        let logger = LogManager::new("session");
        logger.record(&format!(
            "opened {} ({} frames), saving to {}",
            media.path().display(),
            buffer.len(),
            save_path.display()
        ));

        Ok(Self {
            config,
            buffer,
            media_path: media.path().to_path_buf(),
            image_names: media.image_names(),
            save_path,
            frame: 0,
            live,
            pending: false,
            selection,
            drag: None,
            logger,
            metrics: EditMetrics::new(),
        })
    }

    /// Replaces the open media after offering to save unsaved work, then
    /// restores the new media's save file if there is one.
    pub fn open_media(
        &mut self,
        media: &dyn MediaSource,
        prompt: &mut dyn UserPrompt,
    ) -> AnnotationResult<bool> {
        self.prompt_for_save(prompt)?;
        let metrics = self.metrics;
        *self = Self::new(self.config.clone(), media)?;
        self.metrics = metrics;
        self.restore()
    }

    /// Loads the conventional save file if it exists. On failure the
    /// buffer is left untouched.
    pub fn restore(&mut self) -> AnnotationResult<bool> {
        if !self.save_path.is_file() {
            return Ok(false);
        }
        let path = self.save_path.clone();
        self.load(&path)?;
        Ok(true)
    }

    pub fn load(&mut self, path: &Path) -> AnnotationResult<()> {
        self.logger.record(&format!("loading from {}", path.display()));
        let buffer = load_table(path).and_then(|table| {
            decode(
                &table,
                self.buffer.len(),
                self.buffer.keypoints().names().to_vec(),
            )
        });
        let buffer = match buffer {
            Ok(buffer) => buffer,
            Err(err) => {
                self.metrics.record_failure();
                self.logger
                    .warn(&format!("load of {} failed: {}", path.display(), err));
                return Err(err);
            }
        };

        self.buffer = buffer;
        self.pending = false;
        self.metrics.record_load();
        self.show_frame(0)
    }

    /// Writes the buffer to the save path. The dirty flag survives a
    /// failed write.
    pub fn save(&mut self) -> AnnotationResult<PathBuf> {
        if self.pending {
            self.buffer.set(self.frame, &self.live)?;
            self.pending = false;
        }

        let mut table = encode(&self.buffer);
        if self.config.save_image_names {
            table.attach_image_names(&self.image_names);
        }

        match save_table(&self.save_path, &table, self.config.save_image_names) {
            Ok(()) => {
                self.buffer.mark_clean();
                self.metrics.record_save();
                self.logger
                    .record(&format!("saving to {}", self.save_path.display()));
                Ok(self.save_path.clone())
            }
            Err(err) => {
                self.metrics.record_failure();
                self.logger.warn(&format!(
                    "save to {} failed: {}",
                    self.save_path.display(),
                    err
                ));
                Err(err)
            }
        }
    }

    /// Asks whether to save when there are unsaved edits. Returns whether a
    /// save happened.
    pub fn prompt_for_save(&mut self, prompt: &mut dyn UserPrompt) -> AnnotationResult<bool> {
        if !self.is_dirty() {
            return Ok(false);
        }
        if prompt.confirm(UNSAVED_CHANGES_PROMPT) {
            self.save()?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn on_click(
        &mut self,
        frame_index: usize,
        position: Point,
        button: MouseButton,
    ) -> AnnotationResult<ClickOutcome> {
        self.follow(frame_index)?;
        if button == self.config.click_type_to_add_keypoint {
            self.place_selected(position)
        } else {
            Ok(self.grab_nearest(position))
        }
    }

    /// Moves the grabbed keypoint. Returns false when nothing is grabbed.
    pub fn on_drag(&mut self, frame_index: usize, position: Point) -> AnnotationResult<bool> {
        self.follow(frame_index)?;
        let (Some(index), Some(point)) = (self.drag, Point::finite(position.x, position.y)) else {
            return Ok(false);
        };
        self.live.set_position_at(index, Some(point));
        self.pending = true;
        self.metrics.record_move();
        Ok(true)
    }

    pub fn on_release(&mut self) -> AnnotationResult<()> {
        self.drag = None;
        if self.pending {
            self.commit()?;
        }
        Ok(())
    }

    /// Switches to `new_frame_index`, first committing uncommitted edits of
    /// the outgoing frame.
    pub fn on_navigate(&mut self, new_frame_index: usize) -> AnnotationResult<()> {
        self.buffer.get(new_frame_index)?;
        if new_frame_index == self.frame {
            return Ok(());
        }
        if self.pending {
            self.commit()?;
        }
        self.show_frame(new_frame_index)
    }

    pub fn next_frame(&mut self) -> AnnotationResult<()> {
        let last = self.buffer.len() - 1;
        self.on_navigate((self.frame + 1).min(last))
    }

    pub fn previous_frame(&mut self) -> AnnotationResult<()> {
        self.on_navigate(self.frame.saturating_sub(1))
    }

    pub fn set_selected(&mut self, index: usize) -> bool {
        self.selection.set(index)
    }

    pub fn increment_selected(&mut self) -> bool {
        self.selection.increment()
    }

    pub fn decrement_selected(&mut self) -> bool {
        self.selection.decrement()
    }

    /// Unplaces the selected keypoint on the current frame.
    pub fn clear_selected(&mut self) -> AnnotationResult<bool> {
        let index = self.selection.index();
        if self.live.position_at(index).is_none() {
            return Ok(false);
        }
        self.live.set_position_at(index, None);
        if self.drag == Some(index) {
            self.drag = None;
        }
        self.metrics.record_clear();
        self.commit()?;
        Ok(true)
    }

    /// Unplaces every keypoint on the current frame.
    pub fn clear_frame(&mut self) -> AnnotationResult<()> {
        self.buffer.clear(self.frame)?;
        self.pending = false;
        self.drag = None;
        self.live = self.buffer.get(self.frame)?.clone();
        self.selection.set(0);
        self.metrics.record_clear();
        if self.config.autosave {
            self.save()?;
        }
        Ok(())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn buffer(&self) -> &AnnotationBuffer {
        &self.buffer
    }

    pub fn live_record(&self) -> &FrameRecord {
        &self.live
    }

    pub fn current_frame(&self) -> usize {
        self.frame
    }

    pub fn frame_count(&self) -> usize {
        self.buffer.len()
    }

    pub fn selected(&self) -> usize {
        self.selection.index()
    }

    pub fn selected_name(&self) -> &str {
        self.buffer
            .keypoints()
            .name(self.selection.index())
            .unwrap_or_default()
    }

    pub fn dragging(&self) -> Option<usize> {
        self.drag
    }

    pub fn is_dirty(&self) -> bool {
        self.pending || self.buffer.is_dirty()
    }

    pub fn media_path(&self) -> &Path {
        &self.media_path
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    pub fn metrics(&self) -> EditMetrics {
        self.metrics.snapshot()
    }

    pub fn progress(&self) -> ProgressReport {
        self.buffer.progress()
    }

    fn follow(&mut self, frame_index: usize) -> AnnotationResult<()> {
        if frame_index != self.frame {
            self.on_navigate(frame_index)?;
        }
        Ok(())
    }

    fn place_selected(&mut self, position: Point) -> AnnotationResult<ClickOutcome> {
        let Some(point) = Point::finite(position.x, position.y) else {
            return Ok(ClickOutcome::Ignored);
        };
        let index = self.selection.index();
        self.live.set_position_at(index, Some(point));
        self.metrics.record_placement();
        if let Some(next) = self.live.next_unplaced_after(index) {
            self.selection.set(next);
        }
        self.commit()?;
        Ok(ClickOutcome::Placed { keypoint: index })
    }

    fn grab_nearest(&mut self, position: Point) -> ClickOutcome {
        let positions = self.live.keypoints().iter().map(|keypoint| keypoint.position);
        self.drag = nearest_within(positions, position, self.config.radius);
        match self.drag {
            Some(keypoint) => ClickOutcome::Grabbed { keypoint },
            None => ClickOutcome::Ignored,
        }
    }

    fn commit(&mut self) -> AnnotationResult<()> {
        self.buffer.set(self.frame, &self.live)?;
        self.pending = false;
        if self.config.autosave {
            self.save()?;
        }
        Ok(())
    }

    fn show_frame(&mut self, frame_index: usize) -> AnnotationResult<()> {
        self.live = self.buffer.get(frame_index)?.clone();
        self.frame = frame_index;
        self.drag = None;
        let target = self
            .live
            .first_unplaced()
            .unwrap_or(self.live.len().saturating_sub(1));
        self.selection.set(target);
        self.logger.detail(&format!(
            "frame {} shown, selected keypoint {}",
            frame_index, target
        ));
        Ok(())
    }
}
