use crate::workflow::script::{EventScript, ScriptEvent};
use anyhow::{anyhow, Context};
use posecore::prelude::Point;
use posecore::session::{AnnotationSession, ClickOutcome};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub struct RunReport {
    pub events_applied: usize,
    pub placements: usize,
    pub grabs: usize,
    pub final_frame: usize,
    pub saved_to: Vec<PathBuf>,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Script run -> events {}, placements {}, grabs {}, final frame {}, saves {}",
            self.events_applied,
            self.placements,
            self.grabs,
            self.final_frame,
            self.saved_to.len()
        )
    }
}

/// Feeds recorded events into a session, one at a time.
#[derive(Clone, Default)]
pub struct Runner;

impl Runner {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(
        &self,
        session: &mut AnnotationSession,
        script: &EventScript,
    ) -> anyhow::Result<RunReport> {
        let mut report = RunReport {
            events_applied: 0,
            placements: 0,
            grabs: 0,
            final_frame: session.current_frame(),
            saved_to: Vec::new(),
        };

        for (index, event) in script.events.iter().enumerate() {
            self.apply(session, event, &mut report)
                .with_context(|| format!("applying event #{} {:?}", index + 1, event))?;
            report.events_applied += 1;
        }

        report.final_frame = session.current_frame();
        Ok(report)
    }

    fn apply(
        &self,
        session: &mut AnnotationSession,
        event: &ScriptEvent,
        report: &mut RunReport,
    ) -> anyhow::Result<()> {
        match event {
            ScriptEvent::Click {
                x,
                y,
                button,
                frame,
            } => {
                let frame = frame.unwrap_or_else(|| session.current_frame());
                match session.on_click(frame, Point::new(*x, *y), *button)? {
                    ClickOutcome::Placed { .. } => report.placements += 1,
                    ClickOutcome::Grabbed { .. } => report.grabs += 1,
                    ClickOutcome::Ignored => {}
                }
            }
            ScriptEvent::Drag { x, y, frame } => {
                let frame = frame.unwrap_or_else(|| session.current_frame());
                session.on_drag(frame, Point::new(*x, *y))?;
            }
            ScriptEvent::Release => session.on_release()?,
            ScriptEvent::Navigate { frame } => session.on_navigate(*frame)?,
            ScriptEvent::NextFrame => session.next_frame()?,
            ScriptEvent::PreviousFrame => session.previous_frame()?,
            ScriptEvent::Select { keypoint } => {
                let index = session
                    .buffer()
                    .keypoints()
                    .index_of(keypoint)
                    .ok_or_else(|| anyhow!("unknown keypoint `{}`", keypoint))?;
                session.set_selected(index);
            }
            ScriptEvent::NextKeypoint => {
                session.increment_selected();
            }
            ScriptEvent::PreviousKeypoint => {
                session.decrement_selected();
            }
            ScriptEvent::ClearSelected => {
                session.clear_selected()?;
            }
            ScriptEvent::ClearFrame => session.clear_frame()?,
            ScriptEvent::Save => report.saved_to.push(session.save()?),
        }
        Ok(())
    }
}
