use anyhow::Context;
use posecore::prelude::MouseButton;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A recorded input event, as a front end would deliver it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    Click {
        x: f64,
        y: f64,
        button: MouseButton,
        /// Defaults to the current frame.
        #[serde(default)]
        frame: Option<usize>,
    },
    Drag {
        x: f64,
        y: f64,
        #[serde(default)]
        frame: Option<usize>,
    },
    Release,
    Navigate {
        frame: usize,
    },
    NextFrame,
    PreviousFrame,
    Select {
        keypoint: String,
    },
    NextKeypoint,
    PreviousKeypoint,
    ClearSelected,
    ClearFrame,
    Save,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventScript {
    pub events: Vec<ScriptEvent>,
}

impl EventScript {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading event script {}", path_ref.display()))?;
        Self::parse(&contents).with_context(|| format!("parsing event script {}", path_ref.display()))
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_event_kind() {
        let script = EventScript::parse(
            "events:
  - event: click
    x: 10.0
    y: 20.5
    button: right
  - event: drag
    x: 11
    y: 21
    frame: 0
  - event: release
  - event: navigate
    frame: 4
  - event: next_frame
  - event: previous_frame
  - event: select
    keypoint: left_paw
  - event: next_keypoint
  - event: previous_keypoint
  - event: clear_selected
  - event: clear_frame
  - event: save
",
        )
        .unwrap();

        assert_eq!(script.events.len(), 12);
        assert_eq!(
            script.events[0],
            ScriptEvent::Click {
                x: 10.0,
                y: 20.5,
                button: MouseButton::Right,
                frame: None
            }
        );
        assert_eq!(
            script.events[1],
            ScriptEvent::Drag {
                x: 11.0,
                y: 21.0,
                frame: Some(0)
            }
        );
        assert_eq!(script.events[11], ScriptEvent::Save);
    }

    #[test]
    fn unknown_event_is_rejected() {
        assert!(EventScript::parse("events:\n  - event: undo\n").is_err());
    }
}
