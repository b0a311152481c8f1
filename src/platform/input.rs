//! Scripted input for demos and tests

use super::{InputFrame, InputSource, PlatformError};
use crate::sim::MoveDirection;

/// Replays a fixed list of input frames
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: Vec<InputFrame>,
    cursor: usize,
    /// Start over at the end instead of quitting
    repeat: bool,
}

impl ScriptedInput {
    /// Play `frames` once, then request quit
    pub fn new(frames: Vec<InputFrame>) -> Self {
        Self {
            frames,
            cursor: 0,
            repeat: false,
        }
    }

    /// Loop over `frames` forever
    pub fn cycle(frames: Vec<InputFrame>) -> Self {
        Self {
            frames,
            cursor: 0,
            repeat: true,
        }
    }

    /// Hop forward every `interval` frames and restart whenever the run ends
    pub fn hopper(interval: usize) -> Self {
        let mut frames = vec![InputFrame::default(); interval.max(1)];
        if let Some(last) = frames.last_mut() {
            last.movement = Some(MoveDirection::Up);
            last.restart = true;
        }
        Self::cycle(frames)
    }

    pub fn frames_played(&self) -> usize {
        self.cursor
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Result<InputFrame, PlatformError> {
        if self.frames.is_empty() {
            return Err(PlatformError::Input("empty input script".into()));
        }
        let index = if self.repeat {
            self.cursor % self.frames.len()
        } else {
            self.cursor
        };
        self.cursor += 1;

        Ok(self.frames.get(index).cloned().unwrap_or(InputFrame {
            quit: true,
            ..Default::default()
        }))
    }
}
