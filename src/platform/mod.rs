//! Platform abstraction layer
//!
//! The simulation never touches a device directly. Everything outside the
//! core goes through three seams:
//! - `InputSource`: one resolved input frame per poll
//! - `Renderer`: consumes a `FrameView`
//! - `Clock`: wall-clock milliseconds and blocking sleeps

pub mod headless;
pub mod input;
pub mod time;

pub use headless::LogRenderer;
pub use input::ScriptedInput;
pub use time::{ManualClock, SystemClock};

use crate::frame::FrameView;
use crate::sim::TickInput;

/// Errors raised at the platform seams
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Input error: {0}")]
    Input(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

/// One frame of player intent
pub type InputFrame = TickInput;

/// Source of per-frame input
pub trait InputSource {
    fn poll(&mut self) -> Result<InputFrame, PlatformError>;
}

/// Consumer of render extracts
pub trait Renderer {
    fn render(&mut self, frame: &FrameView) -> Result<(), PlatformError>;
}

/// Wall clock used for cooldowns, hop timing and frame pacing
pub trait Clock {
    fn now_ms(&self) -> u64;
    fn sleep_ms(&mut self, ms: u64);
}
