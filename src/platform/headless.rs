//! Headless renderer that reports frames through the log

use super::{PlatformError, Renderer};
use crate::frame::{FrameView, instance_bytes};

/// Logs the HUD periodically and every message change
#[derive(Debug, Clone)]
pub struct LogRenderer {
    /// Log the HUD line every this many frames
    pub log_every: u64,
    frames: u64,
    last_message: Option<String>,
    /// Bytes that would have been uploaded as rect instances
    pub bytes_uploaded: usize,
}

impl LogRenderer {
    pub fn new(log_every: u64) -> Self {
        Self {
            log_every: log_every.max(1),
            frames: 0,
            last_message: None,
            bytes_uploaded: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for LogRenderer {
    fn default() -> Self {
        Self::new(60)
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &FrameView) -> Result<(), PlatformError> {
        self.frames += 1;
        self.bytes_uploaded += instance_bytes(&frame.rect_instances()).len();
        self.bytes_uploaded += instance_bytes(&frame.circle_instances()).len();

        if frame.message != self.last_message {
            if let Some(message) = &frame.message {
                log::info!("{}", message);
            }
            self.last_message = frame.message.clone();
        }

        if self.frames % self.log_every == 0 {
            log::debug!(
                "frame {}: {} ({} lanes, {} vehicles visible)",
                self.frames,
                frame.hud_text(),
                frame.lanes.len(),
                frame.vehicles.len()
            );
        }
        Ok(())
    }
}
