//! Player movement
//!
//! The player hops one grid cell per accepted input. The logical position is
//! committed the instant a hop starts; the hop arc is purely cosmetic and is
//! only read by the render extract.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::strip::LaneStrip;
use crate::consts::*;

/// Player state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerPhase {
    /// Waiting for input
    Idle,
    /// Mid-hop; further input is ignored until the arc completes
    Hopping,
    /// Hit by a vehicle
    GameOver,
}

/// One discrete grid step. There is no backward move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    Up,
    Left,
    Right,
}

impl MoveDirection {
    /// Resolve held keys into a single move (up beats left beats right)
    pub fn from_held(up: bool, left: bool, right: bool) -> Option<Self> {
        if up {
            Some(MoveDirection::Up)
        } else if left {
            Some(MoveDirection::Left)
        } else if right {
            Some(MoveDirection::Right)
        } else {
            None
        }
    }

    /// Grid delta as `(dx, dy)`
    pub fn delta(self) -> (i32, f32) {
        match self {
            MoveDirection::Up => (0, -1.0),
            MoveDirection::Left => (-1, 0.0),
            MoveDirection::Right => (1, 0.0),
        }
    }
}

/// Result of an accepted move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    pub from: Vec2,
    pub to: Vec2,
    /// Target Y was pulled onto a sub-lane midline
    pub snapped: bool,
    /// Score earned by the move
    pub points: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub grid_x: i32,
    /// Continuous: may sit on a sub-lane midline
    pub grid_y: f32,
    pub target_x: i32,
    pub target_y: f32,
    pub phase: PlayerPhase,
    pub hop_start_ms: u64,
    pub last_move_ms: u64,
}

impl Player {
    pub fn spawn(grid_x: i32, grid_y: f32, now_ms: u64) -> Self {
        Self {
            grid_x,
            grid_y,
            target_x: grid_x,
            target_y: grid_y,
            phase: PlayerPhase::Idle,
            hop_start_ms: 0,
            last_move_ms: now_ms,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.grid_x as f32, self.grid_y)
    }

    /// Top edge of the view, keeping the player in the bottom third
    #[inline]
    pub fn camera_y(&self) -> f32 {
        self.grid_y - CAMERA_FOLLOW_OFFSET
    }

    pub fn is_alive(&self) -> bool {
        self.phase != PlayerPhase::GameOver
    }

    /// Idle and past the move cooldown
    pub fn can_move(&self, now_ms: u64) -> bool {
        self.phase == PlayerPhase::Idle && now_ms.saturating_sub(self.last_move_ms) >= MOVE_COOLDOWN_MS
    }

    /// Attempt a grid step. Rejected moves leave the player untouched.
    pub fn try_move(&mut self, direction: MoveDirection, now_ms: u64, strip: &LaneStrip) -> Option<MoveOutcome> {
        if !self.can_move(now_ms) {
            return None;
        }

        let from = self.position();
        let (dx, dy) = direction.delta();
        let target_x = (self.grid_x + dx).clamp(0, GRID_WIDTH - 1);
        let mut target_y = self.grid_y + dy;
        let mut snapped = false;

        // Entering a road: rest on the closest sub-lane centerline
        if dy != 0.0 {
            if let Some(midline) = strip
                .road_at(target_y)
                .and_then(|id| strip.get(id))
                .and_then(|lane| lane.nearest_midline(target_y))
            {
                snapped = midline != target_y;
                target_y = midline;
            }
        }

        self.target_x = target_x;
        self.target_y = target_y;
        self.grid_x = target_x;
        self.grid_y = target_y;
        self.phase = PlayerPhase::Hopping;
        self.hop_start_ms = now_ms;
        self.last_move_ms = now_ms;

        let points = if target_y < from.y {
            ((from.y - target_y) * POINTS_PER_ROW).round() as u64
        } else {
            0
        };

        Some(MoveOutcome {
            from,
            to: self.position(),
            snapped,
            points,
        })
    }

    /// End the hop once its duration has elapsed
    pub fn update_hop(&mut self, now_ms: u64) {
        if self.phase == PlayerPhase::Hopping && now_ms.saturating_sub(self.hop_start_ms) >= HOP_DURATION_MS {
            self.phase = PlayerPhase::Idle;
        }
    }

    /// Cosmetic height of the hop arc in grid units
    pub fn hop_offset(&self, now_ms: u64) -> f32 {
        if self.phase != PlayerPhase::Hopping {
            return 0.0;
        }
        let elapsed = now_ms.saturating_sub(self.hop_start_ms) as f32;
        let progress = (elapsed / HOP_DURATION_MS as f32).min(1.0);
        HOP_AMPLITUDE * (std::f32::consts::PI * progress).sin()
    }

    /// Fraction of the move cooldown that has elapsed (1.0 = ready)
    pub fn cooldown_progress(&self, now_ms: u64) -> f32 {
        let elapsed = now_ms.saturating_sub(self.last_move_ms) as f32;
        (elapsed / MOVE_COOLDOWN_MS as f32).min(1.0)
    }

    /// Terminal transition on collision
    pub fn kill(&mut self) {
        self.phase = PlayerPhase::GameOver;
    }
}
