//! Lane generation
//!
//! A lane is a horizontal band of the world strip. Safe lanes are empty
//! grass; road lanes are stacks of one-unit sub-lanes, each carrying traffic
//! in a single direction at a single speed.
//!
//! Y grows downward on screen, so a lane spans `[top_y - height, top_y]` and
//! sub-lane `i` sits at `y = top_y - i`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;

/// Travel direction of a sub-lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// -1.0 for left, +1.0 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// A single-direction traffic corridor, exactly one unit tall
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubLane {
    /// Lower-screen edge of the sub-lane; it spans `[y - height, y]`
    pub y: f32,
    pub height: f32,
    pub direction: Direction,
    /// Unsigned speed in grid units per frame
    pub speed: f32,
}

impl SubLane {
    /// Y of the sub-lane's centerline
    #[inline]
    pub fn midline(&self) -> f32 {
        self.y - self.height / 2.0
    }

    /// Speed with the direction applied
    #[inline]
    pub fn velocity(&self) -> f32 {
        self.speed * self.direction.sign()
    }
}

/// A safe zone or a multi-lane road
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lane {
    pub top_y: f32,
    pub height: f32,
    pub is_safe: bool,
    /// Empty for safe lanes
    pub sub_lanes: Vec<SubLane>,
    /// Initial traffic has been generated for this lane
    #[serde(default)]
    pub populated: bool,
}

impl Lane {
    /// A safe lane of explicit height (used for the spawn zone)
    pub fn safe(top_y: f32, height: f32) -> Self {
        Self {
            top_y,
            height,
            is_safe: true,
            sub_lanes: Vec::new(),
            populated: true,
        }
    }

    /// Smallest Y covered by the lane (its edge nearest the top of the screen)
    #[inline]
    pub fn bottom_y(&self) -> f32 {
        self.top_y - self.height
    }

    /// Inclusive span test
    #[inline]
    pub fn contains(&self, y: f32) -> bool {
        self.top_y >= y && y >= self.bottom_y()
    }

    #[inline]
    pub fn is_road(&self) -> bool {
        !self.is_safe
    }

    /// The sub-lane midline closest to `y`
    pub fn nearest_midline(&self, y: f32) -> Option<f32> {
        self.sub_lanes
            .iter()
            .map(SubLane::midline)
            .min_by(|a, b| (y - a).abs().total_cmp(&(y - b).abs()))
    }
}

/// Build a lane whose upper coordinate bound is `top_y`
pub fn create_lane(top_y: f32, is_safe: bool, difficulty: &Difficulty, rng: &mut impl Rng) -> Lane {
    if is_safe {
        let height = rng.random_range(2..=4) as f32;
        return Lane::safe(top_y, height);
    }

    let lane_count = rng.random_range(1..=difficulty.max_lanes_per_road.max(1));
    let sub_lanes = (0..lane_count)
        .map(|i| {
            let direction = if rng.random::<f32>() > 0.5 {
                Direction::Right
            } else {
                Direction::Left
            };
            let speed = if difficulty.max_speed > difficulty.min_speed {
                rng.random_range(difficulty.min_speed..difficulty.max_speed)
            } else {
                difficulty.min_speed
            };
            SubLane {
                y: top_y - i as f32,
                height: 1.0,
                direction,
                speed,
            }
        })
        .collect();

    Lane {
        top_y,
        height: lane_count as f32,
        is_safe: false,
        sub_lanes,
        populated: false,
    }
}
