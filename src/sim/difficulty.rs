//! Difficulty presets
//!
//! Every tuning parameter is a pure function of the level so a session can be
//! re-derived from `(seed, level)` alone.

use serde::{Deserialize, Serialize};

/// Lowest selectable level
pub const MIN_LEVEL: u8 = 1;
/// Highest selectable level
pub const MAX_LEVEL: u8 = 10;

/// Tuning derived from a difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Clamped level (1-10)
    pub level: u8,
    /// Slowest sub-lane speed (grid units per frame)
    pub min_speed: f32,
    /// Fastest sub-lane speed (grid units per frame)
    pub max_speed: f32,
    /// Density multiplier for population and edge spawning
    pub car_density: f32,
    /// Upper bound on sub-lanes per road
    pub max_lanes_per_road: u32,
}

impl Difficulty {
    pub fn for_level(level: u8) -> Self {
        let level = level.clamp(MIN_LEVEL, MAX_LEVEL);
        let d = level as f32;

        let max_lanes_per_road = if level >= 7 {
            5
        } else {
            (1 + level as u32 / 3).min(4)
        };

        Self {
            level,
            min_speed: 0.01 + 0.003 * d,
            max_speed: 0.04 + 0.01 * d,
            car_density: 0.3 + 0.05 * d,
            max_lanes_per_road,
        }
    }

    /// Cap on vehicles placed per sub-lane when a road is first populated
    pub fn max_cars_per_lane(&self) -> usize {
        (8.0 * self.car_density).floor() as usize
    }

    /// Per-tick chance of a new vehicle entering a visible sub-lane
    pub fn spawn_chance(&self) -> f32 {
        0.02 * self.car_density
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::for_level(crate::consts::DEFAULT_DIFFICULTY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_default_level_parameters() {
        let d = Difficulty::for_level(5);
        assert!(approx(d.min_speed, 0.025));
        assert!(approx(d.max_speed, 0.09));
        assert!(approx(d.car_density, 0.55));
        assert_eq!(d.max_lanes_per_road, 2);
        assert_eq!(d.max_cars_per_lane(), 4);
    }

    #[test]
    fn test_lane_cap_by_level() {
        let lanes: Vec<u32> = (1..=10)
            .map(|l| Difficulty::for_level(l).max_lanes_per_road)
            .collect();
        assert_eq!(lanes, vec![1, 1, 2, 2, 2, 3, 5, 5, 5, 5]);
    }

    #[test]
    fn test_level_is_clamped() {
        assert_eq!(Difficulty::for_level(0).level, 1);
        assert_eq!(Difficulty::for_level(42).level, 10);
        assert_eq!(Difficulty::for_level(42).max_lanes_per_road, 5);
    }
}
