//! Session state
//!
//! A `GameSession` owns everything a run needs: the world strip, traffic,
//! the player and the RNG. Nothing else keeps a copy.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::difficulty::Difficulty;
use super::player::{Player, PlayerPhase};
use super::strip::LaneStrip;
use super::traffic::{Traffic, ramp_speeds};
use crate::consts::*;

/// Depth of the spawn zone below the bottom of the first view
const SPAWN_ZONE_MARGIN: f32 = 15.0;

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub difficulty: Difficulty,
    pub strip: LaneStrip,
    pub traffic: Traffic,
    pub player: Player,
    /// Row the player spawned on; traffic population keeps clear of it
    pub spawn_y: f32,
    pub score: u64,
    /// Last `score / SPEED_RAMP_INTERVAL` that triggered a speed ramp
    pub last_milestone: u64,
    /// Simulation ticks since the session started
    pub time_ticks: u64,
}

impl GameSession {
    /// Build a fresh world around a player standing in the spawn zone
    pub fn new(seed: u64, level: u8, now_ms: u64) -> Self {
        let difficulty = Difficulty::for_level(level);
        let player = Player::spawn(GRID_WIDTH / 2, SPAWN_Y, now_ms);

        // Grass from two rows above the spawn row down past the first view
        let zone_bottom = SPAWN_Y.floor() - 2.0;
        let zone_top = (player.camera_y() + VISIBLE_HEIGHT).ceil() + SPAWN_ZONE_MARGIN;

        let mut session = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            difficulty,
            strip: LaneStrip::with_spawn_zone(zone_bottom, zone_top),
            traffic: Traffic::new(),
            player,
            spawn_y: SPAWN_Y,
            score: 0,
            last_milestone: 0,
            time_ticks: 0,
        };

        session.extend_world();
        session.ensure_safe_spawn();

        log::info!(
            "Session started (seed {}, difficulty {}, {} lanes, {} vehicles)",
            seed,
            session.difficulty.level,
            session.strip.len(),
            session.traffic.len()
        );
        session
    }

    /// Discard this run and start over at the same difficulty
    pub fn restart(&mut self, now_ms: u64) {
        let seed = self.rng.random::<u64>();
        log::info!("Restarting (final score {})", self.score);
        *self = Self::new(seed, self.difficulty.level, now_ms);
    }

    /// Change difficulty; applies to lanes and vehicles generated from now on
    pub fn set_difficulty(&mut self, level: u8) -> Difficulty {
        self.difficulty = Difficulty::for_level(level);
        let d = &self.difficulty;
        log::info!(
            "Difficulty set to {} (speed {:.3}-{:.3}, density {:.2}, max lanes {})",
            d.level,
            d.min_speed,
            d.max_speed,
            d.car_density,
            d.max_lanes_per_road
        );
        self.difficulty
    }

    #[inline]
    pub fn camera_y(&self) -> f32 {
        self.player.camera_y()
    }

    pub fn is_game_over(&self) -> bool {
        self.player.phase == PlayerPhase::GameOver
    }

    /// Generate lanes ahead of the camera and seed any unpopulated roads.
    /// Safe to call repeatedly.
    pub fn extend_world(&mut self) {
        let camera_y = self.player.camera_y();
        self.strip.extend(camera_y, &self.difficulty, &mut self.rng);
        self.traffic
            .populate_pending(&mut self.strip, &self.difficulty, self.spawn_y, &mut self.rng);
    }

    /// Apply a speed ramp for each new score milestone
    pub(crate) fn apply_score_milestones(&mut self) -> bool {
        let milestone = self.score / SPEED_RAMP_INTERVAL;
        if milestone > self.last_milestone {
            self.last_milestone = milestone;
            ramp_speeds(&mut self.strip, SPEED_RAMP_FACTOR);
            log::debug!("Score {} reached, sub-lane speeds ramped", self.score);
            return true;
        }
        false
    }

    /// Feed new vehicles in at the grid edges near the camera
    pub(crate) fn spawn_edge_traffic(&mut self) -> usize {
        let camera_y = self.player.camera_y();
        let player_y = self.player.grid_y;
        self.traffic
            .spawn_at_edges(&self.strip, camera_y, player_y, &self.difficulty, &mut self.rng)
    }

    /// Move the player onto the closest safe midline if spawn landed on a road
    fn ensure_safe_spawn(&mut self) {
        let y = self.player.grid_y;
        if self.strip.is_safe_at(y) && self.strip.road_at(y).is_none() {
            return;
        }

        let nearest = self
            .strip
            .lanes()
            .iter()
            .filter(|l| l.is_safe)
            .map(|l| l.top_y - l.height / 2.0)
            .min_by(|a, b| (y - a).abs().total_cmp(&(y - b).abs()));

        if let Some(safe_y) = nearest {
            log::warn!("Spawn row {} is not safe, moving player to {}", y, safe_y);
            self.player.grid_y = safe_y;
            self.player.target_y = safe_y;
        }
    }
}
