//! The world strip
//!
//! Lanes live in an arena indexed by generation order. Generation only ever
//! grows the strip upward (decreasing Y), so the arena is sorted by `top_y`
//! descending and every Y lookup is a binary search.

use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::lane::{Lane, create_lane};
use crate::consts::{EXTENSION_BATCH_PAIRS, LOOKAHEAD_MARGIN};

/// Index of a lane in the strip arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LaneId(pub u32);

impl LaneId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Contiguous, append-only stack of lanes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaneStrip {
    lanes: Vec<Lane>,
    /// Road lanes waiting for their initial traffic
    pending: Vec<LaneId>,
}

impl LaneStrip {
    /// Start a strip with a single safe zone spanning `[bottom_y, top_y]`
    pub fn with_spawn_zone(bottom_y: f32, top_y: f32) -> Self {
        let mut strip = Self::default();
        strip.push(Lane::safe(top_y, top_y - bottom_y));
        strip
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn get(&self, id: LaneId) -> Option<&Lane> {
        self.lanes.get(id.index())
    }

    pub fn get_mut(&mut self, id: LaneId) -> Option<&mut Lane> {
        self.lanes.get_mut(id.index())
    }

    pub fn lanes_mut(&mut self) -> impl Iterator<Item = &mut Lane> {
        self.lanes.iter_mut()
    }

    /// Smallest Y reached by generation (the upper edge of the newest lane)
    pub fn frontier_y(&self) -> f32 {
        self.lanes.last().map(Lane::bottom_y).unwrap_or(0.0)
    }

    /// Append a lane on top of the current frontier
    pub fn push(&mut self, lane: Lane) -> LaneId {
        debug_assert!(
            self.lanes.is_empty() || (lane.top_y - self.frontier_y()).abs() < 1e-4,
            "lane at {} does not touch frontier {}",
            lane.top_y,
            self.frontier_y()
        );
        let id = LaneId(self.lanes.len() as u32);
        if lane.is_road() && !lane.populated {
            self.pending.push(id);
        }
        self.lanes.push(lane);
        id
    }

    /// Take the road lanes still waiting for initial traffic
    pub fn take_pending(&mut self) -> Vec<LaneId> {
        std::mem::take(&mut self.pending)
    }

    /// Lanes whose inclusive span contains `y` (two when `y` is a shared edge)
    fn candidates(&self, y: f32) -> impl Iterator<Item = usize> + '_ {
        let first = self.lanes.partition_point(|l| l.bottom_y() > y);
        (first..(first + 2).min(self.lanes.len())).filter(move |&i| self.lanes[i].contains(y))
    }

    /// Road lane containing `y`, if any
    pub fn road_at(&self, y: f32) -> Option<LaneId> {
        self.candidates(y)
            .find(|&i| self.lanes[i].is_road())
            .map(|i| LaneId(i as u32))
    }

    /// Whether `y` lies inside any safe lane
    pub fn is_safe_at(&self, y: f32) -> bool {
        self.candidates(y).any(|i| self.lanes[i].is_safe)
    }

    /// Arena indices of lanes overlapping `[y_min, y_max]`
    pub fn range_overlapping(&self, y_min: f32, y_max: f32) -> Range<usize> {
        let start = self.lanes.partition_point(|l| l.bottom_y() > y_max);
        let end = self.lanes.partition_point(|l| l.top_y >= y_min);
        start..end.max(start)
    }

    /// Grow the strip until the frontier is `LOOKAHEAD_MARGIN` above the
    /// camera. Returns the number of lanes added.
    pub fn extend(&mut self, camera_y: f32, difficulty: &Difficulty, rng: &mut impl Rng) -> usize {
        let before = self.lanes.len();
        while self.frontier_y() > camera_y - LOOKAHEAD_MARGIN {
            for _ in 0..EXTENSION_BATCH_PAIRS {
                let road = create_lane(self.frontier_y(), false, difficulty, rng);
                self.push(road);
                let safe = create_lane(self.frontier_y(), true, difficulty, rng);
                self.push(safe);
            }
        }
        let added = self.lanes.len() - before;
        if added > 0 {
            log::debug!(
                "Extended strip by {} lanes (frontier {:.1}, camera {:.1})",
                added,
                self.frontier_y(),
                camera_y
            );
        }
        added
    }
}
