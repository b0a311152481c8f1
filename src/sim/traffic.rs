//! Traffic simulation
//!
//! Vehicles move a fixed signed distance every frame along their sub-lane.
//! Same-lane vehicles never pass each other: a faster vehicle that runs into
//! a slower one is snapped back behind it, which builds queues behind slow
//! traffic.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::lane::{Direction, Lane, SubLane};
use super::strip::LaneStrip;
use crate::consts::*;

/// Vehicles within this Y distance share a lane
pub const SAME_LANE_TOLERANCE: f32 = 0.1;
/// Vehicles further below the camera top than `VISIBLE_HEIGHT + CULL_BELOW` are removed
pub const CULL_BELOW: f32 = 5.0;
/// Vehicles further above the camera top than this are removed
pub const CULL_ABOVE: f32 = 20.0;
/// Horizontal slack past the grid before a vehicle is removed
pub const CULL_SIDE: f32 = 5.0;
/// Sub-lanes within this distance of the spawn row start empty, and no
/// vehicle enters a sub-lane this close to the player
pub const SPAWN_CLEAR_BAND: f32 = 2.0;

/// A moving vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: u32,
    /// Center X
    pub x: f32,
    /// Midline of the sub-lane the vehicle drives in
    pub lane_y: f32,
    pub lane_height: f32,
    /// Signed speed in grid units per frame
    pub speed: f32,
    pub length: f32,
    pub width: f32,
    pub color: [u8; 3],
}

impl Vehicle {
    pub fn new(x: f32, lane_y: f32, lane_height: f32, speed: f32, length: f32) -> Self {
        Self {
            id: 0,
            x,
            lane_y,
            lane_height,
            speed,
            length,
            width: lane_height * VEHICLE_WIDTH_FACTOR,
            color: [200, 0, 0],
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x - self.length / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.length / 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.lane_y)
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.length / 2.0, self.width / 2.0)
    }

    /// Whether the vehicle has left the simulated window around the camera
    pub fn is_out_of_window(&self, camera_y: f32) -> bool {
        let rel_y = self.lane_y - camera_y;
        rel_y > VISIBLE_HEIGHT + CULL_BELOW
            || rel_y < -CULL_ABOVE
            || (self.speed > 0.0 && self.x - self.length > GRID_WIDTH as f32 + CULL_SIDE)
            || (self.speed < 0.0 && self.x + self.length < -CULL_SIDE)
    }
}

/// Owner of every live vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Traffic {
    vehicles: Vec<Vehicle>,
    next_id: u32,
}

impl Default for Traffic {
    fn default() -> Self {
        Self::new()
    }
}

impl Traffic {
    pub fn new() -> Self {
        Self {
            vehicles: Vec::new(),
            next_id: 1,
        }
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Add a vehicle, assigning it a fresh handle
    pub fn insert(&mut self, mut vehicle: Vehicle) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        vehicle.id = id;
        self.vehicles.push(vehicle);
        id
    }

    /// Create a randomly sized and tinted vehicle on `sub_lane` at `x`
    fn spawn(&mut self, x: f32, sub_lane: &SubLane, rng: &mut impl Rng) -> u32 {
        let length = rng.random_range(1.0..2.0);
        let mut vehicle = Vehicle::new(x, sub_lane.midline(), sub_lane.height, sub_lane.velocity(), length);
        vehicle.color = [
            rng.random_range(150..=250),
            rng.random_range(0..=200),
            rng.random_range(0..=200),
        ];
        self.insert(vehicle)
    }

    /// Seed a freshly generated road with traffic. Returns vehicles placed.
    pub fn populate_lane(
        &mut self,
        lane: &mut Lane,
        difficulty: &Difficulty,
        spawn_y: f32,
        rng: &mut impl Rng,
    ) -> usize {
        let density = difficulty.car_density;
        let max_cars = difficulty.max_cars_per_lane();
        let width = GRID_WIDTH as f32;
        let mut total = 0;

        for sub_lane in &lane.sub_lanes {
            // Keep the starting area clear
            if sub_lane.y > spawn_y - SPAWN_CLEAR_BAND && sub_lane.y < spawn_y + SPAWN_CLEAR_BAND {
                continue;
            }

            let step = sub_lane.direction.sign();
            let mut x = match sub_lane.direction {
                Direction::Right => 0.0,
                Direction::Left => width,
            };
            let mut placed = 0;
            while (0.0..=width).contains(&x) && placed < max_cars {
                if rng.random::<f32>() < 0.7 * density {
                    self.spawn(x, sub_lane, rng);
                    placed += 1;
                }
                x += step * rng.random_range(3.0..6.0) / density;
            }
            total += placed;
        }

        lane.populated = true;
        total
    }

    /// Populate every road lane that has not received initial traffic yet
    pub fn populate_pending(
        &mut self,
        strip: &mut LaneStrip,
        difficulty: &Difficulty,
        spawn_y: f32,
        rng: &mut impl Rng,
    ) -> usize {
        let mut placed = 0;
        for id in strip.take_pending() {
            if let Some(lane) = strip.get_mut(id) {
                if !lane.populated {
                    placed += self.populate_lane(lane, difficulty, spawn_y, rng);
                }
            }
        }
        if placed > 0 {
            log::debug!("Populated new roads with {} vehicles", placed);
        }
        placed
    }

    /// Advance one frame: move, cull, then settle same-lane overlaps
    pub fn step(&mut self, camera_y: f32) {
        for vehicle in &mut self.vehicles {
            vehicle.x += vehicle.speed;
        }
        self.vehicles.retain(|v| !v.is_out_of_window(camera_y));
        self.vehicles
            .sort_by(|a, b| a.lane_y.total_cmp(&b.lane_y).then(a.x.total_cmp(&b.x)));
        self.resolve_overlaps();
    }

    /// Snap trailing vehicles behind their leaders, lane by lane.
    /// Expects vehicles sorted by `(lane_y, x)`.
    pub fn resolve_overlaps(&mut self) {
        let mut start = 0;
        while start < self.vehicles.len() {
            let lane_y = self.vehicles[start].lane_y;
            let mut end = start + 1;
            while end < self.vehicles.len()
                && (self.vehicles[end].lane_y - lane_y).abs() <= SAME_LANE_TOLERANCE
            {
                end += 1;
            }
            settle_lane(&mut self.vehicles[start..end]);
            start = end;
        }
    }

    /// Randomly feed new vehicles into sub-lanes near the camera, keeping
    /// the sub-lanes around the player clear
    pub fn spawn_at_edges(
        &mut self,
        strip: &LaneStrip,
        camera_y: f32,
        player_y: f32,
        difficulty: &Difficulty,
        rng: &mut impl Rng,
    ) -> usize {
        let chance = difficulty.spawn_chance();
        let width = GRID_WIDTH as f32;
        let window_bottom = VISIBLE_HEIGHT + CULL_BELOW;
        let range = strip.range_overlapping(camera_y - CULL_ABOVE, camera_y + window_bottom + 1.0);
        let mut spawned = 0;

        for lane in &strip.lanes()[range] {
            for sub_lane in &lane.sub_lanes {
                if sub_lane.y - camera_y < -CULL_ABOVE
                    || sub_lane.y - sub_lane.height - camera_y > window_bottom
                {
                    continue;
                }
                if sub_lane.y > player_y - SPAWN_CLEAR_BAND && sub_lane.y < player_y + SPAWN_CLEAR_BAND {
                    continue;
                }
                if rng.random::<f32>() >= chance {
                    continue;
                }

                let (spawn_x, clear_min, clear_max) = match sub_lane.direction {
                    Direction::Right => (-EDGE_SPAWN_OFFSET, -EDGE_SPAWN_OFFSET, EDGE_SPAWN_OFFSET),
                    Direction::Left => (
                        width + EDGE_SPAWN_OFFSET,
                        width - EDGE_SPAWN_OFFSET,
                        width + EDGE_SPAWN_OFFSET,
                    ),
                };
                let midline = sub_lane.midline();
                let blocked = self.vehicles.iter().any(|v| {
                    (v.lane_y - midline).abs() < SAME_LANE_TOLERANCE && (clear_min..=clear_max).contains(&v.x)
                });
                if !blocked {
                    self.spawn(spawn_x, sub_lane, rng);
                    spawned += 1;
                }
            }
        }
        spawned
    }
}

/// Settle one lane's vehicles (sorted by x). Each direction is walked from
/// its front vehicle backward; a vehicle whose front edge reaches into the
/// queue ahead is placed flush behind it.
fn settle_lane(lane: &mut [Vehicle]) {
    // Rightward: leaders have the largest x
    let mut rear = f32::INFINITY;
    for vehicle in lane.iter_mut().rev().filter(|v| v.speed > 0.0) {
        if vehicle.right() > rear {
            vehicle.x = rear - vehicle.length / 2.0 - VEHICLE_FOLLOW_GAP;
        }
        rear = rear.min(vehicle.left());
    }

    // Leftward: leaders have the smallest x
    let mut rear = f32::NEG_INFINITY;
    for vehicle in lane.iter_mut().filter(|v| v.speed < 0.0) {
        if vehicle.left() < rear {
            vehicle.x = rear + vehicle.length / 2.0 + VEHICLE_FOLLOW_GAP;
        }
        rear = rear.max(vehicle.right());
    }
}

/// Multiply every sub-lane's speed. Vehicles already on the road keep theirs.
pub fn ramp_speeds(strip: &mut LaneStrip, factor: f32) {
    for lane in strip.lanes_mut() {
        for sub_lane in &mut lane.sub_lanes {
            sub_lane.speed *= factor;
        }
    }
}
