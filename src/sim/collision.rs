//! Player-vehicle collision detection
//!
//! The player is a circle sitting on the grid; vehicles are axis-aligned
//! rectangles. Safe lanes are always immune, so the rectangle test only runs
//! while the player's committed position lies on a road.

use glam::Vec2;

use super::strip::LaneStrip;
use super::traffic::Vehicle;
use crate::consts::PLAYER_RADIUS;

/// A vehicle that struck the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionHit {
    pub vehicle_id: u32,
    /// Vehicle center at the moment of impact
    pub point: Vec2,
}

/// Axis-aligned rectangle vs circle, using the circle's bounding box
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect_center: Vec2, half_extents: Vec2) -> bool {
    let delta = (center - rect_center).abs();
    delta.x < half_extents.x + radius && delta.y < half_extents.y + radius
}

/// Check a single vehicle against the player
#[inline]
pub fn player_vehicle_collision(player: Vec2, vehicle: &Vehicle) -> bool {
    circle_rect_overlap(player, PLAYER_RADIUS, vehicle.center(), vehicle.half_extents())
}

/// First vehicle hitting the player, if the player is on a road
pub fn check_collision(player: Vec2, strip: &LaneStrip, vehicles: &[Vehicle]) -> Option<CollisionHit> {
    strip.road_at(player.y)?;

    vehicles
        .iter()
        .find(|v| player_vehicle_collision(player, v))
        .map(|v| CollisionHit {
            vehicle_id: v.id,
            point: v.center(),
        })
}
