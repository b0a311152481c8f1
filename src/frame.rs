//! Render extract
//!
//! Converts a session into screen-space data for one frame. Rectangles are
//! plain-old-data so a GPU backend can upload them as instance buffers
//! without another copy.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::consts::*;
use crate::sim::GameSession;

/// Screen size in pixels
pub const SCREEN_WIDTH: f32 = GRID_WIDTH as f32 * CELL_SIZE;
pub const SCREEN_HEIGHT: f32 = VISIBLE_HEIGHT * CELL_SIZE;

/// Axis-aligned rectangle in pixels (top-left origin)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RectInstance {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
}

impl RectInstance {
    pub const fn new(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            size: [w, h],
            color,
        }
    }

    /// Rectangle centered on `center`
    pub fn centered(center: Vec2, size: Vec2, color: [f32; 4]) -> Self {
        let top_left = center - size / 2.0;
        Self::new(top_left.x, top_left.y, size.x, size.y, color)
    }
}

/// Filled circle in pixels
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub color: [f32; 4],
}

impl CircleInstance {
    pub fn new(center: Vec2, radius: f32, color: [f32; 4]) -> Self {
        Self {
            center: center.to_array(),
            radius,
            color,
        }
    }
}

/// Thickness of the white line between sub-lanes
pub const DIVIDER_THICKNESS: f32 = 2.0;
/// Thickness of the dashed yellow center line
pub const CENTER_LINE_THICKNESS: f32 = 3.0;
/// Dash length and dash period along the center line
pub const DASH_LENGTH: f32 = 20.0;
pub const DASH_PERIOD: f32 = 40.0;
/// Shadow radius relative to the player
pub const SHADOW_SCALE: f32 = 0.8;

/// Colors for game elements
pub mod colors {
    pub const GRASS: [f32; 4] = [0.0, 0.78, 0.0, 1.0];
    pub const ROAD: [f32; 4] = [0.39, 0.39, 0.39, 1.0];
    pub const DIVIDER: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const CENTER_LINE: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const PLAYER: [f32; 4] = [0.0, 0.0, 0.78, 1.0];
    pub const SHADOW: [f32; 4] = [0.0, 0.0, 0.0, 0.5];
}

/// A visible lane
#[derive(Debug, Clone, PartialEq)]
pub struct LaneView {
    pub rect: RectInstance,
    pub is_safe: bool,
    pub sub_lane_count: usize,
}

/// A visible vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleView {
    pub id: u32,
    pub rect: RectInstance,
}

/// Player sprite placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    /// Circle center including the hop lift
    pub center: Vec2,
    /// Shadow stays on the ground
    pub shadow: Vec2,
    pub radius: f32,
    /// Hop lift in grid units
    pub hop_offset: f32,
}

impl PlayerView {
    /// Shadow then body, in draw order
    pub fn circles(&self) -> [CircleInstance; 2] {
        [
            CircleInstance::new(self.shadow, self.radius * SHADOW_SCALE, colors::SHADOW),
            CircleInstance::new(self.center, self.radius, colors::PLAYER),
        ]
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub lanes: Vec<LaneView>,
    /// White lines between sub-lanes of multi-lane roads
    pub dividers: Vec<RectInstance>,
    /// Dashed yellow line along every sub-lane midline
    pub center_lines: Vec<RectInstance>,
    pub vehicles: Vec<VehicleView>,
    pub player: PlayerView,
    pub score: u64,
    pub difficulty: u8,
    /// 0.0 right after a move, 1.0 when the next move is allowed
    pub cooldown_progress: f32,
    pub game_over: bool,
    pub message: Option<String>,
}

impl FrameView {
    pub fn extract(session: &GameSession, now_ms: u64, message: Option<String>) -> Self {
        let camera_y = session.camera_y();
        let to_screen_y = |y: f32| (y - camera_y) * CELL_SIZE;

        let range = session.strip.range_overlapping(camera_y, camera_y + VISIBLE_HEIGHT);
        let visible = &session.strip.lanes()[range];

        let mut dividers = Vec::new();
        let mut center_lines = Vec::new();
        for lane in visible.iter().filter(|l| l.is_road()) {
            for sub_lane in lane.sub_lanes.iter().skip(1) {
                let y = to_screen_y(sub_lane.y);
                dividers.push(RectInstance::new(
                    0.0,
                    y - DIVIDER_THICKNESS / 2.0,
                    SCREEN_WIDTH,
                    DIVIDER_THICKNESS,
                    colors::DIVIDER,
                ));
            }
            for sub_lane in &lane.sub_lanes {
                let y = to_screen_y(sub_lane.midline()) - CENTER_LINE_THICKNESS / 2.0;
                let mut x = 0.0;
                while x < SCREEN_WIDTH {
                    center_lines.push(RectInstance::new(
                        x,
                        y,
                        DASH_LENGTH,
                        CENTER_LINE_THICKNESS,
                        colors::CENTER_LINE,
                    ));
                    x += DASH_PERIOD;
                }
            }
        }

        let lanes = visible
            .iter()
            .map(|lane| {
                let color = if lane.is_safe { colors::GRASS } else { colors::ROAD };
                LaneView {
                    rect: RectInstance::new(
                        0.0,
                        to_screen_y(lane.bottom_y()),
                        SCREEN_WIDTH,
                        lane.height * CELL_SIZE,
                        color,
                    ),
                    is_safe: lane.is_safe,
                    sub_lane_count: lane.sub_lanes.len(),
                }
            })
            .collect();

        let vehicles = session
            .traffic
            .vehicles()
            .iter()
            .filter_map(|v| {
                let center = Vec2::new(v.x * CELL_SIZE, to_screen_y(v.lane_y));
                let size = Vec2::new(v.length, v.width) * CELL_SIZE;
                if center.y + size.y < 0.0 || center.y - size.y > SCREEN_HEIGHT {
                    return None;
                }
                let [r, g, b] = v.color;
                let color = [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0];
                Some(VehicleView {
                    id: v.id,
                    rect: RectInstance::centered(center, size, color),
                })
            })
            .collect();

        let hop_offset = session.player.hop_offset(now_ms);
        let ground = Vec2::new(
            session.player.grid_x as f32 * CELL_SIZE,
            to_screen_y(session.player.grid_y),
        );
        let player = PlayerView {
            center: ground - Vec2::new(0.0, hop_offset * CELL_SIZE),
            shadow: ground,
            radius: PLAYER_RADIUS * CELL_SIZE,
            hop_offset,
        };

        Self {
            lanes,
            dividers,
            center_lines,
            vehicles,
            player,
            score: session.score,
            difficulty: session.difficulty.level,
            cooldown_progress: session.player.cooldown_progress(now_ms),
            game_over: session.is_game_over(),
            message,
        }
    }

    /// Lane backgrounds, markings, then vehicles, in draw order
    pub fn rect_instances(&self) -> Vec<RectInstance> {
        self.lanes
            .iter()
            .map(|l| l.rect)
            .chain(self.dividers.iter().copied())
            .chain(self.center_lines.iter().copied())
            .chain(self.vehicles.iter().map(|v| v.rect))
            .collect()
    }

    /// Drawn after the rectangles
    pub fn circle_instances(&self) -> [CircleInstance; 2] {
        self.player.circles()
    }

    /// HUD line shown in the corner
    pub fn hud_text(&self) -> String {
        format!("Score: {}   Difficulty: {}/10", self.score, self.difficulty)
    }
}

/// Raw bytes for an instance buffer upload
pub fn instance_bytes<T: Pod>(instances: &[T]) -> &[u8] {
    bytemuck::cast_slice(instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{MoveDirection, TickInput, tick};

    #[test]
    fn test_extract_visible_lanes_cover_screen() {
        let session = GameSession::new(5, 5, 0);
        let frame = FrameView::extract(&session, 0, None);
        assert!(!frame.lanes.is_empty());

        let top = frame.lanes.iter().map(|l| l.rect.position[1]).fold(f32::INFINITY, f32::min);
        let bottom = frame
            .lanes
            .iter()
            .map(|l| l.rect.position[1] + l.rect.size[1])
            .fold(f32::NEG_INFINITY, f32::max);
        assert!(top <= 0.0);
        assert!(bottom >= SCREEN_HEIGHT);
    }

    #[test]
    fn test_player_in_bottom_third() {
        let session = GameSession::new(5, 5, 0);
        let frame = FrameView::extract(&session, 0, Some("hello".into()));
        assert!((frame.player.center.y - CAMERA_FOLLOW_OFFSET * CELL_SIZE).abs() < 1e-3);
        assert_eq!(frame.player.center, frame.player.shadow);
        assert_eq!(frame.message.as_deref(), Some("hello"));
        assert_eq!(frame.hud_text(), "Score: 0   Difficulty: 5/10");
    }

    #[test]
    fn test_hop_lifts_player_above_shadow() {
        let mut session = GameSession::new(5, 5, 0);
        let input = TickInput {
            movement: Some(MoveDirection::Left),
            ..Default::default()
        };
        tick(&mut session, &input, 200);
        let frame = FrameView::extract(&session, 300, None);
        assert!(frame.player.hop_offset > 0.0);
        assert!(frame.player.center.y < frame.player.shadow.y);
        assert!((frame.cooldown_progress - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_vehicle_rects_match_vehicles() {
        let session = GameSession::new(5, 9, 0);
        let frame = FrameView::extract(&session, 0, None);
        for view in &frame.vehicles {
            let v = session.traffic.vehicles().iter().find(|v| v.id == view.id).unwrap();
            assert!((view.rect.size[0] - v.length * CELL_SIZE).abs() < 1e-3);
            assert!((view.rect.size[1] - v.width * CELL_SIZE).abs() < 1e-3);
        }
        let instances = frame.rect_instances();
        assert_eq!(
            instances.len(),
            frame.lanes.len() + frame.dividers.len() + frame.center_lines.len() + frame.vehicles.len()
        );
        assert_eq!(
            instance_bytes(&instances).len(),
            instances.len() * std::mem::size_of::<RectInstance>()
        );
    }

    #[test]
    fn test_road_markings_follow_sub_lanes() {
        let session = GameSession::new(3, 10, 0);
        let frame = FrameView::extract(&session, 0, None);
        let camera_y = session.camera_y();
        let dashes_per_line = (SCREEN_WIDTH / DASH_PERIOD).ceil() as usize;

        let roads: Vec<usize> = frame
            .lanes
            .iter()
            .filter(|l| !l.is_safe)
            .map(|l| l.sub_lane_count)
            .collect();
        assert!(!roads.is_empty());
        let expected_dividers: usize = roads.iter().map(|n| n - 1).sum();
        let expected_dashes: usize = roads.iter().map(|n| n * dashes_per_line).sum();
        assert_eq!(frame.dividers.len(), expected_dividers);
        assert_eq!(frame.center_lines.len(), expected_dashes);

        let visible = session.strip.range_overlapping(camera_y, camera_y + VISIBLE_HEIGHT);
        let subs: Vec<_> = session.strip.lanes()[visible]
            .iter()
            .flat_map(|l| l.sub_lanes.iter())
            .collect();
        for divider in &frame.dividers {
            let y = divider.position[1] + DIVIDER_THICKNESS / 2.0;
            assert!(subs.iter().any(|s| ((s.y - camera_y) * CELL_SIZE - y).abs() < 1e-3));
            assert_eq!(divider.color, colors::DIVIDER);
            assert_eq!(divider.size[0], SCREEN_WIDTH);
        }
        for dash in &frame.center_lines {
            let y = dash.position[1] + CENTER_LINE_THICKNESS / 2.0;
            assert!(subs.iter().any(|s| ((s.midline() - camera_y) * CELL_SIZE - y).abs() < 1e-3));
            assert_eq!(dash.color, colors::CENTER_LINE);
            assert_eq!(dash.position[0] % DASH_PERIOD, 0.0);
        }
    }

    #[test]
    fn test_player_and_shadow_circles() {
        let mut session = GameSession::new(5, 5, 0);
        let input = TickInput {
            movement: Some(MoveDirection::Up),
            ..Default::default()
        };
        tick(&mut session, &input, 200);
        let frame = FrameView::extract(&session, 300, None);

        let [shadow, body] = frame.circle_instances();
        assert_eq!(shadow.color, colors::SHADOW);
        assert_eq!(body.color, colors::PLAYER);
        assert!((body.radius - PLAYER_RADIUS * CELL_SIZE).abs() < 1e-4);
        assert!((shadow.radius - body.radius * SHADOW_SCALE).abs() < 1e-4);
        assert_eq!(shadow.center, frame.player.shadow.to_array());
        assert!((shadow.center[1] - body.center[1] - HOP_AMPLITUDE * CELL_SIZE).abs() < 1e-3);
        assert_eq!(instance_bytes(&frame.circle_instances()).len(), 2 * std::mem::size_of::<CircleInstance>());
    }
}
