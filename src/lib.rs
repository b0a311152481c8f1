//! Lane Hopper - An endless lane-crossing arcade game
//!
//! Core modules:
//! - `sim`: Simulation (world strip, traffic, player, collisions, session)
//! - `frame`: Per-frame render extract handed to a renderer
//! - `platform`: Input, renderer and clock seams
//! - `game_loop`: Fixed-rate cooperative loop
//! - `settings`: JSON configuration

pub mod frame;
pub mod game_loop;
pub mod platform;
pub mod settings;
pub mod sim;

pub use frame::FrameView;
pub use game_loop::{LoopSummary, run};
pub use settings::Settings;
pub use sim::{GameSession, TickInput};

/// Game configuration constants
pub mod consts {
    /// Pixels per grid unit
    pub const CELL_SIZE: f32 = 40.0;
    /// Grid width in units
    pub const GRID_WIDTH: i32 = 30;
    /// Visible grid height in units
    pub const VISIBLE_HEIGHT: f32 = 20.0;
    /// Target frame rate; vehicle speeds are expressed per frame at this rate
    pub const TARGET_FPS: u32 = 60;

    /// Camera sits this far above the player (player in the bottom third)
    pub const CAMERA_FOLLOW_OFFSET: f32 = VISIBLE_HEIGHT * (2.0 / 3.0);

    /// Player spawn row
    pub const SPAWN_Y: f32 = 5.0;
    /// Milliseconds between accepted grid moves
    pub const MOVE_COOLDOWN_MS: u64 = 200;
    /// Hop arc duration
    pub const HOP_DURATION_MS: u64 = 200;
    /// Peak hop height in grid units
    pub const HOP_AMPLITUDE: f32 = 0.3;
    /// Player collision radius in grid units
    pub const PLAYER_RADIUS: f32 = 0.4;

    /// Generate more lanes when the frontier is closer than this to the camera top
    pub const LOOKAHEAD_MARGIN: f32 = 50.0;
    /// (road, safe) pairs generated per extension batch
    pub const EXTENSION_BATCH_PAIRS: usize = 10;

    /// Vehicle width as a fraction of lane height
    pub const VEHICLE_WIDTH_FACTOR: f32 = 0.8;
    /// Gap left behind a leader after an overlap correction
    pub const VEHICLE_FOLLOW_GAP: f32 = 0.05;
    /// Vehicles spawned at the edges start this far outside the grid
    pub const EDGE_SPAWN_OFFSET: f32 = 3.0;

    /// Points per grid unit of upward progress
    pub const POINTS_PER_ROW: f32 = 10.0;
    /// Score interval between speed ramps
    pub const SPEED_RAMP_INTERVAL: u64 = 100;
    /// Sub-lane speed multiplier applied at each ramp
    pub const SPEED_RAMP_FACTOR: f32 = 1.03;

    /// Default difficulty level (1-10)
    pub const DEFAULT_DIFFICULTY: u8 = 5;
}
