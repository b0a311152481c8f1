//! Simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only (one `Pcg32` per session)
//! - Vehicle motion per frame, player timing per wall-clock millisecond
//! - Stable iteration order (vehicles sorted by lane then x every tick)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod lane;
pub mod player;
pub mod state;
pub mod strip;
pub mod tick;
pub mod traffic;

pub use collision::{CollisionHit, check_collision, circle_rect_overlap, player_vehicle_collision};
pub use difficulty::Difficulty;
pub use lane::{Direction, Lane, SubLane, create_lane};
pub use player::{MoveDirection, MoveOutcome, Player, PlayerPhase};
pub use state::GameSession;
pub use strip::{LaneId, LaneStrip};
pub use tick::{TickEvents, TickInput, tick};
pub use traffic::{Traffic, Vehicle, ramp_speeds};
