//! Per-frame simulation tick
//!
//! Advances a session by one rendered frame. Vehicle speeds are per frame,
//! while move cooldown and hop timing are gated on the wall clock passed in
//! as `now_ms`.

use super::collision::{CollisionHit, check_collision};
use super::player::{MoveDirection, MoveOutcome};
use super::state::GameSession;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Discrete grid step (already resolved to a single direction)
    pub movement: Option<MoveDirection>,
    /// Leave the game
    pub quit: bool,
    /// Start over; only honored after game over
    pub restart: bool,
    /// Select difficulty level 1-10
    pub difficulty: Option<u8>,
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickEvents {
    pub quit: bool,
    pub restarted: bool,
    pub moved: Option<MoveOutcome>,
    /// Set on the tick the player was hit
    pub collision: Option<CollisionHit>,
    pub vehicles_spawned: usize,
    pub speed_ramped: bool,
}

/// Advance the session by one frame
pub fn tick(session: &mut GameSession, input: &TickInput, now_ms: u64) -> TickEvents {
    let mut events = TickEvents::default();

    if input.quit {
        events.quit = true;
        return events;
    }

    if input.restart && session.is_game_over() {
        session.restart(now_ms);
        events.restarted = true;
        return events;
    }

    if let Some(level) = input.difficulty {
        session.set_difficulty(level);
    }

    // Nothing moves once the run is over
    if session.is_game_over() {
        return events;
    }

    session.player.update_hop(now_ms);

    if let Some(direction) = input.movement {
        if let Some(outcome) = session.player.try_move(direction, now_ms, &session.strip) {
            session.score += outcome.points;
            session.extend_world();
            events.moved = Some(outcome);
        }
    }

    session.time_ticks += 1;
    session.traffic.step(session.camera_y());

    if let Some(hit) = check_collision(session.player.position(), &session.strip, session.traffic.vehicles()) {
        session.player.kill();
        log::info!(
            "Game over: hit by vehicle {} at ({:.2}, {:.2}), final score {}",
            hit.vehicle_id,
            hit.point.x,
            hit.point.y,
            session.score
        );
        events.collision = Some(hit);
        return events;
    }

    events.vehicles_spawned = session.spawn_edge_traffic();
    events.speed_ramped = session.apply_score_milestones();
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::player::PlayerPhase;
    use crate::sim::traffic::{Traffic, Vehicle};
    use proptest::prelude::*;

    fn up() -> TickInput {
        TickInput {
            movement: Some(MoveDirection::Up),
            ..Default::default()
        }
    }

    /// Put the player on the first road midline and park a vehicle on top of it
    fn force_collision(session: &mut GameSession) {
        let midline = session
            .strip
            .lanes()
            .iter()
            .find(|l| l.is_road())
            .and_then(|l| l.sub_lanes.first())
            .map(|s| s.midline())
            .unwrap();
        session.player.grid_y = midline;
        let x = session.player.grid_x as f32;
        session.traffic = Traffic::new();
        session.traffic.insert(Vehicle::new(x, midline, 1.0, 0.01, 1.5));
    }

    #[test]
    fn test_default_difficulty_parameters() {
        let session = GameSession::new(1, DEFAULT_DIFFICULTY, 0);
        let d = session.difficulty;
        assert!((d.min_speed - 0.025).abs() < 1e-5);
        assert!((d.max_speed - 0.09).abs() < 1e-5);
        assert!((d.car_density - 0.55).abs() < 1e-5);
        assert_eq!(d.max_lanes_per_road, 2);
    }

    #[test]
    fn test_difficulty_select_input() {
        let mut session = GameSession::new(1, 5, 0);
        let input = TickInput {
            difficulty: Some(10),
            ..Default::default()
        };
        tick(&mut session, &input, 16);
        assert_eq!(session.difficulty.max_lanes_per_road, 5);

        let input = TickInput {
            difficulty: Some(1),
            ..Default::default()
        };
        tick(&mut session, &input, 32);
        assert_eq!(session.difficulty.max_lanes_per_road, 1);
    }

    #[test]
    fn test_move_up_one_row_scores_ten() {
        let mut session = GameSession::new(42, 5, 0);
        assert_eq!(session.player.grid_y, 5.0);
        let events = tick(&mut session, &up(), 200);
        assert!(events.moved.is_some());
        assert_eq!(session.player.grid_y, 4.0);
        assert_eq!(session.score, 10);
        assert!(events.collision.is_none());
    }

    #[test]
    fn test_lateral_move_keeps_score() {
        let mut session = GameSession::new(42, 5, 0);
        let input = TickInput {
            movement: Some(MoveDirection::Left),
            ..Default::default()
        };
        tick(&mut session, &input, 200);
        assert_eq!(session.player.grid_x, GRID_WIDTH / 2 - 1);
        assert_eq!(session.score, 0);
    }

    #[test]
    fn test_move_respects_cooldown() {
        let mut session = GameSession::new(42, 5, 0);
        tick(&mut session, &up(), 200);
        tick(&mut session, &up(), 300);
        assert_eq!(session.player.grid_y, 4.0);
        tick(&mut session, &up(), 400);
        assert!(session.player.grid_y < 4.0);
    }

    #[test]
    fn test_game_over_is_terminal_until_restart() {
        let mut session = GameSession::new(7, 5, 0);
        force_collision(&mut session);
        let events = tick(&mut session, &TickInput::default(), 16);
        assert!(events.collision.is_some());
        assert_eq!(session.player.phase, PlayerPhase::GameOver);

        // Frozen: no movement, no traffic, no score
        let ticks = session.time_ticks;
        let y = session.player.grid_y;
        let xs: Vec<f32> = session.traffic.vehicles().iter().map(|v| v.x).collect();
        for t in 1..20 {
            tick(&mut session, &up(), 1000 + t * 250);
        }
        assert_eq!(session.time_ticks, ticks);
        assert_eq!(session.player.grid_y, y);
        let xs_after: Vec<f32> = session.traffic.vehicles().iter().map(|v| v.x).collect();
        assert_eq!(xs, xs_after);
        assert!(session.is_game_over());

        // Restart resets the run
        session.score = 40;
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        let events = tick(&mut session, &restart, 10_000);
        assert!(events.restarted);
        assert!(!session.is_game_over());
        assert_eq!(session.score, 0);
        assert!(session.strip.is_safe_at(session.player.grid_y));
        assert!(session.strip.road_at(session.player.grid_y).is_none());
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let mut session = GameSession::new(7, 5, 0);
        tick(&mut session, &up(), 200);
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        let events = tick(&mut session, &restart, 500);
        assert!(!events.restarted);
        assert_eq!(session.score, 10);
    }

    #[test]
    fn test_quit_short_circuits() {
        let mut session = GameSession::new(7, 5, 0);
        let input = TickInput {
            quit: true,
            movement: Some(MoveDirection::Up),
            ..Default::default()
        };
        let events = tick(&mut session, &input, 200);
        assert!(events.quit);
        assert_eq!(session.time_ticks, 0);
        assert_eq!(session.player.grid_y, 5.0);
    }

    #[test]
    fn test_sub_lane_parameters_fixed_without_ramp() {
        let mut session = GameSession::new(21, 6, 0);
        let snapshot: Vec<(f32, f32)> = session
            .strip
            .lanes()
            .iter()
            .flat_map(|l| l.sub_lanes.iter().map(|s| (s.direction.sign(), s.speed)))
            .collect();
        for t in 0..120 {
            tick(&mut session, &TickInput::default(), t * 16);
        }
        let later: Vec<(f32, f32)> = session
            .strip
            .lanes()
            .iter()
            .flat_map(|l| l.sub_lanes.iter().map(|s| (s.direction.sign(), s.speed)))
            .collect();
        assert_eq!(snapshot, later);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameSession::new(99999, 5, 0);
        let mut b = GameSession::new(99999, 5, 0);
        for t in 0..300u64 {
            let input = if t % 13 == 0 { up() } else { TickInput::default() };
            tick(&mut a, &input, t * 16);
            tick(&mut b, &input, t * 16);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.player.grid_y, b.player.grid_y);
        assert_eq!(a.traffic.len(), b.traffic.len());
        assert_eq!(a.is_game_over(), b.is_game_over());
    }

    proptest! {
        #[test]
        fn prop_score_monotonic_and_world_ahead(
            seed in any::<u64>(),
            moves in prop::collection::vec(0u8..4, 1..60),
        ) {
            let mut session = GameSession::new(seed, 5, 0);
            let mut now = 0u64;
            for m in moves {
                now += 250;
                let movement = match m {
                    0 => None,
                    1 => Some(MoveDirection::Up),
                    2 => Some(MoveDirection::Left),
                    _ => Some(MoveDirection::Right),
                };
                let y_before = session.player.grid_y;
                let score_before = session.score;
                let events = tick(&mut session, &TickInput { movement, ..Default::default() }, now);

                prop_assert!(session.score >= score_before);
                if let Some(outcome) = events.moved {
                    let gained = session.score - score_before;
                    if outcome.to.y < y_before {
                        prop_assert_eq!(gained, ((y_before - outcome.to.y) * 10.0).round() as u64);
                    } else {
                        prop_assert_eq!(gained, 0);
                    }
                    if let Some(id) = session.strip.road_at(outcome.to.y) {
                        let lane = session.strip.get(id).unwrap();
                        prop_assert!(lane.sub_lanes.iter().any(|s| s.y - 0.5 == outcome.to.y));
                    }
                    prop_assert!(session.strip.frontier_y() <= session.camera_y() - LOOKAHEAD_MARGIN);
                }
                if session.is_game_over() {
                    break;
                }
            }
        }
    }
}
