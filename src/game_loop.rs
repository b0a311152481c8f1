//! Fixed-rate cooperative game loop
//!
//! Each frame polls input, ticks the session, extracts a frame and hands it
//! to the renderer, then sleeps out the rest of the frame budget. The welcome
//! banner and the game-over pause block without polling input.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::frame::FrameView;
use crate::platform::{Clock, InputSource, PlatformError, Renderer};
use crate::settings::Settings;
use crate::sim::{GameSession, tick};

pub const WELCOME_MESSAGE: &str =
    "Welcome to Lane Hopper! Use arrow keys to move. Press 1-0 to change difficulty.";

pub fn game_over_message(score: u64) -> String {
    format!("Game Over! Final Score: {} - Press R to restart", score)
}

/// How a run of the loop ended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    /// Frames ticked and rendered
    pub frames: u64,
    pub seed: u64,
    pub final_score: u64,
    pub best_score: u64,
    pub restarts: u32,
    pub collisions: u32,
}

/// Start a new session from settings and run it until quit
pub fn run(
    settings: &Settings,
    input: &mut impl InputSource,
    renderer: &mut impl Renderer,
    clock: &mut impl Clock,
) -> Result<LoopSummary, PlatformError> {
    let seed = settings.seed.unwrap_or_else(time_seed);
    let session = GameSession::new(seed, settings.difficulty, clock.now_ms());
    run_session(session, settings, input, renderer, clock)
}

/// Run an existing session until quit, input failure or the frame limit
pub fn run_session(
    mut session: GameSession,
    settings: &Settings,
    input: &mut impl InputSource,
    renderer: &mut impl Renderer,
    clock: &mut impl Clock,
) -> Result<LoopSummary, PlatformError> {
    let budget = settings.frame_budget_ms();
    let mut summary = LoopSummary {
        seed: session.seed,
        ..Default::default()
    };

    if settings.show_welcome {
        let frame = FrameView::extract(&session, clock.now_ms(), Some(WELCOME_MESSAGE.to_string()));
        present(renderer, &frame);
        clock.sleep_ms(settings.welcome_pause_ms);
    }

    loop {
        if settings.max_frames.is_some_and(|max| summary.frames >= max) {
            log::info!("Frame limit reached after {} frames", summary.frames);
            break;
        }

        let frame_start = clock.now_ms();
        let frame_input = input.poll().inspect_err(|e| log::error!("{}", e))?;
        let events = tick(&mut session, &frame_input, frame_start);

        if events.quit {
            log::info!("Quit requested");
            break;
        }
        summary.frames += 1;
        if events.restarted {
            summary.restarts += 1;
        }
        summary.best_score = summary.best_score.max(session.score);

        let message = session.is_game_over().then(|| game_over_message(session.score));
        let frame = FrameView::extract(&session, clock.now_ms(), message);
        present(renderer, &frame);

        if events.collision.is_some() {
            summary.collisions += 1;
            clock.sleep_ms(settings.game_over_pause_ms);
            continue;
        }

        let elapsed = clock.now_ms().saturating_sub(frame_start);
        if elapsed < budget {
            clock.sleep_ms(budget - elapsed);
        }
    }

    summary.final_score = session.score;
    summary.seed = session.seed;
    log::info!(
        "Loop finished: {} frames, final score {}, best {}, {} restarts",
        summary.frames,
        summary.final_score,
        summary.best_score,
        summary.restarts
    );
    Ok(summary)
}

fn present(renderer: &mut impl Renderer, frame: &FrameView) {
    match renderer.render(frame) {
        Ok(()) => {}
        Err(e) => log::warn!("Render error: {:?}", e),
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
