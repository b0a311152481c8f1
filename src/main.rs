//! Lane Hopper entry point
//!
//! Runs a headless demo session: scripted hops, frames reported through the
//! log. Pass a settings JSON path as the first argument to override defaults.

use lane_hopper::platform::{LogRenderer, ScriptedInput, SystemClock};
use lane_hopper::{Settings, run};

/// Frames between scripted hops
const DEMO_HOP_INTERVAL: usize = 15;
/// Demo length when the settings do not cap it
const DEMO_MAX_FRAMES: u64 = 60 * 60;

fn main() {
    env_logger::init();
    log::info!("Lane Hopper (headless) starting...");

    let mut settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_from(path),
        None => Settings::default(),
    };
    if settings.max_frames.is_none() {
        settings.max_frames = Some(DEMO_MAX_FRAMES);
    }

    let mut input = ScriptedInput::hopper(DEMO_HOP_INTERVAL);
    let mut renderer = LogRenderer::new(u64::from(settings.target_fps.max(1)));
    let mut clock = SystemClock::new();

    match run(&settings, &mut input, &mut renderer, &mut clock) {
        Ok(summary) => log::info!(
            "Seed {}: {} frames, best score {}, {} collisions",
            summary.seed,
            summary.frames,
            summary.best_score,
            summary.collisions
        ),
        Err(e) => {
            log::error!("Game loop stopped: {}", e);
            std::process::exit(1);
        }
    }
}
