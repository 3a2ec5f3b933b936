//! Headless driver: runs one Skyline Runner session with the autopilot at the
//! keyboard, logs every session event, and prints a JSON summary on exit.

mod autopilot;
mod hud;
mod settings;

use std::process::ExitCode;

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use ledgebreak_core::events::{GameEvent, SessionEvent, SoundCue};
use ledgebreak_core::game_trait::LedgebreakGame;
use ledgebreak_core::input::{BoundInput, KeyboardState};
use ledgebreak_platformer::SkylineRunner;
use ledgebreak_platformer::config::RunnerConfig;
use ledgebreak_platformer::level::Progress;

use autopilot::Autopilot;
use hud::HudSink;
use settings::{RunError, RunSettings};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Per-session counters reported at exit.
#[derive(Debug, Default, Serialize, PartialEq)]
struct RunSummary {
    frames: u64,
    level: u8,
    screen: u8,
    outcome: &'static str,
    deaths: u32,
    screens_cleared: u32,
    kills: u32,
    time_survived_secs: f32,
}

impl RunSummary {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Session(SessionEvent::Died { .. }) => self.deaths += 1,
            GameEvent::Session(SessionEvent::ScreenCleared { .. }) => self.screens_cleared += 1,
            GameEvent::Sound(SoundCue::Kill) => self.kills += 1,
            _ => {},
        }
    }
}

fn log_event(event: &GameEvent) {
    let Ok(json) = serde_json::to_string(event) else {
        return;
    };
    match event {
        GameEvent::Session(_) => tracing::info!(event = %json, "session"),
        GameEvent::Player(_) => tracing::debug!(event = %json, "player"),
        GameEvent::Sound(_) => tracing::trace!(event = %json, "sound"),
    }
}

fn run_session(config: RunnerConfig, settings: &RunSettings) -> RunSummary {
    let bindings = config.bindings.clone();
    bindings.warn_conflicts();

    let mut game = SkylineRunner::with_config(config);
    game.init(&settings.session);
    let meta = game.metadata();
    tracing::info!(
        game = %meta.name,
        level = settings.session.start_level,
        seed = settings.session.seed,
        "Session starting"
    );

    let mut keys = KeyboardState::new();
    let mut pilot = Autopilot::new();
    let mut hud = HudSink::new(settings.hud_every);
    let mut summary = RunSummary::default();

    while summary.frames < settings.max_frames && !game.is_complete() {
        pilot.drive(game.state(), &bindings, &mut keys);
        let events = game.update(&BoundInput::new(&keys, &bindings));
        keys.end_frame();
        for event in &events {
            summary.record(event);
            log_event(event);
        }
        game.render(&mut hud);
        summary.frames += 1;
    }

    let state = game.state();
    summary.level = state.level();
    summary.screen = state.screen();
    summary.outcome = match state.director.progress() {
        Progress::Playing => "timed_out",
        Progress::Complete => "complete",
        Progress::GameOver => "game_over",
    };
    summary.time_survived_secs = game.time_survived_secs();
    tracing::info!(
        outcome = summary.outcome,
        frames = summary.frames,
        hud_lines = hud.lines_written(),
        "Session finished"
    );
    summary
}

fn run() -> Result<RunSummary, RunError> {
    let settings = RunSettings::from_env()?;
    init_tracing(settings.json_logs);
    let config = settings::load_runner_config()?;
    Ok(run_session(config, &settings))
}

fn main() -> ExitCode {
    match run() {
        Ok(summary) => {
            match serde_json::to_string(&summary) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!("Failed to encode summary: {e}"),
            }
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("ledgebreak-headless: {e}");
            ExitCode::FAILURE
        },
    }
}
