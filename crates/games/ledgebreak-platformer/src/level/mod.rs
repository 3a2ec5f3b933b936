//! Level progression: which (level, screen) is live, screen advance and
//! reset, game completion, and when spawns run.

pub mod spawning;
pub mod table;

use serde::{Deserialize, Serialize};

use ledgebreak_core::events::{DeathCause, SessionEvent};

use crate::clock::SimulationClock;
use crate::config::RunnerConfig;
use crate::entities::EntityRoster;
use crate::physics::PlayerState;

pub use table::{LevelConfig, LevelTable, Placement, ScreenConfig, ScreenType};

/// Spawn point used when a screen has no configuration.
const FALLBACK_SPAWN_X: f32 = 80.0;

/// Where the session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Progress {
    Playing,
    /// Every screen of the last level was cleared.
    Complete,
    /// The player left the world.
    GameOver,
}

/// Level/screen state machine. Indices are 1-based levels and 0-based screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDirector {
    level: u8,
    screen: u8,
    progress: Progress,
    /// The current screen's entry placements are due at the top of the next frame.
    entry_pending: bool,
    seed: u64,
    waves_run: u64,
}

impl LevelDirector {
    /// A director on screen 0 of `start_level`. Out-of-range levels clamp
    /// into the table.
    pub fn new(start_level: u8, seed: u64, table: &LevelTable) -> Self {
        let last = table.level_count().max(1);
        let level = start_level.clamp(1, last);
        if level != start_level {
            tracing::warn!(start_level, level, "Start level out of range, clamped");
        }
        Self {
            level,
            screen: 0,
            progress: Progress::Playing,
            entry_pending: true,
            seed,
            waves_run: 0,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn screen(&self) -> u8 {
        self.screen
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn is_finished(&self) -> bool {
        self.progress != Progress::Playing
    }

    pub fn entry_pending(&self) -> bool {
        self.entry_pending
    }

    pub fn waves_run(&self) -> u64 {
        self.waves_run
    }

    pub fn current_screen<'t>(&self, table: &'t LevelTable) -> Option<&'t ScreenConfig> {
        table.screen(self.level, self.screen)
    }

    /// Player spawn point for the current screen.
    pub fn spawn_point(&self, table: &LevelTable, config: &RunnerConfig) -> (f32, f32) {
        let ground_y = config.world.ground_y;
        match self.current_screen(table) {
            Some(s) => s.spawn_point(ground_y),
            None => (FALLBACK_SPAWN_X, ground_y - config.player.height),
        }
    }

    /// Make the current screen's entry placements if they are due.
    pub fn enter_pending(
        &mut self,
        roster: &mut EntityRoster,
        table: &LevelTable,
        config: &RunnerConfig,
    ) -> bool {
        if !self.entry_pending {
            return false;
        }
        self.entry_pending = false;
        match self.current_screen(table) {
            Some(s) => {
                spawning::place_initial(&s.placements, roster, config);
                true
            },
            None => {
                tracing::warn!(
                    level = self.level,
                    screen = self.screen,
                    "No entry placements configured"
                );
                false
            },
        }
    }

    /// Run the current screen's periodic wave. Returns entities created.
    pub fn run_wave(
        &mut self,
        roster: &mut EntityRoster,
        table: &LevelTable,
        config: &RunnerConfig,
    ) -> usize {
        let Some(s) = self.current_screen(table) else {
            tracing::warn!(
                level = self.level,
                screen = self.screen,
                "No spawn waves configured"
            );
            return 0;
        };
        let mut rng = spawning::wave_rng(self.seed, self.waves_run);
        self.waves_run += 1;
        spawning::run_wave(&s.waves, roster, &mut rng, config)
    }

    /// Whether this frame crosses into the next screen.
    pub fn should_advance(&self, player: &PlayerState, clock: &SimulationClock, config: &RunnerConfig) -> bool {
        self.progress == Progress::Playing
            && !clock.transitions_locked()
            && player.x >= config.world.transition_x
    }

    /// Move to the next screen, rolling into the next level after the last
    /// screen. Past the last level the session completes instead.
    pub fn advance(
        &mut self,
        player: &mut PlayerState,
        roster: &mut EntityRoster,
        clock: &mut SimulationClock,
        table: &LevelTable,
        config: &RunnerConfig,
    ) -> Vec<SessionEvent> {
        let mut events = vec![SessionEvent::ScreenCleared {
            level: self.level,
            screen: self.screen,
        }];

        let (mut level, mut screen) = (self.level, self.screen + 1);
        if screen >= table.screen_count(level) {
            level += 1;
            screen = 0;
        }
        if level > table.level_count() {
            self.progress = Progress::Complete;
            let secs = clock.time_survived_secs(config.world.tick_rate_hz);
            tracing::info!(time_survived_secs = secs, "All levels complete");
            events.push(SessionEvent::LevelComplete {
                time_survived_secs: secs,
            });
            return events;
        }
        if table.screen(level, screen).is_none() {
            tracing::warn!(level, screen, "Transition target missing, ending session");
            self.progress = Progress::Complete;
            events.push(SessionEvent::LevelComplete {
                time_survived_secs: clock.time_survived_secs(config.world.tick_rate_hz),
            });
            return events;
        }

        self.level = level;
        self.screen = screen;
        roster.clear();
        let (x, y) = self.spawn_point(table, config);
        player.enter_screen_at(x, y, &config.player, &config.rules);
        clock.reset_spawn_timer();
        clock.lock_transitions(config.world.transition_lock_frames());
        self.entry_pending = true;
        tracing::debug!(level, screen, "Entered screen");
        events.push(SessionEvent::EnteredScreen { level, screen });
        events
    }

    /// Death: clear the screen and respawn without changing indices. The
    /// transition lock is left alone.
    pub fn reset_screen(
        &mut self,
        cause: DeathCause,
        player: &mut PlayerState,
        roster: &mut EntityRoster,
        clock: &mut SimulationClock,
        table: &LevelTable,
        config: &RunnerConfig,
    ) -> Vec<SessionEvent> {
        roster.clear();
        let (x, y) = self.spawn_point(table, config);
        player.respawn_at(x, y, &config.player);
        clock.reset_spawn_timer();
        self.entry_pending = true;
        tracing::debug!(level = self.level, screen = self.screen, ?cause, "Screen reset");
        vec![
            SessionEvent::Died { cause },
            SessionEvent::EnteredScreen {
                level: self.level,
                screen: self.screen,
            },
        ]
    }

    /// Back to screen 0 of the current level.
    pub fn restart_level(&mut self) {
        self.screen = 0;
        self.progress = Progress::Playing;
        self.entry_pending = true;
    }

    /// Back to screen 0 of `level`, clamped into the table.
    pub fn select_level(&mut self, level: u8, table: &LevelTable) {
        let seed = self.seed;
        *self = Self::new(level, seed, table);
    }

    pub fn game_over(&mut self) {
        if self.progress == Progress::Playing {
            tracing::info!(level = self.level, screen = self.screen, "Game over");
            self.progress = Progress::GameOver;
        }
    }
}
