//! Skyline Runner: a single-player side-scrolling action platformer.
//!
//! The crate is a pure frame-stepped simulation. The host polls input,
//! calls [`LedgebreakGame::update`] once per tick, plays the returned sound
//! cues, and hands [`RunnerState`] to a [`RenderSink`] for drawing.

pub mod clock;
pub mod collision;
pub mod config;
pub mod entities;
pub mod level;
pub mod physics;

use serde::{Deserialize, Serialize};

use ledgebreak_core::events::{GameEvent, SessionEvent};
use ledgebreak_core::game_trait::{GameConfig, GameMetadata, LedgebreakGame};
use ledgebreak_core::geometry::Kinematic;
use ledgebreak_core::input::InputSource;
use ledgebreak_core::ledgebreak_game_boilerplate;

use clock::SimulationClock;
use config::RunnerConfig;
use entities::EntityRoster;
use level::{LevelDirector, LevelTable, ScreenType};
use physics::{PlayerIntent, PlayerState, update_player};

/// Complete simulation snapshot. This is what gets serialized and what a
/// renderer reads each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerState {
    pub player: PlayerState,
    pub entities: EntityRoster,
    pub clock: SimulationClock,
    pub director: LevelDirector,
}

impl RunnerState {
    /// A session on screen 0 of `start_level` with its entry placements made.
    fn fresh(start_level: u8, seed: u64, table: &LevelTable, config: &RunnerConfig) -> Self {
        let mut director = LevelDirector::new(start_level, seed, table);
        let (x, y) = director.spawn_point(table, config);
        let mut entities = EntityRoster::new();
        director.enter_pending(&mut entities, table, config);
        Self {
            player: PlayerState::new(x, y, &config.player),
            entities,
            clock: SimulationClock::new(),
            director,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.director.is_finished()
    }

    pub fn level(&self) -> u8 {
        self.director.level()
    }

    pub fn screen(&self) -> u8 {
        self.director.screen()
    }
}

/// Receives a read-only snapshot once per frame, paused frames included.
pub trait RenderSink {
    fn draw(&mut self, state: &RunnerState);
}

/// Display metadata for the live screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelInfo {
    pub level: u8,
    pub screen: u8,
    pub level_name: &'static str,
    pub theme: &'static str,
    pub screen_name: &'static str,
    pub screen_type: Option<ScreenType>,
    pub description: &'static str,
}

/// Top edge below the viewport or right edge left of it.
fn out_of_world(player: &PlayerState, config: &RunnerConfig) -> bool {
    let b = player.bounds();
    b.y > config.world.viewport_height || b.right() < 0.0
}

/// The Skyline Runner game.
pub struct SkylineRunner {
    config: RunnerConfig,
    table: LevelTable,
    state: RunnerState,
    paused: bool,
    seed: u64,
}

impl SkylineRunner {
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        let table = LevelTable::standard();
        let start = GameConfig::default();
        let state = RunnerState::fresh(start.start_level, start.seed, &table, &config);
        Self {
            config,
            table,
            state,
            paused: false,
            seed: start.seed,
        }
    }

    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn table(&self) -> &LevelTable {
        &self.table
    }

    pub fn time_survived_secs(&self) -> f32 {
        self.state
            .clock
            .time_survived_secs(self.config.world.tick_rate_hz)
    }

    pub fn level_info(&self) -> LevelInfo {
        let (level, screen) = (self.state.level(), self.state.screen());
        let lc = self.table.level(level);
        let sc = self.table.screen(level, screen);
        LevelInfo {
            level,
            screen,
            level_name: lc.map_or("Unknown Level", |l| l.name),
            theme: lc.map_or("Unknown", |l| l.theme),
            screen_name: sc.map_or("Unknown Screen", |s| s.name),
            screen_type: sc.map(|s| s.kind),
            description: sc.map_or("Unknown", |s| s.description),
        }
    }

    /// Hand the current snapshot to a renderer.
    pub fn render(&self, sink: &mut dyn RenderSink) {
        sink.draw(&self.state);
    }

    /// Back to screen 0 of the current level with a fresh player. Time
    /// survived keeps counting.
    pub fn restart_level(&mut self) -> Vec<GameEvent> {
        let RunnerState {
            player,
            entities,
            clock,
            director,
        } = &mut self.state;
        director.restart_level();
        entities.clear();
        clock.reset_spawn_timer();
        let (x, y) = director.spawn_point(&self.table, &self.config);
        player.respawn_at(x, y, &self.config.player);
        director.enter_pending(entities, &self.table, &self.config);
        self.paused = false;
        vec![
            SessionEvent::EnteredScreen {
                level: director.level(),
                screen: 0,
            }
            .into(),
        ]
    }

    /// A new session from level 1 with the same seed.
    pub fn restart_game(&mut self) -> Vec<GameEvent> {
        self.state = RunnerState::fresh(1, self.seed, &self.table, &self.config);
        self.paused = false;
        vec![SessionEvent::EnteredScreen { level: 1, screen: 0 }.into()]
    }
}

impl Default for SkylineRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgebreakGame for SkylineRunner {
    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Skyline Runner".to_string(),
            description: "Run, jump, dash and fight across six levels of rooftops.".to_string(),
            level_count: self.table.level_count(),
            screens_per_level: level::table::SCREENS_PER_LEVEL,
        }
    }

    fn tick_rate(&self) -> f32 {
        self.config.world.tick_rate_hz
    }

    fn init(&mut self, config: &GameConfig) {
        self.seed = config.seed;
        self.state = RunnerState::fresh(config.start_level, config.seed, &self.table, &self.config);
        self.paused = false;
        tracing::debug!(
            level = self.state.level(),
            seed = config.seed,
            "Session started"
        );
    }

    fn update(&mut self, input: &dyn InputSource) -> Vec<GameEvent> {
        if self.paused || self.state.is_finished() {
            return Vec::new();
        }

        let (config, table) = (&self.config, &self.table);
        let RunnerState {
            player,
            entities,
            clock,
            director,
        } = &mut self.state;
        let mut events = Vec::new();

        clock.begin_frame();
        director.enter_pending(entities, table, config);

        let intent = PlayerIntent::poll(input);
        events.extend(update_player(
            player,
            &intent,
            &config.player,
            &config.rules,
            config.world.viewport_width,
        ));
        entities.advance(player.x, &config.enemies);

        let outcome = collision::resolve(player, entities, config);
        events.extend(outcome.events);

        let session = if let Some(cause) = outcome.death {
            director.reset_screen(cause, player, entities, clock, table, config)
        } else if director.should_advance(player, clock, config) {
            director.advance(player, entities, clock, table, config)
        } else {
            Vec::new()
        };
        events.extend(session.into_iter().map(GameEvent::from));
        if director.is_finished() {
            return events;
        }

        entities.cull(config.world.viewport_width);

        if out_of_world(player, config) {
            director.game_over();
            events.push(SessionEvent::GameOver.into());
            return events;
        }

        if clock.spawn_due(config.world.spawn_interval_frames) {
            let spawned = director.run_wave(entities, table, config);
            tracing::debug!(spawned, "Periodic wave");
        }
        clock.record_survived_frame();
        events
    }

    ledgebreak_game_boilerplate!(state_type: RunnerState);
}
