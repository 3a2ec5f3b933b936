use serde::{Deserialize, Serialize};

use crate::events::GameEvent;
use crate::input::InputSource;
use crate::time::TICK_RATE_HZ;

/// Core trait for a frame-stepped game simulation.
///
/// The host owns the frame loop, input capture, audio and drawing; the game
/// only advances its own state one fixed tick at a time and reports what
/// happened as events.
pub trait LedgebreakGame: Send + Sync {
    /// Game metadata for menus and logs.
    fn metadata(&self) -> GameMetadata;

    /// Called once before the first frame, and again to restart a session.
    fn init(&mut self, config: &GameConfig);

    /// Advance exactly one fixed tick. Returns everything that happened.
    fn update(&mut self, input: &dyn InputSource) -> Vec<GameEvent>;

    /// Serialize the full simulation state.
    fn serialize_state(&self) -> Vec<u8>;

    /// Replace the simulation state with a previously serialized one.
    fn apply_state(&mut self, state: &[u8]);

    /// Simulation tick rate in Hz.
    fn tick_rate(&self) -> f32 {
        TICK_RATE_HZ
    }

    /// Freeze simulation. Returns a signal only if the state changed.
    fn pause(&mut self) -> Option<GameEvent>;

    /// Unfreeze simulation. Returns a signal only if the state changed.
    fn resume(&mut self) -> Option<GameEvent>;

    fn is_paused(&self) -> bool;

    fn toggle_pause(&mut self) -> Option<GameEvent> {
        if self.is_paused() {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// Whether the session has ended (won or lost).
    fn is_complete(&self) -> bool;
}

/// Game metadata for menus and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
    pub level_count: u8,
    pub screens_per_level: u8,
}

/// Configuration for a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// 1-based level to start on.
    pub start_level: u8,
    /// Seed for procedural spawns. Equal seeds replay identically.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_level: 1,
            seed: 42,
        }
    }
}

/// Generates the `LedgebreakGame` methods that only touch the state blob and
/// the pause flag: `serialize_state`, `apply_state`, `pause`, `resume`,
/// `is_paused`, `is_complete`.
///
/// Requires the implementing struct to have `state: $StateType` and
/// `paused: bool` fields, and `$StateType` to provide `fn is_finished(&self) -> bool`.
#[macro_export]
macro_rules! ledgebreak_game_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            $crate::rmp_serde::to_vec(&self.state).expect("game state serialization must succeed")
        }

        fn apply_state(&mut self, state: &[u8]) {
            match $crate::rmp_serde::from_slice::<$StateType>(state) {
                Ok(s) => self.state = s,
                Err(e) => $crate::tracing::warn!("Ignoring undecodable state blob: {e}"),
            }
        }

        fn pause(&mut self) -> Option<$crate::events::GameEvent> {
            if self.paused {
                return None;
            }
            self.paused = true;
            Some($crate::events::SessionEvent::Paused.into())
        }

        fn resume(&mut self) -> Option<$crate::events::GameEvent> {
            if !self.paused {
                return None;
            }
            self.paused = false;
            Some($crate::events::SessionEvent::Resumed.into())
        }

        fn is_paused(&self) -> bool {
            self.paused
        }

        fn is_complete(&self) -> bool {
            self.state.is_finished()
        }
    };
}
