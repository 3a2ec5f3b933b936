pub mod bindings;
pub mod events;
pub mod game_trait;
pub mod geometry;
pub mod input;
pub mod time;

// Paths used by `ledgebreak_game_boilerplate!` in downstream crates.
#[doc(hidden)]
pub use rmp_serde;
#[doc(hidden)]
pub use tracing;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::events::{GameEvent, SessionEvent};
    use crate::game_trait::{GameConfig, LedgebreakGame};
    use crate::input::{Action, ActionSet, InputSource};

    /// GameConfig starting at `level` with a fixed seed.
    pub fn config_at_level(level: u8) -> GameConfig {
        GameConfig {
            start_level: level,
            seed: 7,
        }
    }

    /// An input source holding exactly `actions`.
    pub fn holding(actions: &[Action]) -> ActionSet {
        ActionSet::with(actions)
    }

    /// Run N frames with the same held input, returning all accumulated events.
    pub fn run_frames(
        game: &mut dyn LedgebreakGame,
        n: usize,
        input: &dyn InputSource,
    ) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.update(input));
        }
        all_events
    }

    /// Run N frames with nothing held.
    pub fn run_idle_frames(game: &mut dyn LedgebreakGame, n: usize) -> Vec<GameEvent> {
        run_frames(game, n, &ActionSet::new())
    }

    /// Count session signals matching `pred`.
    pub fn count_session(events: &[GameEvent], pred: impl Fn(&SessionEvent) -> bool) -> usize {
        events
            .iter()
            .filter_map(GameEvent::as_session)
            .filter(|e| pred(*e))
            .count()
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // These functions form a generic test suite that every LedgebreakGame
    // implementation must pass. Game crates call them from their own
    // #[cfg(test)] modules with a concrete game instance.

    /// After init(), serialize_state() must return non-empty bytes.
    pub fn contract_init_creates_state(game: &mut dyn LedgebreakGame) {
        game.init(&GameConfig::default());
        let state = game.serialize_state();
        assert!(
            !state.is_empty(),
            "serialize_state() must return non-empty bytes after init"
        );
    }

    /// update() must advance the simulation even with no input held.
    pub fn contract_update_advances_state(game: &mut dyn LedgebreakGame) {
        let before = game.serialize_state();
        game.update(&ActionSet::new());
        let after = game.serialize_state();
        assert_ne!(before, after, "update() must advance game state (clock)");
    }

    /// serialize_state → apply_state roundtrip must be stable.
    pub fn contract_state_roundtrip_preserves(game: &mut dyn LedgebreakGame) {
        let state_a = game.serialize_state();
        game.apply_state(&state_a);
        let state_b = game.serialize_state();
        assert_eq!(
            state_a, state_b,
            "State must be unchanged after serialize→apply→serialize"
        );
    }

    /// pause() must freeze state and signal once; resume() must unfreeze it.
    pub fn contract_pause_freezes_state(game: &mut dyn LedgebreakGame) {
        assert_eq!(
            game.pause(),
            Some(GameEvent::from(SessionEvent::Paused)),
            "First pause must signal Paused"
        );
        assert_eq!(game.pause(), None, "Pausing twice must not signal again");
        assert!(game.is_paused());

        let before = game.serialize_state();
        let during = run_frames(game, 5, &ActionSet::with(&[Action::Right, Action::Jump]));
        assert!(during.is_empty(), "Paused frames must not emit events");
        let during_pause = game.serialize_state();
        assert_eq!(before, during_pause, "State must not change while paused");

        assert_eq!(game.resume(), Some(GameEvent::from(SessionEvent::Resumed)));
        game.update(&ActionSet::new());
        let after_resume = game.serialize_state();
        assert_ne!(during_pause, after_resume, "State must change after resume");
    }
}
