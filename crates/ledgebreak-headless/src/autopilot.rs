//! A simple scripted player. It presses physical keys through the binding
//! table, so the runner reads it exactly like a human at a keyboard.

use std::collections::BTreeSet;

use ledgebreak_core::bindings::KeyBindings;
use ledgebreak_core::geometry::{Kinematic, Rect};
use ledgebreak_core::input::{Action, KeyboardState};
use ledgebreak_platformer::RunnerState;

/// How far ahead a ground threat triggers a jump.
const LOOKAHEAD: f32 = 140.0;
/// How close an enemy must be to swing at it.
const STRIKE_REACH: f32 = 50.0;
/// Frames without forward progress before trying a dash.
const STUCK_FRAMES: u32 = 45;

#[derive(Debug, Default)]
pub struct Autopilot {
    held: BTreeSet<Action>,
    last_x: f32,
    stalled: u32,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide this frame's actions from the snapshot.
    pub fn decide(&mut self, state: &RunnerState) -> BTreeSet<Action> {
        let player = &state.player;
        let body = player.bounds();
        let mut want = BTreeSet::from([Action::Right]);

        if player.x > self.last_x + 0.5 {
            self.stalled = 0;
        } else {
            self.stalled += 1;
        }
        self.last_x = player.x;

        let ahead = Rect::new(body.right(), body.y, LOOKAHEAD, body.h);
        let threat_ahead = state
            .entities
            .enemy_bounds()
            .map(|(_, r)| r)
            .chain(state.entities.spikes.iter().map(|s| s.bounds()))
            .any(|r| r.intersects(&ahead));
        let strike = Rect::new(body.right(), body.y, STRIKE_REACH, body.h);
        let in_reach = state
            .entities
            .enemy_bounds()
            .any(|(_, r)| r.intersects(&strike));

        if in_reach {
            want.insert(Action::Attack);
        }
        // Jump is edge-triggered: release for a frame between presses.
        let airborne_falling = !player.is_grounded() && player.vy > 0.0;
        if (threat_ahead && (player.is_grounded() || airborne_falling))
            && !self.held.contains(&Action::Jump)
        {
            want.insert(Action::Jump);
        }
        if self.stalled >= STUCK_FRAMES && !self.held.contains(&Action::Dash) {
            want.insert(Action::Dash);
            self.stalled = 0;
        }
        want
    }

    /// Apply `want` to the keyboard using each action's first bound key.
    pub fn press(&mut self, want: BTreeSet<Action>, bindings: &KeyBindings, keys: &mut KeyboardState) {
        for action in Action::GAMEPLAY {
            let Some(key) = bindings.keys_for(action).first() else {
                continue;
            };
            match (self.held.contains(&action), want.contains(&action)) {
                (false, true) => keys.on_key_down(key),
                (true, false) => keys.on_key_up(key),
                _ => {},
            }
        }
        self.held = want;
    }

    pub fn drive(&mut self, state: &RunnerState, bindings: &KeyBindings, keys: &mut KeyboardState) {
        let want = self.decide(state);
        self.press(want, bindings, keys);
    }
}
