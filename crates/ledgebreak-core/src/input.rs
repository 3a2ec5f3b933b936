use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::bindings::{KeyBindings, MOUSE_PREFIX};

/// Logical actions the simulation and the camera can poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Left,
    Right,
    Jump,
    Dash,
    Attack,
    Up,
    Down,
    /// Camera hint for the renderer; the simulation ignores it.
    LookUp,
    /// Camera hint for the renderer; the simulation ignores it.
    LookDown,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::Left,
        Action::Right,
        Action::Jump,
        Action::Dash,
        Action::Attack,
        Action::Up,
        Action::Down,
        Action::LookUp,
        Action::LookDown,
    ];

    /// The seven actions that drive gameplay.
    pub const GAMEPLAY: [Action; 7] = [
        Action::Left,
        Action::Right,
        Action::Jump,
        Action::Dash,
        Action::Attack,
        Action::Up,
        Action::Down,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Jump => "jump",
            Action::Dash => "dash",
            Action::Attack => "attack",
            Action::Up => "up",
            Action::Down => "down",
            Action::LookUp => "lookUp",
            Action::LookDown => "lookDown",
        }
    }
}

/// Polling interface the simulation reads once per frame.
pub trait InputSource {
    fn is_action_down(&self, action: Action) -> bool;
}

/// A plain set of held actions. Used by scripted drivers and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSet {
    held: HashSet<Action>,
}

impl ActionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(actions: &[Action]) -> Self {
        Self {
            held: actions.iter().copied().collect(),
        }
    }

    pub fn press(&mut self, action: Action) {
        self.held.insert(action);
    }

    pub fn release(&mut self, action: Action) {
        self.held.remove(&action);
    }

    pub fn set(&mut self, action: Action, down: bool) {
        if down {
            self.press(action);
        } else {
            self.release(action);
        }
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

impl InputSource for ActionSet {
    fn is_action_down(&self, action: Action) -> bool {
        self.held.contains(&action)
    }
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Key identifier in the reserved mouse namespace (`Mouse0` = left).
    pub fn key_id(self) -> String {
        let index = match self {
            MouseButton::Left => 0,
            MouseButton::Middle => 1,
            MouseButton::Right => 2,
        };
        format!("{MOUSE_PREFIX}{index}")
    }
}

/// Physical keyboard/mouse state, fed by the host's event pump.
///
/// Mouse buttons share the key set under their `Mouse<n>` identifiers so a
/// binding can name either kind of control.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    /// Keys currently held down.
    pub keys_down: HashSet<String>,
    /// Keys pressed this frame (cleared each frame).
    pub keys_just_pressed: HashSet<String>,
    /// Keys released this frame (cleared each frame).
    pub keys_just_released: HashSet<String>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_key_down(&mut self, key: &str) {
        let key = normalize_key(key);
        if self.keys_down.insert(key.clone()) {
            self.keys_just_pressed.insert(key);
        }
    }

    pub fn on_key_up(&mut self, key: &str) {
        let key = normalize_key(key);
        self.keys_down.remove(&key);
        self.keys_just_released.insert(key);
    }

    pub fn on_mouse_down(&mut self, button: MouseButton) {
        self.on_key_down(&button.key_id());
    }

    pub fn on_mouse_up(&mut self, button: MouseButton) {
        self.on_key_up(&button.key_id());
    }

    pub fn is_key_down(&self, key: &str) -> bool {
        self.keys_down.contains(&normalize_key(key))
    }

    pub fn is_key_just_pressed(&self, key: &str) -> bool {
        self.keys_just_pressed.contains(&normalize_key(key))
    }

    /// Drop everything held, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.keys_just_released.extend(self.keys_down.drain());
    }

    /// Clear per-frame state. Call at the end of each frame.
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.keys_just_released.clear();
    }
}

/// Single printable characters are case-folded so Shift does not break bindings.
fn normalize_key(key: &str) -> String {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_alphabetic() => c.to_lowercase().collect(),
        (Some(' '), None) => "Space".to_string(),
        _ => key.to_string(),
    }
}

/// Resolves logical actions through a binding table against physical key state.
pub struct BoundInput<'a> {
    pub keys: &'a KeyboardState,
    pub bindings: &'a KeyBindings,
}

impl<'a> BoundInput<'a> {
    pub fn new(keys: &'a KeyboardState, bindings: &'a KeyBindings) -> Self {
        Self { keys, bindings }
    }
}

impl InputSource for BoundInput<'_> {
    fn is_action_down(&self, action: Action) -> bool {
        self.bindings
            .keys_for(action)
            .iter()
            .any(|k| self.keys.is_key_down(k))
    }
}
