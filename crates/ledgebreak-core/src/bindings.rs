//! Rebindable action→key table.
//!
//! Every action maps to a non-empty ordered list of key identifiers. Keys in
//! the `Mouse<n>` namespace name mouse buttons. The table is read-only to the
//! simulation; a settings UI owns rebinding.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::input::Action;

/// Prefix reserved for mouse button identifiers.
pub const MOUSE_PREFIX: &str = "Mouse";

/// Action pairs that are allowed to share a key.
const SHARED_PAIRS: [(Action, Action); 2] =
    [(Action::Up, Action::LookUp), (Action::Down, Action::LookDown)];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    #[error("key identifier must not be empty")]
    EmptyKey,

    #[error("action `{0}` has no keys bound")]
    Unbound(&'static str),

    #[error("unknown action `{0}`")]
    UnknownAction(String),
}

/// A key bound to more than one action outside the allowed shared pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingConflict {
    pub key: String,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub jump: Vec<String>,
    pub dash: Vec<String>,
    pub attack: Vec<String>,
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub look_up: Vec<String>,
    pub look_down: Vec<String>,
}

fn keys(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: keys(&["a", "ArrowLeft"]),
            right: keys(&["d", "ArrowRight"]),
            jump: keys(&["Space"]),
            dash: keys(&["e"]),
            attack: keys(&["Mouse0"]),
            up: keys(&["w", "ArrowUp"]),
            down: keys(&["s", "ArrowDown"]),
            look_up: keys(&["w"]),
            look_down: keys(&["s"]),
        }
    }
}

impl KeyBindings {
    pub fn keys_for(&self, action: Action) -> &[String] {
        match action {
            Action::Left => &self.left,
            Action::Right => &self.right,
            Action::Jump => &self.jump,
            Action::Dash => &self.dash,
            Action::Attack => &self.attack,
            Action::Up => &self.up,
            Action::Down => &self.down,
            Action::LookUp => &self.look_up,
            Action::LookDown => &self.look_down,
        }
    }

    fn keys_for_mut(&mut self, action: Action) -> &mut Vec<String> {
        match action {
            Action::Left => &mut self.left,
            Action::Right => &mut self.right,
            Action::Jump => &mut self.jump,
            Action::Dash => &mut self.dash,
            Action::Attack => &mut self.attack,
            Action::Up => &mut self.up,
            Action::Down => &mut self.down,
            Action::LookUp => &mut self.look_up,
            Action::LookDown => &mut self.look_down,
        }
    }

    /// Replace every key of `action` with the single key `key`.
    pub fn set_binding(&mut self, action: Action, key: &str) -> Result<(), BindingError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(BindingError::EmptyKey);
        }
        *self.keys_for_mut(action) = vec![key.to_string()];
        Ok(())
    }

    /// Append an alternate key for `action`. Adding a key twice is a no-op.
    pub fn add_binding(&mut self, action: Action, key: &str) -> Result<(), BindingError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(BindingError::EmptyKey);
        }
        let list = self.keys_for_mut(action);
        if !list.iter().any(|k| k == key) {
            list.push(key.to_string());
        }
        Ok(())
    }

    /// Same as [`set_binding`](Self::set_binding) but addressed by action name.
    pub fn set_binding_by_name(&mut self, action: &str, key: &str) -> Result<(), BindingError> {
        let action = Action::ALL
            .into_iter()
            .find(|a| a.name() == action)
            .ok_or_else(|| BindingError::UnknownAction(action.to_string()))?;
        self.set_binding(action, key)
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::default();
    }

    /// Check the non-empty invariant for every action.
    pub fn validate(&self) -> Result<(), BindingError> {
        for action in Action::ALL {
            let list = self.keys_for(action);
            if list.is_empty() {
                return Err(BindingError::Unbound(action.name()));
            }
            if list.iter().any(|k| k.trim().is_empty()) {
                return Err(BindingError::EmptyKey);
            }
        }
        Ok(())
    }

    /// Keys shared by several actions, excluding the allowed up/lookUp and
    /// down/lookDown pairs. Conflicts are warnings, never fatal.
    pub fn conflicts(&self) -> Vec<BindingConflict> {
        let mut by_key: BTreeMap<&str, Vec<Action>> = BTreeMap::new();
        for action in Action::ALL {
            for key in self.keys_for(action) {
                let owners = by_key.entry(key.as_str()).or_default();
                if !owners.contains(&action) {
                    owners.push(action);
                }
            }
        }

        by_key
            .into_iter()
            .filter(|(_, actions)| actions.len() > 1 && !is_allowed_share(actions))
            .map(|(key, actions)| BindingConflict {
                key: key.to_string(),
                actions,
            })
            .collect()
    }

    /// Log conflicts at warn level and return how many were found.
    pub fn warn_conflicts(&self) -> usize {
        let conflicts = self.conflicts();
        for c in &conflicts {
            let names: Vec<&str> = c.actions.iter().map(|a| a.name()).collect();
            tracing::warn!(key = %c.key, actions = ?names, "Key bound to multiple actions");
        }
        conflicts.len()
    }
}

fn is_allowed_share(actions: &[Action]) -> bool {
    actions.len() == 2
        && SHARED_PAIRS.iter().any(|&(a, b)| {
            (actions[0] == a && actions[1] == b) || (actions[0] == b && actions[1] == a)
        })
}

pub fn is_mouse_key(key: &str) -> bool {
    key.strip_prefix(MOUSE_PREFIX)
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

/// Short human-readable label for a key identifier.
pub fn key_label(key: &str) -> String {
    match key {
        "Space" | " " => "Space".to_string(),
        "Mouse0" => "LMB".to_string(),
        "Mouse1" => "MMB".to_string(),
        "Mouse2" => "RMB".to_string(),
        "ArrowLeft" => "Left".to_string(),
        "ArrowRight" => "Right".to_string(),
        "ArrowUp" => "Up".to_string(),
        "ArrowDown" => "Down".to_string(),
        k if is_mouse_key(k) => format!("M{}", &k[MOUSE_PREFIX.len()..]),
        k if k.chars().count() == 1 => k.to_uppercase(),
        k => k.to_string(),
    }
}
