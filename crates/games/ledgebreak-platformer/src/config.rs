//! Tunables for the runner, loadable from TOML.
//!
//! Every struct is `#[serde(default)]`, so a config file only needs the keys
//! it overrides. Defaults reproduce the shipped game feel.

use std::path::Path;

use serde::{Deserialize, Serialize};

use ledgebreak_core::bindings::{BindingError, KeyBindings};
use ledgebreak_core::time::{TICK_RATE_HZ, frames_from_millis};

pub const CONFIG_ENV: &str = "LEDGEBREAK_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/ledgebreak.toml";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid key bindings: {0}")]
    Bindings(#[from] BindingError),

    #[error("Invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Player movement and ability constants. Distances in pixels, times in frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    /// Horizontal acceleration per frame while a direction is held.
    pub acceleration: f32,
    pub max_speed: f32,
    /// Velocity multiplier per frame with no horizontal input.
    pub friction: f32,
    /// Speeds below this snap to zero under friction.
    pub stop_threshold: f32,
    pub gravity: f32,
    pub jump_power: f32,
    pub double_jump_power: f32,
    /// Grace frames after leaving a surface during which a ground jump still works.
    pub coyote_frames: u32,
    pub dash_distance: f32,
    pub dash_frames: u32,
    pub dash_cooldown_frames: u32,
    pub attack_frames: u32,
    pub attack_cooldown_frames: u32,
    /// Side of the square attack hitbox.
    pub attack_range: f32,
    /// How long the double-jump visual cue stays lit.
    pub double_jump_effect_frames: u32,
    /// How long the afterimage between dash start and end stays visible.
    pub dash_trail_frames: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: 60.0,
            height: 75.0,
            acceleration: 3.2,
            max_speed: 12.0,
            friction: 0.85,
            stop_threshold: 0.1,
            gravity: 0.8,
            jump_power: 18.0,
            double_jump_power: 16.0,
            coyote_frames: 6,
            dash_distance: 300.0,
            dash_frames: 12,
            dash_cooldown_frames: 5,
            attack_frames: 8,
            attack_cooldown_frames: 10,
            attack_range: 60.0,
            double_jump_effect_frames: 8,
            dash_trail_frames: 12,
        }
    }
}

impl PlayerTuning {
    /// Constant dash speed: the whole distance is covered in `dash_frames`.
    pub fn dash_speed(&self) -> f32 {
        self.dash_distance / self.dash_frames.max(1) as f32
    }
}

/// World geometry and pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Y of the floor surface. Screen coordinates, y grows downward.
    pub ground_y: f32,
    /// Player x at which the next screen is entered.
    pub transition_x: f32,
    /// Height of the low flying-enemy band above the ground.
    pub jump_height: f32,
    pub spawn_interval_frames: u32,
    /// Re-trigger guard after a screen advance.
    pub transition_lock_ms: u32,
    pub tick_rate_hz: f32,
    /// Max penetration into a platform top that still counts as a landing.
    pub land_tolerance: f32,
    /// Max distance below a platform bottom for an underside hit.
    pub underside_tolerance: f32,
    /// Minimum horizontal gap between a new spawn and an existing enemy.
    pub spawn_separation: f32,
    /// Vertical gap below which flying enemies count as too close.
    pub flying_separation_y: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 720.0,
            ground_y: 650.0,
            transition_x: 1200.0,
            jump_height: 80.0,
            spawn_interval_frames: 120,
            transition_lock_ms: 1000,
            tick_rate_hz: TICK_RATE_HZ,
            land_tolerance: 8.0,
            underside_tolerance: 5.0,
            spawn_separation: 60.0,
            flying_separation_y: 80.0,
        }
    }
}

impl WorldConfig {
    pub fn transition_lock_frames(&self) -> u32 {
        frames_from_millis(self.transition_lock_ms, self.tick_rate_hz)
    }
}

/// Enemy stats and behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Starting health of yellow and white enemies.
    pub health: i32,
    /// Horizontal reach of yellow-vs-white skirmishes.
    pub skirmish_range: f32,
    pub skirmish_cooldown_frames: u32,
    pub ground_enemy_size: f32,
    pub flying_size: f32,
    pub flying_amplitude: f32,
    /// Radians per frame of the flying bob.
    pub flying_frequency: f32,
    pub spike_size: f32,
    pub platform_height: f32,
    /// White enemies walk toward the player instead of drifting.
    pub white_pursuit: bool,
    pub white_follow_speed: f32,
    /// Horizontal push away from a flying enemy on contact.
    pub knockback: f32,
    /// Upward kick on flying-enemy contact.
    pub knockback_lift: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            health: 1,
            skirmish_range: 40.0,
            skirmish_cooldown_frames: 60,
            ground_enemy_size: 40.0,
            flying_size: 45.0,
            flying_amplitude: 50.0,
            flying_frequency: 0.02,
            spike_size: 30.0,
            platform_height: 20.0,
            white_pursuit: true,
            white_follow_speed: 0.8,
            knockback: 6.0,
            knockback_lift: 2.0,
        }
    }
}

/// When a spent dash becomes available again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashRecovery {
    /// Locked until the next landing, and the cooldown must also have run out.
    UntilLanding,
    /// Available again as soon as the cooldown runs out.
    Cooldown,
}

/// Outcome of touching a flying enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlyingContact {
    /// Knockback is applied, then the screen resets.
    InstantDeath,
    /// Knockback only.
    Bounce,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub dash_recovery: DashRecovery,
    pub flying_contact: FlyingContact,
    /// When false spikes are solid ground instead of hazards.
    pub spikes_lethal: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            dash_recovery: DashRecovery::UntilLanding,
            flying_contact: FlyingContact::InstantDeath,
            spikes_lethal: true,
        }
    }
}

/// Top-level runner configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub player: PlayerTuning,
    pub world: WorldConfig,
    pub enemies: EnemyTuning,
    pub rules: RulesConfig,
    pub bindings: KeyBindings,
}

impl RunnerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RunnerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load config from `LEDGEBREAK_CONFIG` or `config/ledgebreak.toml`.
    /// Falls back to defaults if the file is missing or invalid.
    pub fn load() -> Self {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        match Self::from_path(&path) {
            Ok(cfg) => cfg,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                RunnerConfig::default()
            },
            Err(e) => {
                tracing::warn!("Failed to load {path}: {e}, using defaults");
                RunnerConfig::default()
            },
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.player;
        let w = &self.world;
        let e = &self.enemies;
        positive("player.width", p.width)?;
        positive("player.height", p.height)?;
        positive("player.max_speed", p.max_speed)?;
        positive("player.attack_range", p.attack_range)?;
        non_negative("player.gravity", p.gravity)?;
        non_negative("player.dash_distance", p.dash_distance)?;
        if !(0.0..=1.0).contains(&p.friction) {
            return Err(ConfigError::Invalid {
                field: "player.friction",
                reason: "must be within 0..=1",
            });
        }
        if p.dash_frames == 0 {
            return Err(ConfigError::Invalid {
                field: "player.dash_frames",
                reason: "must be at least 1",
            });
        }
        if p.attack_frames == 0 {
            return Err(ConfigError::Invalid {
                field: "player.attack_frames",
                reason: "must be at least 1",
            });
        }
        positive("world.tick_rate_hz", w.tick_rate_hz)?;
        positive("world.viewport_height", w.viewport_height)?;
        if w.viewport_width <= p.width {
            return Err(ConfigError::Invalid {
                field: "world.viewport_width",
                reason: "must be wider than the player",
            });
        }
        if w.ground_y <= p.height || w.ground_y > w.viewport_height {
            return Err(ConfigError::Invalid {
                field: "world.ground_y",
                reason: "must leave room for the player and stay inside the viewport",
            });
        }
        if w.transition_x > w.viewport_width - p.width {
            return Err(ConfigError::Invalid {
                field: "world.transition_x",
                reason: "must be reachable by the player",
            });
        }
        if w.spawn_interval_frames == 0 {
            return Err(ConfigError::Invalid {
                field: "world.spawn_interval_frames",
                reason: "must be at least 1",
            });
        }
        non_negative("world.land_tolerance", w.land_tolerance)?;
        non_negative("world.underside_tolerance", w.underside_tolerance)?;
        if e.health < 1 {
            return Err(ConfigError::Invalid {
                field: "enemies.health",
                reason: "must be at least 1",
            });
        }
        positive("enemies.ground_enemy_size", e.ground_enemy_size)?;
        positive("enemies.flying_size", e.flying_size)?;
        positive("enemies.spike_size", e.spike_size)?;
        positive("enemies.platform_height", e.platform_height)?;
        self.bindings.validate()?;
        Ok(())
    }
}

fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must be a positive finite number",
        })
    }
}

fn non_negative(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must be a non-negative finite number",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(RunnerConfig::default().validate().is_ok());
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let shipped = include_str!("../../../../config/ledgebreak.toml");
        let cfg = RunnerConfig::from_toml_str(shipped).unwrap();
        assert_eq!(cfg, RunnerConfig::default());
    }

    #[test]
    fn transition_lock_is_sixty_frames() {
        assert_eq!(WorldConfig::default().transition_lock_frames(), 60);
    }

    #[test]
    fn dash_speed_covers_distance_in_duration() {
        let p = PlayerTuning::default();
        assert_eq!(p.dash_speed() * p.dash_frames as f32, p.dash_distance);
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let cfg = RunnerConfig::from_toml_str(
            r#"
            [player]
            jump_power = 20.0

            [rules]
            dash_recovery = "cooldown"
            flying_contact = "bounce"

            [bindings]
            jump = ["k"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.player.jump_power, 20.0);
        assert_eq!(cfg.player.gravity, 0.8, "Unnamed keys keep defaults");
        assert_eq!(cfg.rules.dash_recovery, DashRecovery::Cooldown);
        assert_eq!(cfg.rules.flying_contact, FlyingContact::Bounce);
        assert!(cfg.rules.spikes_lethal);
        assert_eq!(cfg.bindings.jump, vec!["k".to_string()]);
        assert_eq!(cfg.world, WorldConfig::default());
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(RunnerConfig::from_toml_str("").unwrap(), RunnerConfig::default());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = RunnerConfig::from_toml_str("[player\njump_power = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn out_of_range_values_rejected() {
        let err = RunnerConfig::from_toml_str("[player]\nfriction = 1.5\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "player.friction",
                ..
            }
        ));

        let err = RunnerConfig::from_toml_str("[player]\ndash_frames = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "player.dash_frames",
                ..
            }
        ));

        let err = RunnerConfig::from_toml_str("[world]\ntransition_x = 1250.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "world.transition_x",
                ..
            }
        ));
    }

    #[test]
    fn empty_binding_list_rejected() {
        let err = RunnerConfig::from_toml_str("[bindings]\ndash = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Bindings(_)), "got {err:?}");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = RunnerConfig::from_path("/nonexistent/ledgebreak.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
