use std::str::FromStr;

use ledgebreak_core::game_trait::GameConfig;
use ledgebreak_platformer::config::{CONFIG_ENV, ConfigError, RunnerConfig};

pub const LEVEL_ENV: &str = "LEDGEBREAK_LEVEL";
pub const SEED_ENV: &str = "LEDGEBREAK_SEED";
pub const FRAMES_ENV: &str = "LEDGEBREAK_FRAMES";
pub const HUD_EVERY_ENV: &str = "LEDGEBREAK_HUD_EVERY";
pub const LOG_FORMAT_ENV: &str = "LEDGEBREAK_LOG_FORMAT";

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid value {value:?} for {name}")]
    BadEnv { name: &'static str, value: String },
}

/// Driver settings, all read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub session: GameConfig,
    /// Hard stop for sessions that never finish.
    pub max_frames: u64,
    /// HUD line cadence in frames. Zero disables periodic lines.
    pub hud_every: u64,
    pub json_logs: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            session: GameConfig::default(),
            max_frames: 60 * 60 * 5,
            hud_every: 60,
            json_logs: false,
        }
    }
}

impl RunSettings {
    pub fn from_env() -> Result<Self, RunError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any name→value lookup. Unset names keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RunError> {
        let defaults = Self::default();
        Ok(Self {
            session: GameConfig {
                start_level: parse_or(&lookup, LEVEL_ENV, defaults.session.start_level)?,
                seed: parse_or(&lookup, SEED_ENV, defaults.session.seed)?,
            },
            max_frames: parse_or(&lookup, FRAMES_ENV, defaults.max_frames)?,
            hud_every: parse_or(&lookup, HUD_EVERY_ENV, defaults.hud_every)?,
            json_logs: lookup(LOG_FORMAT_ENV).is_some_and(|v| v.eq_ignore_ascii_case("json")),
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, RunError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| RunError::BadEnv { name, value }),
    }
}

/// An explicitly named config file must load. Without one the default path
/// is tried and defaults fill in for a missing or broken file.
pub fn load_runner_config() -> Result<RunnerConfig, RunError> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => Ok(RunnerConfig::from_path(path)?),
        Err(_) => Ok(RunnerConfig::load()),
    }
}
