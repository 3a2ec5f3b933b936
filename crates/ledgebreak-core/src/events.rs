use serde::{Deserialize, Serialize};

/// Direction an attack is aimed. Up/down input overrides the facing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackDirection {
    Right,
    Left,
    Up,
    Down,
}

/// What killed the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    Spike,
    Enemy,
    FlyingEnemy,
    WhiteEnemy,
}

/// Ability and movement cues for the visual layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    JumpTriggered,
    DoubleJumpTriggered,
    /// `direction` is -1 or +1.
    DashStarted {
        direction: i8,
    },
    DashFinished,
    AttackStarted {
        direction: AttackDirection,
    },
    Landed,
    /// Knockback from touching a flying enemy.
    KnockedBack {
        vx: f32,
        vy: f32,
    },
}

/// Named audio triggers. Volume and mute policy live in the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    Jump,
    DoubleJump,
    Attack,
    Kill,
}

/// Session state changes for screen and modal management.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    EnteredScreen { level: u8, screen: u8 },
    ScreenCleared { level: u8, screen: u8 },
    Died { cause: DeathCause },
    LevelComplete { time_survived_secs: f32 },
    GameOver,
    Paused,
    Resumed,
}

/// Everything a frame can emit. Consumers drain the list returned by `update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Player(PlayerEvent),
    Sound(SoundCue),
    Session(SessionEvent),
}

impl From<PlayerEvent> for GameEvent {
    fn from(e: PlayerEvent) -> Self {
        GameEvent::Player(e)
    }
}

impl From<SoundCue> for GameEvent {
    fn from(c: SoundCue) -> Self {
        GameEvent::Sound(c)
    }
}

impl From<SessionEvent> for GameEvent {
    fn from(e: SessionEvent) -> Self {
        GameEvent::Session(e)
    }
}

impl GameEvent {
    pub fn is_sound(&self, cue: SoundCue) -> bool {
        matches!(self, GameEvent::Sound(c) if *c == cue)
    }

    pub fn as_session(&self) -> Option<&SessionEvent> {
        match self {
            GameEvent::Session(e) => Some(e),
            _ => None,
        }
    }
}
