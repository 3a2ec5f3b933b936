use serde::{Deserialize, Serialize};

/// Fixed simulation rate. Every timer in the simulation counts frames at this rate.
pub const TICK_RATE_HZ: f32 = 60.0;

/// Convert a wall-clock duration into whole frames, rounding up so a window
/// never ends early.
pub fn frames_from_millis(ms: u32, tick_rate_hz: f32) -> u32 {
    if ms == 0 || tick_rate_hz <= 0.0 {
        return 0;
    }
    (ms as f32 * tick_rate_hz / 1000.0).ceil() as u32
}

/// Convert a frame count to seconds at the given rate.
pub fn frames_to_secs(frames: u64, tick_rate_hz: f32) -> f32 {
    if tick_rate_hz <= 0.0 {
        return 0.0;
    }
    frames as f32 / tick_rate_hz
}

/// A frame-counted timer that runs down to zero and stays there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub const fn idle() -> Self {
        Self { remaining: 0 }
    }

    pub const fn started(frames: u32) -> Self {
        Self { remaining: frames }
    }

    pub fn start(&mut self, frames: u32) {
        self.remaining = frames;
    }

    pub fn clear(&mut self) {
        self.remaining = 0;
    }

    /// Advance one frame. Returns true on the frame the timer reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    pub fn is_running(&self) -> bool {
        self.remaining > 0
    }

    pub fn is_ready(&self) -> bool {
        self.remaining == 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}
