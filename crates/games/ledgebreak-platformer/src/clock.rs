use serde::{Deserialize, Serialize};

use ledgebreak_core::time::{Countdown, frames_to_secs};

/// Frame-level session timers: the frame counter, the periodic spawn timer,
/// the screen-transition lock and time survived.
///
/// Player ability timers live on the player and tick inside the player update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationClock {
    frame: u64,
    spawn_elapsed: u32,
    transition_lock: Countdown,
    survived_frames: u64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames simulated since the session started. Paused frames are not counted.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Start a new simulated frame. Runs the transition lock down by one.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
        self.transition_lock.tick();
    }

    /// Suppress screen transitions for the next `frames` frames.
    pub fn lock_transitions(&mut self, frames: u32) {
        self.transition_lock.start(frames);
    }

    pub fn transitions_locked(&self) -> bool {
        self.transition_lock.is_running()
    }

    pub fn transition_lock_remaining(&self) -> u32 {
        self.transition_lock.remaining()
    }

    /// Count one playing frame toward the next periodic spawn. Returns true
    /// (and restarts the count) when `interval` frames have elapsed. The timer
    /// holds while transitions are locked.
    pub fn spawn_due(&mut self, interval: u32) -> bool {
        if self.transitions_locked() || interval == 0 {
            return false;
        }
        self.spawn_elapsed += 1;
        if self.spawn_elapsed >= interval {
            self.spawn_elapsed = 0;
            return true;
        }
        false
    }

    pub fn reset_spawn_timer(&mut self) {
        self.spawn_elapsed = 0;
    }

    pub fn spawn_elapsed(&self) -> u32 {
        self.spawn_elapsed
    }

    pub fn record_survived_frame(&mut self) {
        self.survived_frames += 1;
    }

    pub fn survived_frames(&self) -> u64 {
        self.survived_frames
    }

    pub fn time_survived_secs(&self, tick_rate_hz: f32) -> f32 {
        frames_to_secs(self.survived_frames, tick_rate_hz)
    }

    /// Back to a fresh session.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_fires_every_interval() {
        let mut clock = SimulationClock::new();
        let fired: Vec<u32> = (1..=360)
            .filter(|_| {
                clock.begin_frame();
                clock.spawn_due(120)
            })
            .collect();
        assert_eq!(fired, vec![120, 240, 360]);
    }

    #[test]
    fn reset_spawn_timer_restarts_interval() {
        let mut clock = SimulationClock::new();
        for _ in 0..100 {
            clock.spawn_due(120);
        }
        clock.reset_spawn_timer();
        for _ in 0..119 {
            assert!(!clock.spawn_due(120));
        }
        assert!(clock.spawn_due(120));
    }

    #[test]
    fn transition_lock_lasts_exact_frames() {
        let mut clock = SimulationClock::new();
        clock.lock_transitions(60);
        for frame in 1..60 {
            clock.begin_frame();
            assert!(clock.transitions_locked(), "still locked on frame {frame}");
        }
        clock.begin_frame();
        assert!(!clock.transitions_locked());
    }

    #[test]
    fn spawn_timer_holds_while_locked() {
        let mut clock = SimulationClock::new();
        clock.lock_transitions(10);
        for _ in 0..9 {
            clock.begin_frame();
            assert!(!clock.spawn_due(1));
        }
        assert_eq!(clock.spawn_elapsed(), 0);
        clock.begin_frame();
        assert!(clock.spawn_due(1));
    }

    #[test]
    fn time_survived_in_seconds() {
        let mut clock = SimulationClock::new();
        for _ in 0..90 {
            clock.record_survived_frame();
        }
        assert_eq!(clock.time_survived_secs(60.0), 1.5);
        clock.reset();
        assert_eq!(clock.survived_frames(), 0);
        assert_eq!(clock.frame(), 0);
    }
}
