use ledgebreak_platformer::entities::EntityKind;
use ledgebreak_platformer::{RenderSink, RunnerState};

/// Text stand-in for a renderer: logs a status line every `every` frames and
/// whenever the live screen changes.
#[derive(Debug)]
pub struct HudSink {
    every: u64,
    last_screen: Option<(u8, u8)>,
    last_frame: Option<u64>,
    lines: u64,
}

impl HudSink {
    pub fn new(every: u64) -> Self {
        Self {
            every,
            last_screen: None,
            last_frame: None,
            lines: 0,
        }
    }

    pub fn lines_written(&self) -> u64 {
        self.lines
    }

    fn due(&self, state: &RunnerState) -> bool {
        let frame = state.clock.frame();
        if self.last_frame == Some(frame) {
            return false;
        }
        self.last_screen != Some((state.level(), state.screen()))
            || (self.every > 0 && frame % self.every == 0)
    }
}

impl RenderSink for HudSink {
    fn draw(&mut self, state: &RunnerState) {
        if !self.due(state) {
            return;
        }
        let p = &state.player;
        let e = &state.entities;
        tracing::info!(
            frame = state.clock.frame(),
            level = state.level(),
            screen = state.screen(),
            x = p.x,
            y = p.y,
            dashing = p.is_dashing,
            trail = p.dash_trail.is_running(),
            attacking = p.is_attacking,
            enemies = e.count(EntityKind::Enemy) + e.count(EntityKind::WhiteEnemy),
            flying = e.count(EntityKind::FlyingEnemy),
            spikes = e.count(EntityKind::Spike),
            "hud"
        );
        self.last_screen = Some((state.level(), state.screen()));
        self.last_frame = Some(state.clock.frame());
        self.lines += 1;
    }
}
