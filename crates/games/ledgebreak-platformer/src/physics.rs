use serde::{Deserialize, Serialize};

use ledgebreak_core::events::{AttackDirection, GameEvent, PlayerEvent, SoundCue};
use ledgebreak_core::geometry::{Kinematic, Rect, approach};
use ledgebreak_core::input::{Action, InputSource};
use ledgebreak_core::time::Countdown;

use crate::config::{DashRecovery, PlayerTuning, RulesConfig};
use crate::entities::EntityId;

/// Logical inputs sampled once at the start of a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIntent {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub dash: bool,
    pub attack: bool,
    pub up: bool,
    pub down: bool,
}

impl PlayerIntent {
    pub fn poll(input: &dyn InputSource) -> Self {
        Self {
            left: input.is_action_down(Action::Left),
            right: input.is_action_down(Action::Right),
            jump: input.is_action_down(Action::Jump),
            dash: input.is_action_down(Action::Dash),
            attack: input.is_action_down(Action::Attack),
            up: input.is_action_down(Action::Up),
            down: input.is_action_down(Action::Down),
        }
    }

    /// -1, 0 or +1. Left wins when both directions are held.
    pub fn horizontal(&self) -> i8 {
        if self.left {
            -1
        } else if self.right {
            1
        } else {
            0
        }
    }
}

/// Kinematic and ability state of the player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerState {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub w: f32,
    pub h: f32,
    /// -1 facing left, +1 facing right.
    pub facing: i8,
    pub on_ground: bool,
    pub on_spike: bool,
    /// Grounded state at the end of the previous frame, for landing edges.
    pub was_grounded: bool,
    pub is_jumping: bool,
    pub has_double_jump: bool,
    pub has_used_double_jump: bool,
    pub coyote: Countdown,

    pub is_dashing: bool,
    pub dash_direction: i8,
    /// Frames of the current dash already travelled.
    pub dash_progress: u32,
    pub dash_target_x: f32,
    pub can_dash: bool,
    pub dash_cooldown: Countdown,

    pub is_attacking: bool,
    pub attack_frame: u32,
    pub attack_cooldown: Countdown,
    pub attack_direction: AttackDirection,
    /// Entities already hit by the current swing.
    pub struck: Vec<EntityId>,

    pub double_jump_effect: Countdown,
    /// Afterimage left behind by the last dash, drawn from start to end x.
    pub dash_trail: Countdown,
    pub dash_trail_start_x: f32,
    pub dash_trail_end_x: f32,

    pub jump_held: bool,
    pub dash_held: bool,
    pub attack_held: bool,

    /// Position before this frame's movement, used by swept collision tests.
    pub frame_start_x: f32,
    pub frame_start_y: f32,
}

impl PlayerState {
    pub fn new(spawn_x: f32, spawn_y: f32, tuning: &PlayerTuning) -> Self {
        Self {
            x: spawn_x,
            y: spawn_y,
            vx: 0.0,
            vy: 0.0,
            w: tuning.width,
            h: tuning.height,
            facing: 1,
            on_ground: false,
            on_spike: false,
            was_grounded: false,
            is_jumping: false,
            has_double_jump: true,
            has_used_double_jump: false,
            coyote: Countdown::idle(),
            is_dashing: false,
            dash_direction: 0,
            dash_progress: 0,
            dash_target_x: spawn_x,
            can_dash: true,
            dash_cooldown: Countdown::idle(),
            is_attacking: false,
            attack_frame: 0,
            attack_cooldown: Countdown::idle(),
            attack_direction: AttackDirection::Right,
            struck: Vec::new(),
            double_jump_effect: Countdown::idle(),
            dash_trail: Countdown::idle(),
            dash_trail_start_x: spawn_x,
            dash_trail_end_x: spawn_x,
            jump_held: false,
            dash_held: false,
            attack_held: false,
            frame_start_x: spawn_x,
            frame_start_y: spawn_y,
        }
    }

    /// Death respawn: a fresh player at the spawn point. Held-key flags carry
    /// over so a key still held from before the death does not fire again.
    pub fn respawn_at(&mut self, x: f32, y: f32, tuning: &PlayerTuning) {
        let (jump_held, dash_held, attack_held) = (self.jump_held, self.dash_held, self.attack_held);
        *self = PlayerState::new(x, y, tuning);
        self.jump_held = jump_held;
        self.dash_held = dash_held;
        self.attack_held = attack_held;
    }

    /// Screen advance: move to the new spawn point, stop, and cancel any dash
    /// in flight. Jump and attack state carry over.
    pub fn enter_screen_at(&mut self, x: f32, y: f32, tuning: &PlayerTuning, rules: &RulesConfig) {
        self.x = x;
        self.y = y;
        self.vx = 0.0;
        self.vy = 0.0;
        self.frame_start_x = x;
        self.frame_start_y = y;
        self.on_ground = false;
        self.on_spike = false;
        self.was_grounded = false;
        if self.is_dashing {
            self.is_dashing = false;
            self.dash_progress = 0;
            self.dash_cooldown.start(tuning.dash_cooldown_frames);
            self.dash_trail.clear();
            if rules.dash_recovery == DashRecovery::UntilLanding {
                self.can_dash = false;
            }
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.on_ground || self.on_spike
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Square hitbox of side `range` beside the player in the attack direction.
    pub fn attack_hitbox(&self, range: f32) -> Rect {
        let (cx, cy) = self.center();
        let (x, y) = match self.attack_direction {
            AttackDirection::Right => (cx + self.w / 2.0, cy - range / 2.0),
            AttackDirection::Left => (cx - self.w / 2.0 - range, cy - range / 2.0),
            AttackDirection::Up => (cx - range / 2.0, cy - self.h / 2.0 - range),
            AttackDirection::Down => (cx - range / 2.0, cy + self.h / 2.0),
        };
        Rect::new(x, y, range, range)
    }

    /// Whether an active attack reaches `bounds` this frame.
    pub fn check_attack_collision(&self, bounds: &Rect, range: f32) -> bool {
        self.is_attacking && self.attack_hitbox(range).intersects(bounds)
    }

    /// Whether a double jump would fire on a fresh jump press right now.
    pub fn double_jump_ready(&self) -> bool {
        self.has_double_jump && !self.has_used_double_jump
    }
}

impl Kinematic for PlayerState {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    fn velocity(&self) -> (f32, f32) {
        (self.vx, self.vy)
    }
}

/// Advance the player one frame: abilities, timers, jump, gravity, movement
/// and integration. World contact is resolved afterwards by the collision pass.
pub fn update_player(
    player: &mut PlayerState,
    intent: &PlayerIntent,
    tuning: &PlayerTuning,
    rules: &RulesConfig,
    viewport_width: f32,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    player.frame_start_x = player.x;
    player.frame_start_y = player.y;

    let dash_pressed = intent.dash && !player.dash_held;
    player.dash_held = intent.dash;
    let attack_pressed = intent.attack && !player.attack_held;
    player.attack_held = intent.attack;

    if dash_pressed && !player.is_dashing && player.can_dash && player.dash_cooldown.is_ready() {
        start_dash(player, intent, tuning, rules, viewport_width);
        events.push(
            PlayerEvent::DashStarted {
                direction: player.dash_direction,
            }
            .into(),
        );
    }

    if attack_pressed && !player.is_attacking && player.attack_cooldown.is_ready() {
        player.is_attacking = true;
        player.attack_frame = 0;
        player.struck.clear();
        player.attack_direction = if intent.up {
            AttackDirection::Up
        } else if intent.down {
            AttackDirection::Down
        } else if player.facing < 0 {
            AttackDirection::Left
        } else {
            AttackDirection::Right
        };
        events.push(
            PlayerEvent::AttackStarted {
                direction: player.attack_direction,
            }
            .into(),
        );
        events.push(SoundCue::Attack.into());
    }

    let dashed_this_frame = player.is_dashing;
    if player.is_dashing {
        player.x = approach(player.x, player.dash_target_x, tuning.dash_speed());
        player.dash_progress += 1;
        if player.dash_progress >= tuning.dash_frames {
            player.is_dashing = false;
            player.dash_trail_end_x = player.x;
            player.dash_cooldown.start(tuning.dash_cooldown_frames);
            events.push(PlayerEvent::DashFinished.into());
        }
    }
    player.dash_cooldown.tick();

    if player.is_attacking {
        player.attack_frame += 1;
        if player.attack_frame >= tuning.attack_frames {
            player.is_attacking = false;
            player.attack_cooldown.start(tuning.attack_cooldown_frames);
        }
    } else {
        player.attack_cooldown.tick();
    }

    let grounded = player.is_grounded();
    if grounded {
        player.coyote.start(tuning.coyote_frames);
        player.has_double_jump = true;
        player.has_used_double_jump = false;
    } else {
        player.coyote.tick();
    }

    if dashed_this_frame {
        // The dash owns the position this frame.
        player.jump_held = intent.jump;
        clamp_to_viewport(player, viewport_width);
        player.double_jump_effect.tick();
        player.dash_trail.tick();
        return events;
    }

    let jump_pressed = intent.jump && !player.jump_held;
    if jump_pressed {
        if grounded || player.coyote.is_running() {
            player.vy = -tuning.jump_power;
            player.on_ground = false;
            player.on_spike = false;
            player.coyote.clear();
            player.is_jumping = true;
            events.push(PlayerEvent::JumpTriggered.into());
            events.push(SoundCue::Jump.into());
        } else if player.double_jump_ready() {
            player.vy = -tuning.double_jump_power;
            player.has_used_double_jump = true;
            player.is_jumping = true;
            player.double_jump_effect.start(tuning.double_jump_effect_frames);
            events.push(PlayerEvent::DoubleJumpTriggered.into());
            events.push(SoundCue::DoubleJump.into());
        }
    }
    player.jump_held = intent.jump;

    if !player.is_grounded() {
        player.vy += tuning.gravity;
    }

    match intent.horizontal() {
        -1 => {
            player.vx = (player.vx - tuning.acceleration).max(-tuning.max_speed);
            player.facing = -1;
        },
        1 => {
            player.vx = (player.vx + tuning.acceleration).min(tuning.max_speed);
            player.facing = 1;
        },
        _ => {
            player.vx *= tuning.friction;
            if player.vx.abs() < tuning.stop_threshold {
                player.vx = 0.0;
            }
        },
    }

    player.x += player.vx;
    player.y += player.vy;

    clamp_to_viewport(player, viewport_width);
    player.double_jump_effect.tick();
    player.dash_trail.tick();
    events
}

fn start_dash(
    player: &mut PlayerState,
    intent: &PlayerIntent,
    tuning: &PlayerTuning,
    rules: &RulesConfig,
    viewport_width: f32,
) {
    let direction = match intent.horizontal() {
        0 => player.facing,
        d => d,
    };
    let max_x = (viewport_width - player.w).max(0.0);
    player.is_dashing = true;
    player.dash_direction = direction;
    player.dash_progress = 0;
    player.dash_target_x = (player.x + direction as f32 * tuning.dash_distance).clamp(0.0, max_x);
    player.dash_trail_start_x = player.x;
    player.dash_trail_end_x = player.dash_target_x;
    player.dash_trail.start(tuning.dash_trail_frames);
    player.facing = direction;
    player.vx = 0.0;
    player.vy = 0.0;
    if rules.dash_recovery == DashRecovery::UntilLanding {
        player.can_dash = false;
    }
}

/// Keep the player inside `[0, viewport_width - w]`, zeroing vx on contact.
pub fn clamp_to_viewport(player: &mut PlayerState, viewport_width: f32) {
    let max_x = (viewport_width - player.w).max(0.0);
    if player.x < 0.0 {
        player.x = 0.0;
        player.vx = 0.0;
    } else if player.x > max_x {
        player.x = max_x;
        player.vx = 0.0;
    }
}
