//! Per-frame world contact for the player.
//!
//! Runs after the player and every entity have moved. Fixed order: ground,
//! platforms, spikes, yellow enemies, flying enemies, white enemies, attack
//! hits, then the landing edge. A lethal contact stops the pass immediately,
//! so at most one death is reported per frame.

use ledgebreak_core::events::{AttackDirection, DeathCause, GameEvent, PlayerEvent, SoundCue};
use ledgebreak_core::geometry::{Kinematic, Rect};

use crate::config::{DashRecovery, FlyingContact, RunnerConfig};
use crate::entities::EntityRoster;
use crate::physics::{PlayerState, clamp_to_viewport};

/// Floating-point slack for "exactly touching" tests.
const CONTACT_EPSILON: f32 = 0.01;

/// How the player met a solid box this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    None,
    /// Landed on or resting on the top face.
    Top,
    /// Rose into the bottom face.
    Underside,
    /// Blocked on the left or right face.
    Side,
}

#[derive(Debug, Default)]
pub struct CollisionOutcome {
    pub death: Option<DeathCause>,
    pub events: Vec<GameEvent>,
}

/// Resolve the player against the world for one frame.
pub fn resolve(
    player: &mut PlayerState,
    roster: &mut EntityRoster,
    config: &RunnerConfig,
) -> CollisionOutcome {
    let mut out = CollisionOutcome::default();
    let world = &config.world;
    let mut landed = false;

    player.on_spike = false;
    if player.y + player.h >= world.ground_y {
        player.y = world.ground_y - player.h;
        player.vy = 0.0;
        player.on_ground = true;
        landed = true;
    } else {
        player.on_ground = false;
    }

    for platform in &roster.platforms {
        if resolve_solid(player, &platform.bounds(), config, &mut landed) == Contact::Top {
            player.on_ground = true;
        }
    }
    clamp_to_viewport(player, world.viewport_width);

    for spike in &roster.spikes {
        let contact = resolve_solid(player, &spike.bounds(), config, &mut landed);
        if contact == Contact::None {
            continue;
        }
        if config.rules.spikes_lethal {
            out.death = Some(DeathCause::Spike);
            return out;
        }
        if contact == Contact::Top {
            player.on_spike = true;
        }
    }
    clamp_to_viewport(player, world.viewport_width);

    if roster
        .enemies
        .iter()
        .any(|e| player.bounds().intersects(&e.bounds()))
    {
        out.death = Some(DeathCause::Enemy);
        return out;
    }

    for flyer in &roster.flying_enemies {
        let fb = flyer.bounds();
        if !player.bounds().intersects(&fb) {
            continue;
        }
        let away: f32 = if player.bounds().center_x() < fb.center_x() {
            -1.0
        } else {
            1.0
        };
        player.vx = away * config.enemies.knockback;
        player.vy = -config.enemies.knockback_lift;
        player.x = if away < 0.0 {
            fb.x - player.w
        } else {
            fb.right()
        };
        clamp_to_viewport(player, world.viewport_width);
        out.events.push(
            PlayerEvent::KnockedBack {
                vx: player.vx,
                vy: player.vy,
            }
            .into(),
        );
        if config.rules.flying_contact == FlyingContact::InstantDeath {
            out.death = Some(DeathCause::FlyingEnemy);
            return out;
        }
    }

    if roster
        .white_enemies
        .iter()
        .any(|e| player.bounds().intersects(&e.bounds()))
    {
        out.death = Some(DeathCause::WhiteEnemy);
        return out;
    }

    if player.is_attacking {
        resolve_attack(player, roster, config, &mut out.events);
    }

    let grounded = player.is_grounded();
    if grounded && !player.was_grounded {
        player.is_jumping = false;
        if config.rules.dash_recovery == DashRecovery::UntilLanding {
            player.can_dash = true;
        }
        out.events.push(PlayerEvent::Landed.into());
    }
    player.was_grounded = grounded;

    out
}

/// Classify and resolve contact with one solid box. At most one top landing
/// snaps Y per frame; side blocks always apply.
fn resolve_solid(
    player: &mut PlayerState,
    solid: &Rect,
    config: &RunnerConfig,
    landed: &mut bool,
) -> Contact {
    let world = &config.world;
    let bounds = player.bounds();
    let bottom = bounds.bottom();

    // Standing exactly on the top face: no penetration, so no overlap, but supported.
    if player.vy >= 0.0
        && (bottom - solid.y).abs() <= CONTACT_EPSILON
        && bounds.overlaps_horizontally(solid)
    {
        if !*landed {
            player.y = solid.y - player.h;
            player.vy = 0.0;
            *landed = true;
        }
        return Contact::Top;
    }

    if !bounds.intersects(solid) {
        return Contact::None;
    }

    let start_top = player.frame_start_y;
    let start_bottom = player.frame_start_y + player.h;
    let falling = player.vy > 0.0;
    let top_above = player.y < solid.y;
    let near_top =
        bottom - solid.y < world.land_tolerance || start_bottom <= solid.y + CONTACT_EPSILON;
    // Once the ground or an earlier solid has taken this frame's landing, a
    // box still overlapped (e.g. one resting on the ground) resolves sideways.
    if !*landed && falling && top_above && near_top {
        player.y = solid.y - player.h;
        player.vy = 0.0;
        *landed = true;
        return Contact::Top;
    }

    if player.vy < 0.0 && start_top >= solid.bottom() - world.underside_tolerance {
        player.y = solid.bottom();
        player.vy = 0.0;
        return Contact::Underside;
    }

    let start_left = player.frame_start_x;
    let start_right = player.frame_start_x + player.w;
    let from_left = if start_right <= solid.x + CONTACT_EPSILON {
        true
    } else if start_left >= solid.right() - CONTACT_EPSILON {
        false
    } else {
        bounds.center_x() < solid.center_x()
    };
    player.x = if from_left {
        solid.x - player.w
    } else {
        solid.right()
    };
    player.vx = 0.0;
    Contact::Side
}

fn resolve_attack(
    player: &mut PlayerState,
    roster: &mut EntityRoster,
    config: &RunnerConfig,
    events: &mut Vec<GameEvent>,
) {
    let hitbox = player.attack_hitbox(config.player.attack_range);
    let mut hit_any = false;

    for enemies in [&mut roster.enemies, &mut roster.white_enemies] {
        for enemy in enemies.iter_mut() {
            if player.struck.contains(&enemy.id) || !hitbox.intersects(&enemy.bounds()) {
                continue;
            }
            enemy.take_damage(1);
            player.struck.push(enemy.id);
            events.push(SoundCue::Kill.into());
            hit_any = true;
        }
        enemies.retain(|e| !e.is_dead());
    }

    let before = roster.flying_enemies.len();
    roster
        .flying_enemies
        .retain(|f| !hitbox.intersects(&f.bounds()));
    let downed = before - roster.flying_enemies.len();
    for _ in 0..downed {
        events.push(SoundCue::Kill.into());
    }
    hit_any |= downed > 0;

    if hit_any && player.attack_direction == AttackDirection::Down {
        player.vy = -config.player.jump_power;
        player.on_ground = false;
        player.on_spike = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnemyTuning, RulesConfig};
    use crate::physics::{PlayerIntent, update_player};

    fn config() -> RunnerConfig {
        RunnerConfig::default()
    }

    fn player_at(x: f32, y: f32) -> PlayerState {
        let cfg = config();
        PlayerState::new(x, y, &cfg.player)
    }

    /// Integrate one idle frame without collision, then resolve.
    fn frame(p: &mut PlayerState, roster: &mut EntityRoster, cfg: &RunnerConfig) -> CollisionOutcome {
        update_player(
            p,
            &PlayerIntent::default(),
            &cfg.player,
            &cfg.rules,
            cfg.world.viewport_width,
        );
        resolve(p, roster, cfg)
    }

    // ================================================================
    // Ground and platforms
    // ================================================================

    #[test]
    fn ground_clamp_snaps_and_grounds() {
        let cfg = config();
        let mut p = player_at(100.0, 600.0);
        p.vy = 10.0;
        let out = resolve(&mut p, &mut EntityRoster::new(), &cfg);
        assert_eq!(p.y, cfg.world.ground_y - p.h);
        assert_eq!(p.vy, 0.0);
        assert!(p.on_ground);
        assert!(out.events.contains(&PlayerEvent::Landed.into()));
    }

    #[test]
    fn resting_on_ground_stays_grounded_every_frame() {
        let cfg = config();
        let mut roster = EntityRoster::new();
        let mut p = player_at(100.0, cfg.world.ground_y - 75.0);
        let mut landings = 0;
        for _ in 0..30 {
            let out = frame(&mut p, &mut roster, &cfg);
            assert!(p.on_ground, "Resting player must not flicker airborne");
            assert!(p.y <= cfg.world.ground_y - p.h);
            landings += out
                .events
                .iter()
                .filter(|e| **e == GameEvent::from(PlayerEvent::Landed))
                .count();
        }
        assert_eq!(landings, 1, "Landed fires once per ground contact");
    }

    #[test]
    fn falling_onto_platform_lands_on_top() {
        let cfg = config();
        let mut roster = EntityRoster::new();
        roster.spawn_platform(100.0, 500.0, 100.0, 20.0, 0.0);
        let mut p = player_at(110.0, 500.0 - 75.0 - 10.0);
        p.vy = 20.0;
        let out = frame(&mut p, &mut roster, &cfg);
        assert_eq!(p.y, 500.0 - p.h, "Fast fall still lands (swept check)");
        assert_eq!(p.vy, 0.0);
        assert!(p.on_ground);
        assert!(out.death.is_none());
    }

    #[test]
    fn ground_landing_pushes_out_of_low_platform_sideways() {
        let cfg = config();
        let mut roster = EntityRoster::new();
        let top = cfg.world.ground_y - 20.0;
        roster.spawn_platform(100.0, top, 100.0, 20.0, 0.0);
        let mut p = player_at(110.0, top - 75.0 - 15.0);
        p.y += 40.0;
        p.vy = 40.0;
        resolve(&mut p, &mut roster, &cfg);
        assert_eq!(p.y, cfg.world.ground_y - p.h, "Ground clamp keeps the landing");
        assert!(p.on_ground);
        assert_eq!(p.x, 100.0 - p.w, "Overlapped platform blocks from the side");
        assert_eq!(p.vx, 0.0);
    }

    #[test]
    fn resting_on_platform_is_stable() {
        let cfg = config();
        let mut roster = EntityRoster::new();
        roster.spawn_platform(100.0, 500.0, 100.0, 20.0, 0.0);
        let mut p = player_at(110.0, 500.0 - 75.0);
        for _ in 0..10 {
            frame(&mut p, &mut roster, &cfg);
        }
        assert!(p.on_ground);
        assert_eq!(p.y, 500.0 - p.h);
    }

    #[test]
    fn rising_into_underside_is_blocked() {
        let cfg = config();
        let mut roster = EntityRoster::new();
        roster.spawn_platform(100.0, 400.0, 100.0, 20.0, 0.0);
        let mut p = player_at(110.0, 423.0);
        p.frame_start_x = 110.0;
        p.frame_start_y = 423.0;
        p.y = 410.0;
        p.vy = -13.0;
        let out = resolve(&mut p, &mut roster, &cfg);
        assert_eq!(p.y, 420.0, "Snapped to the platform bottom");
        assert_eq!(p.vy, 0.0);
        assert_eq!(p.x, 110.0, "No horizontal teleport");
        assert!(out.death.is_none());
    }

    #[test]
    fn side_approach_blocks_horizontally_only() {
        let cfg = config();
        let mut roster = EntityRoster::new();
        roster.spawn_platform(300.0, 560.0, 100.0, 60.0, 0.0);
        let mut p = player_at(235.0, cfg.world.ground_y - 75.0);
        p.on_ground = true;
        p.frame_start_x = 235.0;
        p.frame_start_y = p.y;
        p.x = 245.0;
        p.vx = 10.0;
        resolve(&mut p, &mut roster, &cfg);
        assert_eq!(p.x, 240.0);
        assert_eq!(p.vx, 0.0);
        assert_eq!(p.y, cfg.world.ground_y - p.h, "Side contact never snaps Y");
    }

    #[test]
    fn side_approach_from_right() {
        let cfg = config();
        let mut roster = EntityRoster::new();
        roster.spawn_platform(300.0, 560.0, 100.0, 60.0, 0.0);
        let mut p = player_at(405.0, cfg.world.ground_y - 75.0);
        p.frame_start_x = 405.0;
        p.frame_start_y = p.y;
        p.x = 395.0;
        p.vx = -10.0;
        resolve(&mut p, &mut roster, &cfg);
        assert_eq!(p.x, 400.0);
    }

    // ================================================================
    // Hazards
    // ================================================================

    #[test]
    fn standing_on_spike_is_lethal() {
        let cfg = config();
        let mut roster = EntityRoster::new();
        roster.spawn_spike(100.0, 620.0, 30.0, 0.0);
        let mut p = player_at(90.0, 620.0 - 75.0);
        let out = frame(&mut p, &mut roster, &cfg);
        assert_eq!(out.death, Some(DeathCause::Spike));
    }

    #[test]
    fn spike_side_contact_is_lethal() {
        let cfg = config();
        let mut roster = EntityRoster::new();
        roster.spawn_spike(200.0, 620.0, 30.0, -1.5);
        let mut p = player_at(150.0, cfg.world.ground_y - 75.0);
        p.frame_start_x = 150.0;
        p.frame_start_y = p.y;
        let out = resolve(&mut p, &mut roster, &cfg);
        assert_eq!(out.death, Some(DeathCause::Spike));
    }

    #[test]
    fn non_lethal_spikes_act_as_ground() {
        let cfg = RunnerConfig {
            rules: RulesConfig {
                spikes_lethal: false,
                ..RulesConfig::default()
            },
            ..config()
        };
        let mut roster = EntityRoster::new();
        roster.spawn_spike(100.0, 620.0, 30.0, 0.0);
        let mut p = player_at(90.0, 620.0 - 75.0);
        let out = frame(&mut p, &mut roster, &cfg);
        assert!(out.death.is_none());
        assert!(p.on_spike);
        assert!(!p.on_ground);
        assert!(p.is_grounded());
    }

    #[test]
    fn enemy_and_white_enemy_contact_is_lethal() {
        let cfg = config();
        let t = EnemyTuning::default();

        let mut roster = EntityRoster::new();
        roster.spawn_enemy(120.0, 610.0, 0.0, &t);
        let mut p = player_at(100.0, cfg.world.ground_y - 75.0);
        assert_eq!(resolve(&mut p, &mut roster, &cfg).death, Some(DeathCause::Enemy));

        let mut roster = EntityRoster::new();
        roster.spawn_white_enemy(120.0, 610.0, 0.0, &t);
        let mut p = player_at(100.0, cfg.world.ground_y - 75.0);
        assert_eq!(
            resolve(&mut p, &mut roster, &cfg).death,
            Some(DeathCause::WhiteEnemy)
        );
    }

    #[test]
    fn flying_contact_knocks_back_then_kills() {
        let cfg = config();
        let t = EnemyTuning::default();
        let mut roster = EntityRoster::new();
        roster.spawn_flying_enemy(140.0, 560.0, 0.0, &t);
        let mut p = player_at(100.0, cfg.world.ground_y - 75.0);
        let out = resolve(&mut p, &mut roster, &cfg);
        assert_eq!(out.death, Some(DeathCause::FlyingEnemy));
        assert!(out.events.contains(
            &PlayerEvent::KnockedBack {
                vx: -6.0,
                vy: -2.0
            }
            .into()
        ));
        assert_eq!(p.x, 140.0 - p.w, "Pushed clear of the enemy");
    }

    #[test]
    fn flying_bounce_rule_survives() {
        let cfg = RunnerConfig {
            rules: RulesConfig {
                flying_contact: FlyingContact::Bounce,
                ..RulesConfig::default()
            },
            ..config()
        };
        let t = EnemyTuning::default();
        let mut roster = EntityRoster::new();
        roster.spawn_flying_enemy(80.0, 560.0, 0.0, &t);
        let mut p = player_at(100.0, cfg.world.ground_y - 75.0);
        let out = resolve(&mut p, &mut roster, &cfg);
        assert!(out.death.is_none());
        assert_eq!(p.vx, 6.0);
        assert_eq!(p.vy, -2.0);
        assert_eq!(p.x, 125.0);
    }

    #[test]
    fn one_death_per_frame_in_fixed_order() {
        let cfg = config();
        let t = EnemyTuning::default();
        let mut roster = EntityRoster::new();
        roster.spawn_white_enemy(120.0, 610.0, 0.0, &t);
        roster.spawn_enemy(110.0, 610.0, 0.0, &t);
        roster.spawn_flying_enemy(100.0, 590.0, 0.0, &t);
        let mut p = player_at(100.0, cfg.world.ground_y - 75.0);
        let out = resolve(&mut p, &mut roster, &cfg);
        assert_eq!(out.death, Some(DeathCause::Enemy), "Yellow enemies resolve first");
        assert!(out.events.is_empty(), "Nothing after the death is processed");
    }

    // ================================================================
    // Attacks
    // ================================================================

    fn attacking_player(direction: AttackDirection) -> PlayerState {
        let mut p = player_at(400.0, 300.0);
        p.frame_start_y = 300.0;
        p.is_attacking = true;
        p.attack_direction = direction;
        p
    }

    #[test]
    fn attack_kills_enemy_in_hitbox() {
        let cfg = config();
        let t = EnemyTuning::default();
        let mut roster = EntityRoster::new();
        roster.spawn_enemy(470.0, 320.0, 0.0, &t);
        let mut p = attacking_player(AttackDirection::Right);
        let out = resolve(&mut p, &mut roster, &cfg);
        assert!(out.death.is_none());
        assert!(roster.enemies.is_empty(), "Removed the frame health hits zero");
        assert!(out.events.contains(&SoundCue::Kill.into()));
    }

    #[test]
    fn tougher_enemy_needs_one_swing_per_health() {
        let cfg = config();
        let t = EnemyTuning {
            health: 2,
            ..EnemyTuning::default()
        };
        let mut roster = EntityRoster::new();
        roster.spawn_white_enemy(470.0, 320.0, 0.0, &t);
        let mut p = attacking_player(AttackDirection::Right);
        resolve(&mut p, &mut roster, &cfg);
        resolve(&mut p, &mut roster, &cfg);
        assert_eq!(
            roster.white_enemies[0].health, 1,
            "A single swing hits each enemy once"
        );

        p.struck.clear();
        resolve(&mut p, &mut roster, &cfg);
        assert!(roster.white_enemies.is_empty());
    }

    #[test]
    fn attack_removes_flying_enemy() {
        let cfg = config();
        let t = EnemyTuning::default();
        let mut roster = EntityRoster::new();
        roster.spawn_flying_enemy(410.0, 240.0, 0.0, &t);
        let mut p = attacking_player(AttackDirection::Up);
        let out = resolve(&mut p, &mut roster, &cfg);
        assert!(roster.flying_enemies.is_empty());
        assert!(out.events.contains(&SoundCue::Kill.into()));
        assert_eq!(p.vy, 0.0, "Only downward hits pogo");
    }

    #[test]
    fn downward_hit_pogos() {
        let cfg = config();
        let t = EnemyTuning::default();
        let mut roster = EntityRoster::new();
        roster.spawn_flying_enemy(415.0, 380.0, 0.0, &t);
        let mut p = attacking_player(AttackDirection::Down);
        p.vy = 5.0;
        resolve(&mut p, &mut roster, &cfg);
        assert_eq!(p.vy, -cfg.player.jump_power);
    }

    #[test]
    fn whiffed_downward_attack_does_not_pogo() {
        let cfg = config();
        let mut roster = EntityRoster::new();
        let mut p = attacking_player(AttackDirection::Down);
        p.vy = 5.0;
        resolve(&mut p, &mut roster, &cfg);
        assert_eq!(p.vy, 5.0);
    }

    // ================================================================
    // Landing edge
    // ================================================================

    #[test]
    fn landing_edge_rearms_dash_once() {
        let cfg = config();
        let mut roster = EntityRoster::new();
        let mut p = player_at(100.0, 500.0);
        p.can_dash = false;
        p.vy = 20.0;
        let mut rearms = 0;
        for _ in 0..20 {
            let was = p.can_dash;
            frame(&mut p, &mut roster, &cfg);
            if p.can_dash && !was {
                rearms += 1;
            }
            p.can_dash = false;
        }
        assert_eq!(rearms, 1, "canDash resets only on the airborne→grounded edge");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn side_approach_never_snaps_y(
                start_x in 150.0f32..235.0,
                vx in 1.0f32..12.0,
                platform_top in 560.0f32..640.0,
            ) {
                let cfg = config();
                let mut roster = EntityRoster::new();
                roster.spawn_platform(300.0, platform_top, 100.0, 200.0, 0.0);
                let ground_y = cfg.world.ground_y - 75.0;
                let mut p = player_at(start_x, ground_y);
                p.on_ground = true;
                p.frame_start_x = start_x;
                p.frame_start_y = ground_y;
                p.x = (start_x + vx).min(299.0);
                p.vx = vx;
                resolve(&mut p, &mut roster, &cfg);
                prop_assert_eq!(p.y, ground_y);
                prop_assert!(p.x <= 240.0 + 1e-3 || p.x + p.w <= 300.0);
            }

            #[test]
            fn grounded_player_never_below_ground(
                start_y in 0.0f32..640.0,
                vy in -20.0f32..40.0,
            ) {
                let cfg = config();
                let mut roster = EntityRoster::new();
                let mut p = player_at(600.0, start_y);
                p.vy = vy;
                frame(&mut p, &mut roster, &cfg);
                if p.on_ground {
                    prop_assert!(p.y <= cfg.world.ground_y - p.h);
                }
            }
        }
    }
}
