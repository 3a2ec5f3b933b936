//! One generic interpreter for the declarative screen tables: scripted entry
//! placements and randomized periodic waves.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::RunnerConfig;
use crate::entities::EntityRoster;
use crate::level::table::Placement;

/// Vertical placement of a flying spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Altitude {
    /// Random height in the low band a standing player can be hit in.
    Band,
    /// Top edge a fixed distance above the ground.
    Rise(f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnKind {
    Spike,
    Enemy,
    WhiteEnemy,
    FlyingEnemy(Altitude),
}

/// Viewport edge a wave enters from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Sign of a speed that points into the viewport from this edge.
    pub fn inward(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }
}

/// One entry of a periodic wave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRule {
    pub kind: SpawnKind,
    /// Magnitude of the horizontal speed. The sign comes from the side.
    pub speed: f32,
    /// Distance in from the spawning edge.
    pub inset: f32,
    /// Probability this entry spawns at all.
    pub chance: f64,
    /// Enter from the edge opposite the wave's side.
    pub opposite: bool,
}

impl SpawnRule {
    pub fn new(kind: SpawnKind, speed: f32) -> Self {
        Self {
            kind,
            speed,
            inset: 0.0,
            chance: 1.0,
            opposite: false,
        }
    }

    pub fn inset(mut self, inset: f32) -> Self {
        self.inset = inset;
        self
    }

    pub fn chance(mut self, chance: f64) -> Self {
        self.chance = chance;
        self
    }

    pub fn opposite(mut self) -> Self {
        self.opposite = true;
        self
    }
}

/// Deterministic generator for the `wave`-th periodic wave of a session.
pub fn wave_rng(seed: u64, wave: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ wave.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Whether a new enemy at `(x, y)` would stack on an existing one. Ground
/// enemies compare left edges only; flying enemies must also be close vertically.
pub fn is_position_too_close(roster: &EntityRoster, x: f32, y: f32, config: &RunnerConfig) -> bool {
    let min_dx = config.world.spawn_separation;
    let min_dy = config.world.flying_separation_y;
    roster
        .enemies
        .iter()
        .chain(roster.white_enemies.iter())
        .any(|e| (x - e.x).abs() < min_dx)
        || roster
            .flying_enemies
            .iter()
            .any(|f| (x - f.x).abs() < min_dx && (y - f.y).abs() < min_dy)
}

/// Make a screen's scripted entry placements.
pub fn place_initial(placements: &[Placement], roster: &mut EntityRoster, config: &RunnerConfig) {
    let ground_y = config.world.ground_y;
    let tuning = &config.enemies;
    for placement in placements {
        match *placement {
            Placement::Platform { x, rise, w } => {
                roster.spawn_platform(x, ground_y - rise, w, tuning.platform_height, 0.0);
            },
            Placement::Enemy { x, speed } => {
                roster.spawn_enemy(x, ground_y - tuning.ground_enemy_size, speed, tuning);
            },
            Placement::WhiteEnemy { x, speed } => {
                roster.spawn_white_enemy(x, ground_y - tuning.ground_enemy_size, speed, tuning);
            },
            Placement::FlyingEnemy { x, rise, speed } => {
                roster.spawn_flying_enemy(x, ground_y - rise, speed, tuning);
            },
        }
    }
}

/// Run one periodic wave: pick a side, then try each rule in order. Returns
/// how many entities were created.
pub fn run_wave(
    rules: &[SpawnRule],
    roster: &mut EntityRoster,
    rng: &mut impl Rng,
    config: &RunnerConfig,
) -> usize {
    let wave_side = if rng.random_bool(0.5) {
        Side::Left
    } else {
        Side::Right
    };
    let mut spawned = 0;
    for rule in rules {
        if rule.chance < 1.0 && !rng.random_bool(rule.chance.clamp(0.0, 1.0)) {
            continue;
        }
        let side = if rule.opposite {
            wave_side.opposite()
        } else {
            wave_side
        };
        if spawn_one(rule, side, roster, rng, config) {
            spawned += 1;
        }
    }
    spawned
}

fn spawn_one(
    rule: &SpawnRule,
    side: Side,
    roster: &mut EntityRoster,
    rng: &mut impl Rng,
    config: &RunnerConfig,
) -> bool {
    let world = &config.world;
    let tuning = &config.enemies;
    let speed = side.inward() * rule.speed;
    let edge_x = |size: f32| match side {
        Side::Left => rule.inset,
        Side::Right => world.viewport_width - size - rule.inset,
    };

    match rule.kind {
        SpawnKind::Spike => {
            // Flush outside the edge so the spike slides in.
            let size = tuning.spike_size;
            let x = match side {
                Side::Left => -size - rule.inset,
                Side::Right => world.viewport_width + rule.inset,
            };
            roster.spawn_spike(x, world.ground_y - size, size, speed);
        },
        SpawnKind::Enemy | SpawnKind::WhiteEnemy => {
            let size = tuning.ground_enemy_size;
            let (x, y) = (edge_x(size), world.ground_y - size);
            if is_position_too_close(roster, x, y, config) {
                tracing::debug!(x, "Skipped crowded ground spawn");
                return false;
            }
            if rule.kind == SpawnKind::Enemy {
                roster.spawn_enemy(x, y, speed, tuning);
            } else {
                roster.spawn_white_enemy(x, y, speed, tuning);
            }
        },
        SpawnKind::FlyingEnemy(altitude) => {
            let size = tuning.flying_size;
            let y = match altitude {
                Altitude::Band => {
                    let high = world.ground_y - world.jump_height + 10.0;
                    let low = world.ground_y - size;
                    if high < low {
                        rng.random_range(high..low)
                    } else {
                        low
                    }
                },
                Altitude::Rise(rise) => world.ground_y - rise,
            };
            let x = edge_x(size);
            if is_position_too_close(roster, x, y, config) {
                tracing::debug!(x, y, "Skipped crowded flying spawn");
                return false;
            }
            roster.spawn_flying_enemy(x, y, speed, tuning);
        },
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::EntityKind;

    fn config() -> RunnerConfig {
        RunnerConfig::default()
    }

    /// Find a seed whose first draw picks `side`.
    fn rng_for(side: Side) -> StdRng {
        (0..64)
            .map(StdRng::seed_from_u64)
            .find(|rng| {
                let mut probe = rng.clone();
                probe.random_bool(0.5) == (side == Side::Left)
            })
            .expect("a seed for each side")
    }

    #[test]
    fn spikes_enter_flush_and_move_inward() {
        let cfg = config();
        let rules = [SpawnRule::new(SpawnKind::Spike, 1.5)];

        let mut roster = EntityRoster::new();
        run_wave(&rules, &mut roster, &mut rng_for(Side::Left), &cfg);
        let s = &roster.spikes[0];
        assert_eq!((s.x, s.y, s.speed), (-30.0, 620.0, 1.5));

        let mut roster = EntityRoster::new();
        run_wave(&rules, &mut roster, &mut rng_for(Side::Right), &cfg);
        let s = &roster.spikes[0];
        assert_eq!((s.x, s.speed), (1280.0, -1.5));
        assert_eq!(roster.cull(cfg.world.viewport_width), 0, "Not culled on arrival");
    }

    #[test]
    fn ground_spawns_use_inset_from_edge() {
        let cfg = config();
        let rules = [
            SpawnRule::new(SpawnKind::Enemy, 2.0),
            SpawnRule::new(SpawnKind::WhiteEnemy, 1.5).inset(100.0),
        ];
        let mut roster = EntityRoster::new();
        let n = run_wave(&rules, &mut roster, &mut rng_for(Side::Right), &cfg);
        assert_eq!(n, 2);
        assert_eq!((roster.enemies[0].x, roster.enemies[0].speed), (1240.0, -2.0));
        assert_eq!(roster.white_enemies[0].x, 1140.0);
        assert_eq!(roster.enemies[0].y, 610.0);
    }

    #[test]
    fn opposite_rule_enters_from_other_edge() {
        let cfg = config();
        let rules = [
            SpawnRule::new(SpawnKind::Enemy, 1.8),
            SpawnRule::new(SpawnKind::Enemy, 1.8).opposite(),
        ];
        let mut roster = EntityRoster::new();
        run_wave(&rules, &mut roster, &mut rng_for(Side::Left), &cfg);
        assert_eq!(roster.enemies.len(), 2);
        assert_eq!((roster.enemies[0].x, roster.enemies[0].speed), (0.0, 1.8));
        assert_eq!((roster.enemies[1].x, roster.enemies[1].speed), (1240.0, -1.8));
    }

    #[test]
    fn zero_chance_never_spawns() {
        let cfg = config();
        let rules = [SpawnRule::new(SpawnKind::Enemy, 2.0).chance(0.0)];
        let mut roster = EntityRoster::new();
        for seed in 0..50 {
            run_wave(&rules, &mut roster, &mut StdRng::seed_from_u64(seed), &cfg);
        }
        assert!(roster.is_empty());
    }

    #[test]
    fn crowded_positions_are_skipped() {
        let cfg = config();
        let rules = [SpawnRule::new(SpawnKind::Enemy, 2.0)];
        let mut roster = EntityRoster::new();
        roster.spawn_white_enemy(30.0, 610.0, 0.0, &cfg.enemies);
        let n = run_wave(&rules, &mut roster, &mut rng_for(Side::Left), &cfg);
        assert_eq!(n, 0);
        assert_eq!(roster.count(EntityKind::Enemy), 0);
    }

    #[test]
    fn wave_of_three_is_spaced_by_inset() {
        let cfg = config();
        let rules: Vec<_> = [0.0, 200.0, 400.0]
            .into_iter()
            .map(|i| SpawnRule::new(SpawnKind::Enemy, 2.0).inset(i))
            .collect();
        let mut roster = EntityRoster::new();
        assert_eq!(run_wave(&rules, &mut roster, &mut rng_for(Side::Left), &cfg), 3);
        let xs: Vec<f32> = roster.enemies.iter().map(|e| e.x).collect();
        assert_eq!(xs, vec![0.0, 200.0, 400.0]);
    }

    #[test]
    fn flying_band_stays_low() {
        let cfg = config();
        let rules = [SpawnRule::new(SpawnKind::FlyingEnemy(Altitude::Band), 1.5)];
        for seed in 0..100 {
            let mut roster = EntityRoster::new();
            run_wave(&rules, &mut roster, &mut StdRng::seed_from_u64(seed), &cfg);
            let y = roster.flying_enemies[0].y;
            assert!((580.0..=605.0).contains(&y), "y={y}");
        }
    }

    #[test]
    fn flying_proximity_needs_both_axes() {
        let cfg = config();
        let mut roster = EntityRoster::new();
        roster.spawn_flying_enemy(100.0, 300.0, 0.0, &cfg.enemies);
        assert!(is_position_too_close(&roster, 120.0, 350.0, &cfg));
        assert!(!is_position_too_close(&roster, 120.0, 390.0, &cfg));
        assert!(!is_position_too_close(&roster, 170.0, 300.0, &cfg));
    }

    #[test]
    fn wave_rng_is_reproducible() {
        let draw = |seed, wave| -> Vec<u32> {
            let mut rng = wave_rng(seed, wave);
            (0..8).map(|_| rng.random()).collect()
        };
        assert_eq!(draw(7, 3), draw(7, 3));
        assert_ne!(draw(7, 3), draw(7, 4));
        assert_ne!(draw(7, 3), draw(8, 3));
    }

    #[test]
    fn initial_placements_sit_on_ground_line() {
        let cfg = config();
        let mut roster = EntityRoster::new();
        place_initial(
            &[
                Placement::Platform {
                    x: 150.0,
                    rise: 120.0,
                    w: 100.0,
                },
                Placement::Enemy {
                    x: 400.0,
                    speed: -1.0,
                },
                Placement::FlyingEnemy {
                    x: 350.0,
                    rise: 120.0,
                    speed: -1.5,
                },
            ],
            &mut roster,
            &cfg,
        );
        assert_eq!(roster.platforms[0].y, 530.0);
        assert_eq!(roster.platforms[0].h, 20.0);
        assert_eq!(roster.enemies[0].y, 610.0);
        assert_eq!(roster.flying_enemies[0].base_y, 530.0);
    }
}
