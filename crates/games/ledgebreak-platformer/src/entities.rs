use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use ledgebreak_core::geometry::{Kinematic, Rect, approach};
use ledgebreak_core::time::Countdown;

use crate::config::EnemyTuning;

/// Stable identifier, unique for the lifetime of a session.
pub type EntityId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Platform,
    Spike,
    Enemy,
    FlyingEnemy,
    WhiteEnemy,
}

/// Solid ledge. Can drift horizontally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub speed: f32,
}

/// Hazard block. Lethal under the default rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spike {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub speed: f32,
}

/// Walking enemy. Yellow enemies and white enemies share this shape and
/// live in separate collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundEnemy {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub speed: f32,
    pub health: i32,
    /// Gates inter-enemy strikes only; the player is never damaged by it.
    pub attack_cooldown: Countdown,
}

impl GroundEnemy {
    pub fn take_damage(&mut self, amount: i32) {
        self.health -= amount;
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

/// Airborne enemy bobbing on a sine wave around `base_y`. No health: any
/// hit removes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlyingEnemy {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub speed: f32,
    pub base_y: f32,
    /// Frames since spawn, the oscillation phase.
    pub time: u32,
    pub amplitude: f32,
    pub frequency: f32,
}

macro_rules! impl_kinematic {
    ($($ty:ty),*) => {
        $(
            impl Kinematic for $ty {
                fn bounds(&self) -> Rect {
                    Rect::new(self.x, self.y, self.w, self.h)
                }

                fn velocity(&self) -> (f32, f32) {
                    (self.speed, 0.0)
                }
            }
        )*
    };
}

impl_kinematic!(Platform, Spike, GroundEnemy);

impl Kinematic for FlyingEnemy {
    fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    fn velocity(&self) -> (f32, f32) {
        let phase = self.time as f32 * self.frequency;
        (self.speed, phase.cos() * self.amplitude * self.frequency)
    }
}

/// All world entities, one insertion-ordered collection per kind.
///
/// Insertion order is spawn order; culling pops from the front only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRoster {
    pub platforms: VecDeque<Platform>,
    pub spikes: VecDeque<Spike>,
    pub enemies: VecDeque<GroundEnemy>,
    pub flying_enemies: VecDeque<FlyingEnemy>,
    pub white_enemies: VecDeque<GroundEnemy>,
    next_id: EntityId,
}

impl EntityRoster {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Empty every collection. Ids keep counting so stale references never alias.
    pub fn clear(&mut self) {
        self.platforms.clear();
        self.spikes.clear();
        self.enemies.clear();
        self.flying_enemies.clear();
        self.white_enemies.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
            + self.spikes.len()
            + self.enemies.len()
            + self.flying_enemies.len()
            + self.white_enemies.len()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Platform => self.platforms.len(),
            EntityKind::Spike => self.spikes.len(),
            EntityKind::Enemy => self.enemies.len(),
            EntityKind::FlyingEnemy => self.flying_enemies.len(),
            EntityKind::WhiteEnemy => self.white_enemies.len(),
        }
    }

    pub fn spawn_platform(&mut self, x: f32, y: f32, w: f32, h: f32, speed: f32) -> EntityId {
        let id = self.allocate_id();
        self.platforms.push_back(Platform {
            id,
            x,
            y,
            w,
            h,
            speed,
        });
        id
    }

    pub fn spawn_spike(&mut self, x: f32, y: f32, size: f32, speed: f32) -> EntityId {
        let id = self.allocate_id();
        self.spikes.push_back(Spike {
            id,
            x,
            y,
            w: size,
            h: size,
            speed,
        });
        id
    }

    pub fn spawn_enemy(&mut self, x: f32, y: f32, speed: f32, tuning: &EnemyTuning) -> EntityId {
        let enemy = self.ground_enemy(x, y, speed, tuning);
        let id = enemy.id;
        self.enemies.push_back(enemy);
        id
    }

    pub fn spawn_white_enemy(
        &mut self,
        x: f32,
        y: f32,
        speed: f32,
        tuning: &EnemyTuning,
    ) -> EntityId {
        let enemy = self.ground_enemy(x, y, speed, tuning);
        let id = enemy.id;
        self.white_enemies.push_back(enemy);
        id
    }

    fn ground_enemy(&mut self, x: f32, y: f32, speed: f32, tuning: &EnemyTuning) -> GroundEnemy {
        GroundEnemy {
            id: self.allocate_id(),
            x,
            y,
            w: tuning.ground_enemy_size,
            h: tuning.ground_enemy_size,
            speed,
            health: tuning.health,
            attack_cooldown: Countdown::idle(),
        }
    }

    pub fn spawn_flying_enemy(
        &mut self,
        x: f32,
        y: f32,
        speed: f32,
        tuning: &EnemyTuning,
    ) -> EntityId {
        let id = self.allocate_id();
        self.flying_enemies.push_back(FlyingEnemy {
            id,
            x,
            y,
            w: tuning.flying_size,
            h: tuning.flying_size,
            speed,
            base_y: y,
            time: 0,
            amplitude: tuning.flying_amplitude,
            frequency: tuning.flying_frequency,
        });
        id
    }

    /// Move every entity one frame, then run yellow-vs-white skirmishes.
    /// `player_x` is the player's left edge, the pursuit target of white enemies.
    pub fn advance(&mut self, player_x: f32, tuning: &EnemyTuning) {
        for p in &mut self.platforms {
            p.x += p.speed;
        }
        for s in &mut self.spikes {
            s.x += s.speed;
        }
        for e in &mut self.enemies {
            e.x += e.speed;
        }
        for f in &mut self.flying_enemies {
            f.time = f.time.wrapping_add(1);
            f.y = f.base_y + (f.time as f32 * f.frequency).sin() * f.amplitude;
            f.x += f.speed;
        }
        for w in &mut self.white_enemies {
            if tuning.white_pursuit {
                w.x = approach(w.x, player_x, tuning.white_follow_speed);
            } else {
                w.x += w.speed;
            }
        }

        skirmish(
            &mut self.enemies,
            &mut self.white_enemies,
            tuning.skirmish_range,
            tuning.skirmish_cooldown_frames,
        );
        skirmish(
            &mut self.white_enemies,
            &mut self.enemies,
            tuning.skirmish_range,
            tuning.skirmish_cooldown_frames,
        );
    }

    /// FIFO eviction: pop from the front of each collection while the oldest
    /// entity is fully off either side of the viewport.
    pub fn cull(&mut self, viewport_width: f32) -> usize {
        let before = self.len();
        cull_front(&mut self.platforms, viewport_width);
        cull_front(&mut self.spikes, viewport_width);
        cull_front(&mut self.enemies, viewport_width);
        cull_front(&mut self.flying_enemies, viewport_width);
        cull_front(&mut self.white_enemies, viewport_width);
        before - self.len()
    }

    /// Remove an entity by id. Removing an id that is already gone is a no-op.
    pub fn remove(&mut self, kind: EntityKind, id: EntityId) -> bool {
        match kind {
            EntityKind::Platform => remove_by_id(&mut self.platforms, id, |e| e.id),
            EntityKind::Spike => remove_by_id(&mut self.spikes, id, |e| e.id),
            EntityKind::Enemy => remove_by_id(&mut self.enemies, id, |e| e.id),
            EntityKind::FlyingEnemy => remove_by_id(&mut self.flying_enemies, id, |e| e.id),
            EntityKind::WhiteEnemy => remove_by_id(&mut self.white_enemies, id, |e| e.id),
        }
    }

    /// Every enemy box, for spawn separation checks.
    pub fn enemy_bounds(&self) -> impl Iterator<Item = (EntityKind, Rect)> + '_ {
        self.enemies
            .iter()
            .map(|e| (EntityKind::Enemy, e.bounds()))
            .chain(
                self.white_enemies
                    .iter()
                    .map(|e| (EntityKind::WhiteEnemy, e.bounds())),
            )
            .chain(
                self.flying_enemies
                    .iter()
                    .map(|e| (EntityKind::FlyingEnemy, e.bounds())),
            )
    }
}

/// Each ready attacker strikes the nearest target within `range` (left-edge
/// distance, ties to the older target) for 1 damage, then waits `cooldown`.
/// Dead targets are removed before the next attacker picks.
fn skirmish(
    attackers: &mut VecDeque<GroundEnemy>,
    targets: &mut VecDeque<GroundEnemy>,
    range: f32,
    cooldown: u32,
) {
    for attacker in attackers.iter_mut() {
        attacker.attack_cooldown.tick();
        if !attacker.attack_cooldown.is_ready() {
            continue;
        }
        let nearest = targets
            .iter()
            .enumerate()
            .map(|(i, t)| (i, (t.x - attacker.x).abs()))
            .filter(|&(_, dx)| dx < range)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((i, _)) = nearest {
            targets[i].take_damage(1);
            if targets[i].is_dead() {
                targets.remove(i);
            }
            attacker.attack_cooldown.start(cooldown);
        }
    }
}

trait Extent {
    fn left(&self) -> f32;
    fn width(&self) -> f32;
}

macro_rules! impl_extent {
    ($($ty:ty),*) => {
        $(
            impl Extent for $ty {
                fn left(&self) -> f32 {
                    self.x
                }

                fn width(&self) -> f32 {
                    self.w
                }
            }
        )*
    };
}

impl_extent!(Platform, Spike, GroundEnemy, FlyingEnemy);

fn cull_front<T: Extent>(items: &mut VecDeque<T>, viewport_width: f32) {
    while items
        .front()
        .is_some_and(|e| e.left() + e.width() < 0.0 || e.left() > viewport_width)
    {
        items.pop_front();
    }
}

fn remove_by_id<T>(items: &mut VecDeque<T>, id: EntityId, id_of: impl Fn(&T) -> EntityId) -> bool {
    match items.iter().position(|e| id_of(e) == id) {
        Some(i) => {
            items.remove(i);
            true
        },
        None => false,
    }
}
