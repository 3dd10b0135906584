//! Enemies plugin: stationary gunships, their explosions, and the level-8 boss.
//!
//! ---------------------------
//! OWNERSHIP
//! ---------------------------
//! Gunships are not ECS entities. They live in [`CombatWorld`], a single resource that owns
//! the registry for the current `(run_id, level)` batch plus the explosion records and the
//! seeded stream used for fire jitter and particle directions. Other plugins get narrow
//! access only:
//!
//! - the spawner (this plugin) replaces the batch when the key changes,
//! - the bullet system reads alive positions, ticks fire timers and applies damage,
//! - presentation reads enemies and explosions and never writes.
//!
//! ---------------------------
//! LIFECYCLE
//! ---------------------------
//! ```text
//!   alive (hp > 0) ──damage──▶ alive (hp - 1) ──...──▶ dead + Explosion { age 0 }
//!                                                         │
//!                                   display only, ages out after EXPLOSION_LIFE
//! ```
//! An enemy turns dead at most once per batch, so a kill is reported exactly once.
//!
//! The boss is different: one kinematic body with a collider, stepped straight toward a point
//! behind the drone. See [`boss`].

pub mod boss;

use bevy::prelude::*;

use crate::common::levels::level_spec;
use crate::common::rng::{Prng, SeedRecipe};
use crate::common::sets::SimSet;
use crate::common::state::{GameMode, GameState};
use crate::plugins::run::RunState;

pub const EXPLOSION_PARTICLES: usize = 14;
pub const EXPLOSION_LIFE: f32 = 0.7;
/// Mixed into the enemy seed for the secondary (jitter / particle) stream.
const STREAM_SALT: u32 = 0x9E37_79B9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySpec {
    pub id: usize,
    pub position: Vec3,
    pub hit_points: i32,
    pub fire_cooldown: f32,
}

pub fn generate_enemies(run_id: u32, level: u8) -> Vec<EnemySpec> {
    let spec = level_spec(level);
    let mut rng = SeedRecipe::ENEMIES.stream(run_id, level);
    (0..spec.enemy_count)
        .map(|id| {
            let x = rng.centered(13.0);
            let y = 2.2 + rng.next_f32() * 4.5;
            let z = -18.0 - rng.next_f32() * 80.0;
            EnemySpec {
                id,
                position: Vec3::new(x, y, z),
                hit_points: spec.enemy_hp,
                fire_cooldown: 0.7 + rng.next_f32() * 0.6,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub id: usize,
    pub position: Vec3,
    pub alive: bool,
    pub hit_points: i32,
    /// Seconds until the next shot.
    pub fire_cooldown: f32,
}

impl From<EnemySpec> for Enemy {
    fn from(s: EnemySpec) -> Self {
        Self {
            id: s.id,
            position: s.position,
            alive: true,
            hit_points: s.hit_points,
            fire_cooldown: s.fire_cooldown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Dead already, or no such enemy.
    Ignored,
    Hit,
    Killed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub direction: Vec3,
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub origin: Vec3,
    pub age: f32,
    pub particles: [Particle; EXPLOSION_PARTICLES],
}

impl Explosion {
    /// Linear fade to zero over the lifetime.
    #[inline]
    pub fn alpha(&self) -> f32 {
        (1.0 - self.age / EXPLOSION_LIFE).clamp(0.0, 1.0)
    }

    #[inline]
    pub fn particle_position(&self, p: &Particle) -> Vec3 {
        self.origin + p.direction * p.speed * self.age
    }
}

#[derive(Resource, Debug)]
pub struct CombatWorld {
    key: Option<(u32, u8)>,
    generation: u32,
    enemies: Vec<Enemy>,
    explosions: Vec<Explosion>,
    rng: Prng,
}

impl Default for CombatWorld {
    fn default() -> Self {
        Self {
            key: None,
            generation: 0,
            enemies: Vec::new(),
            explosions: Vec::new(),
            rng: Prng::new(STREAM_SALT),
        }
    }
}

impl CombatWorld {
    /// Replace the batch if `(run_id, level)` moved. Beginner mode has no gunships.
    pub fn sync(&mut self, mode: GameMode, run_id: u32, level: u8) -> bool {
        let key = (run_id, level);
        if self.key == Some(key) {
            return false;
        }
        self.key = Some(key);
        self.generation = self.generation.wrapping_add(1);
        self.explosions.clear();
        self.enemies.clear();
        if mode.has_weapons() {
            self.enemies.extend(generate_enemies(run_id, level).into_iter().map(Enemy::from));
        }
        self.rng = Prng::new(SeedRecipe::ENEMIES.seed(run_id, level) ^ STREAM_SALT);
        true
    }

    /// Bumps on every batch replacement.
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    #[inline]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    #[inline]
    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    pub fn alive_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    /// `(index, position)` of every live enemy.
    pub fn alive(&self) -> impl Iterator<Item = (usize, Vec3)> + '_ {
        self.enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.alive)
            .map(|(i, e)| (i, e.position))
    }

    /// Count down every live enemy's fire timer. Each one that elapses calls `fire` with its
    /// position and re-arms to `rate + [0, jitter)`.
    pub fn tick_fire(&mut self, dt: f32, rate: f32, jitter: f32, mut fire: impl FnMut(Vec3)) {
        for e in self.enemies.iter_mut().filter(|e| e.alive) {
            e.fire_cooldown -= dt;
            if e.fire_cooldown <= 0.0 {
                e.fire_cooldown = rate + self.rng.next_f32() * jitter;
                fire(e.position);
            }
        }
    }

    pub fn damage(&mut self, index: usize, amount: i32) -> DamageOutcome {
        let Some(e) = self.enemies.get_mut(index) else {
            return DamageOutcome::Ignored;
        };
        if !e.alive {
            return DamageOutcome::Ignored;
        }
        e.hit_points -= amount;
        if e.hit_points > 0 {
            return DamageOutcome::Hit;
        }
        e.alive = false;
        let origin = e.position;
        self.spawn_explosion(origin);
        DamageOutcome::Killed
    }

    fn spawn_explosion(&mut self, origin: Vec3) {
        let rng = &mut self.rng;
        let particles = std::array::from_fn(|_| {
            let d = Vec3::new(rng.centered(1.0), rng.centered(1.0), rng.centered(1.0));
            Particle {
                direction: d.try_normalize().unwrap_or(Vec3::Y),
                speed: 2.0 + rng.next_f32() * 3.0,
            }
        });
        self.explosions.push(Explosion { origin, age: 0.0, particles });
    }

    pub fn tick_explosions(&mut self, dt: f32) {
        for x in &mut self.explosions {
            x.age += dt;
        }
        self.explosions.retain(|x| x.age < EXPLOSION_LIFE);
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<CombatWorld>()
        .add_systems(
            FixedUpdate,
            sync_combat_world
                .in_set(SimSet::Spawn)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedUpdate,
            tick_explosions
                .in_set(SimSet::Actors)
                .run_if(in_state(GameState::InGame)),
        );
    boss::plugin(app);
}

fn sync_combat_world(run: Res<RunState>, mut combat: ResMut<CombatWorld>) {
    if combat.sync(run.mode(), run.run_id(), run.level()) {
        info!(
            run_id = run.run_id(),
            level = run.level(),
            enemies = combat.enemies().len(),
            "enemies generated"
        );
    }
}

fn tick_explosions(time: Res<Time>, mut combat: ResMut<CombatWorld>) {
    if combat.explosions().is_empty() {
        return;
    }
    combat.tick_explosions(time.delta_secs());
}
