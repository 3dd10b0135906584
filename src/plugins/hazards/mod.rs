//! Hazards plugin: seeded floating mines.
//!
//! A batch is generated from `(run_id, level)` and replaced wholesale whenever either changes.
//! Each mine is a zero-gravity dynamic body pulled toward a point bobbing around its base by a
//! damped spring. Touching the drone detonates it: it stops colliding, plays a short explosion
//! and is removed. The hit itself is charged by the drone's own contact handler.

use std::f32::consts::TAU;

use avian3d::collision::narrow_phase::CollisionEventSystems;
use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::{hazard_layers, spent_hazard_layers};
use crate::common::levels::level_spec;
use crate::common::rng::SeedRecipe;
use crate::common::sets::SimSet;
use crate::common::state::GameState;
use crate::plugins::core::PendingDespawn;
use crate::plugins::physics::{ContactKind, contact_owners};
use crate::plugins::player::Drone;
use crate::plugins::run::RunState;

pub const SPRING_K: f32 = 4.0;
pub const SPRING_DAMPING: f32 = 2.2;
pub const SPEED_CAP: f32 = 2.5;
pub const MINE_RADIUS: f32 = 0.45;
pub const EXPLOSION_SECS: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MineSpec {
    pub id: usize,
    pub base: Vec3,
    pub phase: f32,
    pub amp: f32,
    pub speed: f32,
}

impl MineSpec {
    /// Where the spring pulls at time `t`.
    pub fn target(&self, t: f32) -> Vec3 {
        let w = t * self.speed + self.phase;
        self.base
            + Vec3::new(
                w.sin() * self.amp,
                (w * 1.3).sin() * self.amp * 0.5,
                (w * 0.8).cos() * self.amp * 0.6,
            )
    }
}

/// Deterministic batch for `(run_id, level)`.
pub fn generate_mines(run_id: u32, level: u8) -> Vec<MineSpec> {
    let count = level_spec(level).mine_count();
    let mut rng = SeedRecipe::MINES.stream(run_id, level);
    (0..count)
        .map(|id| {
            let x = rng.centered(14.0);
            let y = 1.4 + rng.next_f32() * 6.0;
            let z = -10.0 - rng.next_f32() * 90.0;
            MineSpec {
                id,
                base: Vec3::new(x, y, z),
                phase: rng.next_f32() * TAU,
                amp: 0.4 + rng.next_f32() * 0.8,
                speed: 0.6 + rng.next_f32() * 0.9,
            }
        })
        .collect()
}

/// One spring step: returns the new velocity.
pub fn spring_step(position: Vec3, velocity: Vec3, target: Vec3, dt: f32) -> Vec3 {
    let force = (target - position) * SPRING_K - velocity * SPRING_DAMPING;
    (velocity + force * dt).clamp_length_max(SPEED_CAP)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MineState {
    Armed,
    Exploding { remaining: f32 },
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Mine {
    pub spec: MineSpec,
    pub state: MineState,
}

impl Mine {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.state == MineState::Armed
    }

    /// Armed -> Exploding. `false` if it already went off.
    pub fn detonate(&mut self) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.state = MineState::Exploding { remaining: EXPLOSION_SECS };
        true
    }
}

/// `(run_id, level)` of the live batch.
#[derive(Resource, Debug, Default)]
pub struct MineBatch(pub Option<(u32, u8)>);

pub fn plugin(app: &mut App) {
    app.init_resource::<MineBatch>()
        .add_systems(
            FixedUpdate,
            regenerate_mines
                .in_set(SimSet::Spawn)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedUpdate,
            (drive_mines, tick_explosions)
                .in_set(SimSet::Actors)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedPostUpdate,
            detonate_on_contact
                .after(CollisionEventSystems)
                .run_if(in_state(GameState::InGame)),
        );
}

fn regenerate_mines(
    mut commands: Commands,
    run: Res<RunState>,
    mut batch: ResMut<MineBatch>,
    q_old: Query<Entity, With<Mine>>,
) {
    let key = (run.run_id(), run.level());
    if batch.0 == Some(key) {
        return;
    }
    batch.0 = Some(key);

    for e in &q_old {
        commands.entity(e).insert(PendingDespawn);
    }

    let specs = generate_mines(key.0, key.1);
    info!(run_id = key.0, level = key.1, count = specs.len(), "mines generated");
    for spec in specs {
        commands.spawn((
            Name::new(format!("Mine({})", spec.id)),
            Mine { spec, state: MineState::Armed },
            ContactKind::Hazard,
            Transform::from_translation(spec.base),
            RigidBody::Dynamic,
            Collider::sphere(MINE_RADIUS),
            GravityScale(0.0),
            LockedAxes::ROTATION_LOCKED,
            hazard_layers(),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

fn drive_mines(
    time: Res<Time>,
    mut q: Query<(&Mine, &Transform, &mut LinearVelocity), Without<PendingDespawn>>,
) {
    let t = time.elapsed_secs();
    let dt = time.delta_secs();
    for (mine, tf, mut vel) in &mut q {
        if !mine.is_alive() {
            continue;
        }
        vel.0 = spring_step(tf.translation, vel.0, mine.spec.target(t), dt);
    }
}

fn tick_explosions(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut Mine), Without<PendingDespawn>>,
) {
    let dt = time.delta_secs();
    for (e, mut mine) in &mut q {
        let MineState::Exploding { remaining } = mine.state else {
            continue;
        };
        let left = remaining - dt;
        if left <= 0.0 {
            commands.entity(e).insert(PendingDespawn);
        } else {
            mine.state = MineState::Exploding { remaining: left };
        }
    }
}

pub fn detonate_on_contact(
    mut started: MessageReader<CollisionStart>,
    q_drone: Query<(), With<Drone>>,
    mut q_mines: Query<(&mut Mine, &mut CollisionLayers, &mut LinearVelocity)>,
) {
    for ev in started.read() {
        let (a, b) = contact_owners(ev);
        let mine_e = if q_drone.contains(a) {
            b
        } else if q_drone.contains(b) {
            a
        } else {
            continue;
        };
        let Ok((mut mine, mut layers, mut vel)) = q_mines.get_mut(mine_e) else {
            continue;
        };
        if !mine.detonate() {
            continue;
        }
        *layers = spent_hazard_layers();
        vel.0 = Vec3::ZERO;
        debug!(id = mine.spec.id, "mine detonated");
    }
}
