//! Pickups plugin: coins (beginner) and ammo crates (shooter).
//!
//! Same batch rule as the mines: regenerate on `(run_id, level)` change. Pickups are kinematic
//! sensors that bob on a sine; they are never physically simulated. The first debounced
//! contact with the drone collects one and pays out its reward.

use avian3d::collision::narrow_phase::CollisionEventSystems;
use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::debounce::Debounce;
use crate::common::layers::pickup_layers;
use crate::common::levels::level_spec;
use crate::common::rng::SeedRecipe;
use crate::common::sets::SimSet;
use crate::common::state::{GameMode, GameState};
use crate::common::tunables::Tunables;
use crate::plugins::core::PendingDespawn;
use crate::plugins::physics::{ContactKind, contact_owners};
use crate::plugins::player::Drone;
use crate::plugins::run::{RunState, RunTransition};

const BOB_RATE: f32 = 1.6;
const BOB_HEIGHT: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reward {
    Coin,
    Ammo(u32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickupSpec {
    pub id: usize,
    pub base: Vec3,
    pub phase: f32,
    pub reward: Reward,
}

impl PickupSpec {
    #[inline]
    pub fn bob_height(&self, t: f32) -> f32 {
        self.base.y + (t * BOB_RATE + self.phase).sin() * BOB_HEIGHT
    }
}

/// Coins with a tiered height mix: some low, most mid, some high.
pub fn generate_coins(run_id: u32, level: u8, count: usize) -> Vec<PickupSpec> {
    let mut rng = SeedRecipe::COINS.stream(run_id, level);
    (0..count)
        .map(|id| {
            let x = rng.centered(13.0);
            let z = -6.0 - rng.next_f32() * 80.0;
            let tier = rng.next_f32();
            let y = if tier < 0.35 {
                1.1 + rng.next_f32() * 0.8
            } else if tier < 0.75 {
                2.4 + rng.next_f32() * 2.0
            } else {
                5.0 + rng.next_f32() * 4.0
            };
            PickupSpec {
                id,
                base: Vec3::new(x, y, z),
                phase: rng.next_f32() * 10.0,
                reward: Reward::Coin,
            }
        })
        .collect()
}

pub fn generate_ammo(run_id: u32, level: u8, count: usize) -> Vec<PickupSpec> {
    let mut rng = SeedRecipe::AMMO.stream(run_id, level);
    (0..count)
        .map(|id| {
            let x = rng.centered(12.0);
            let z = -8.0 - rng.next_f32() * 78.0;
            let y = 1.2 + rng.next_f32() * 3.2;
            let amount = 12 + (rng.next_f32() * 10.0) as u32;
            PickupSpec {
                id,
                base: Vec3::new(x, y, z),
                phase: rng.next_f32() * 10.0,
                reward: Reward::Ammo(amount),
            }
        })
        .collect()
}

/// The batch a mode gets on a level.
pub fn generate_pickups(mode: GameMode, run_id: u32, level: u8) -> Vec<PickupSpec> {
    let spec = level_spec(level);
    match mode {
        GameMode::Beginner => generate_coins(run_id, level, spec.coin_count),
        GameMode::Shooter => generate_ammo(run_id, level, spec.ammo_count),
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Pickup {
    pub spec: PickupSpec,
    pub collected: bool,
    pub debounce: Debounce,
}

#[derive(Resource, Debug, Default)]
pub struct PickupBatch(pub Option<(u32, u8)>);

pub fn plugin(app: &mut App) {
    app.init_resource::<PickupBatch>()
        .add_systems(
            FixedUpdate,
            regenerate_pickups
                .in_set(SimSet::Spawn)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedUpdate,
            bob_pickups
                .in_set(SimSet::Actors)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedPostUpdate,
            collect_pickups
                .after(CollisionEventSystems)
                .run_if(in_state(GameState::InGame)),
        );
}

fn regenerate_pickups(
    mut commands: Commands,
    tunables: Res<Tunables>,
    run: Res<RunState>,
    mut batch: ResMut<PickupBatch>,
    q_old: Query<Entity, With<Pickup>>,
) {
    let key = (run.run_id(), run.level());
    if batch.0 == Some(key) {
        return;
    }
    batch.0 = Some(key);

    for e in &q_old {
        commands.entity(e).insert(PendingDespawn);
    }

    let specs = generate_pickups(run.mode(), key.0, key.1);
    info!(run_id = key.0, level = key.1, count = specs.len(), "pickups generated");
    for spec in specs {
        let (name, kind, collider) = match spec.reward {
            Reward::Coin => ("Coin", ContactKind::Coin, Collider::cylinder(0.3, 0.08)),
            Reward::Ammo(_) => ("AmmoCrate", ContactKind::Ammo, Collider::cuboid(0.6, 0.45, 0.6)),
        };
        commands.spawn((
            Name::new(format!("{name}({})", spec.id)),
            Pickup {
                spec,
                collected: false,
                debounce: Debounce::new(tunables.pickup_cooldown),
            },
            kind,
            Transform::from_translation(spec.base),
            RigidBody::Kinematic,
            collider,
            Sensor,
            CollisionEventsEnabled,
            pickup_layers(),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

fn bob_pickups(time: Res<Time>, mut q: Query<(&Pickup, &mut Transform), Without<PendingDespawn>>) {
    let t = time.elapsed_secs();
    for (pickup, mut tf) in &mut q {
        tf.translation.y = pickup.spec.bob_height(t);
    }
}

pub fn collect_pickups(
    mut commands: Commands,
    time: Res<Time>,
    mut started: MessageReader<CollisionStart>,
    q_drone: Query<(), With<Drone>>,
    mut q_pickups: Query<&mut Pickup, Without<PendingDespawn>>,
    mut run: ResMut<RunState>,
    mut transitions: MessageWriter<RunTransition>,
) {
    let now = time.elapsed_secs();

    for ev in started.read() {
        let (a, b) = contact_owners(ev);
        let pickup_e = if q_drone.contains(a) {
            b
        } else if q_drone.contains(b) {
            a
        } else {
            continue;
        };
        let Ok(mut pickup) = q_pickups.get_mut(pickup_e) else {
            continue;
        };
        if pickup.collected || !run.controls_enabled() {
            continue;
        }
        if !pickup.debounce.try_fire(now) {
            continue;
        }

        pickup.collected = true;
        commands.entity(pickup_e).insert(PendingDespawn);

        match pickup.spec.reward {
            Reward::Coin => {
                debug!(id = pickup.spec.id, "coin collected");
                if let Some(t) = run.record_coin(now) {
                    transitions.write(t);
                }
            }
            Reward::Ammo(amount) => {
                run.add_ammo(amount);
                debug!(id = pickup.spec.id, amount, ammo = run.ammo(), "ammo collected");
            }
        }
    }
}

#[cfg(test)]
mod tests;
