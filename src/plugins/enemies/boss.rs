//! Final-level boss: a kinematic sphere that hunts the drone.
//!
//! It steps straight toward a point just behind and above the drone at a speed that grows with
//! distance, so it closes gaps fast but never overshoots. Touching it costs a hit through the
//! drone's contact handler (`ContactKind::Boss`).

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::boss_layers;
use crate::common::levels::BOSS_LEVEL;
use crate::common::sets::SimSet;
use crate::common::state::GameState;
use crate::plugins::core::PendingDespawn;
use crate::plugins::physics::ContactKind;
use crate::plugins::player::DronePose;
use crate::plugins::run::RunState;

pub const BOSS_SPAWN: Vec3 = Vec3::new(0.0, 6.0, -45.0);
pub const BOSS_RADIUS: f32 = 1.6;
/// How far behind the drone the boss aims.
const TRAIL: f32 = 4.5;
const LIFT: f32 = 0.6;
const FLOOR: f32 = 1.8;
const BASE_SPEED: f32 = 3.0;
const SPEED_GAIN: f32 = 0.2;
const SPEED_BONUS_MAX: f32 = 2.6;
const BONUS_AFTER: f32 = 6.0;

/// The boss, tagged with the run that spawned it.
#[derive(Component, Debug, Clone, Copy)]
pub struct Boss {
    pub run_id: u32,
}

#[inline]
pub fn chase_point(target: Vec3) -> Vec3 {
    Vec3::new(target.x, (target.y + LIFT).max(FLOOR), target.z - TRAIL)
}

/// Next boss position after `dt` chasing `target` (the drone position).
pub fn boss_step(position: Vec3, target: Vec3, dt: f32) -> Vec3 {
    let desired = chase_point(target);
    let to = desired - position;
    let d = to.length();
    if d <= f32::EPSILON {
        return desired;
    }
    let speed = BASE_SPEED + ((d - BONUS_AFTER) * SPEED_GAIN).clamp(0.0, SPEED_BONUS_MAX);
    position + to / d * (speed * dt).min(d)
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        sync_boss
            .in_set(SimSet::Spawn)
            .run_if(in_state(GameState::InGame)),
    )
    .add_systems(
        FixedUpdate,
        chase_drone
            .in_set(SimSet::Actors)
            .run_if(in_state(GameState::InGame)),
    );
}

/// One boss on the boss level per run, none anywhere else.
pub(super) fn sync_boss(
    mut commands: Commands,
    run: Res<RunState>,
    q_boss: Query<(Entity, &Boss), Without<PendingDespawn>>,
) {
    let wanted = run.level() == BOSS_LEVEL;
    let mut current = false;
    for (e, boss) in &q_boss {
        if wanted && boss.run_id == run.run_id() && !current {
            current = true;
        } else {
            commands.entity(e).insert(PendingDespawn);
        }
    }
    if !wanted || current {
        return;
    }

    info!(run_id = run.run_id(), "boss spawned");
    commands.spawn((
        Name::new("Boss"),
        Boss { run_id: run.run_id() },
        ContactKind::Boss,
        Transform::from_translation(BOSS_SPAWN),
        RigidBody::Kinematic,
        Collider::sphere(BOSS_RADIUS),
        boss_layers(),
        DespawnOnExit(GameState::InGame),
    ));
}

pub(super) fn chase_drone(
    time: Res<Time>,
    run: Res<RunState>,
    pose: Res<DronePose>,
    mut q_boss: Query<&mut Transform, (With<Boss>, Without<PendingDespawn>)>,
) {
    // Holds position outside live play: intro, level-clear freeze, won, lost.
    if !run.controls_enabled() {
        return;
    }
    let Some(pose) = pose.0 else {
        return;
    };
    let dt = time.delta_secs();
    for mut tf in &mut q_boss {
        tf.translation = boss_step(tf.translation, pose.position, dt);
    }
}
