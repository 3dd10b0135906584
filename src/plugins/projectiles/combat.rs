//! The per-step combat pass, in order: player fire, enemy fire, advance, resolve.

use bevy::prelude::*;

use super::pool::{BulletPool, Owner};
use crate::common::levels::level_spec;
use crate::common::tunables::{CombatTunables, Tunables};
use crate::plugins::enemies::{CombatWorld, DamageOutcome};
use crate::plugins::input::InputFrame;
use crate::plugins::player::DronePose;
use crate::plugins::run::{RunState, RunTransition};

/// What a bullet struck this step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Impact {
    Drone,
    Enemy { index: usize, outcome: DamageOutcome },
}

/// Muzzle position and velocity for a player shot.
pub fn player_shot(position: Vec3, forward: Vec3, tun: &CombatTunables) -> (Vec3, Vec3) {
    let mut origin = position + forward * tun.muzzle_forward;
    origin.y += tun.muzzle_up;
    (origin, forward * tun.player_bullet_speed)
}

/// Muzzle position and velocity for an enemy at `from` aiming at `target`.
pub fn enemy_shot(from: Vec3, target: Vec3, speed: f32, tun: &CombatTunables) -> (Vec3, Vec3) {
    let dir = (target - from).normalize_or(Vec3::NEG_Z);
    (from + dir * tun.enemy_muzzle, dir * speed)
}

/// Sphere tests for every live bullet. Enemy rounds test the drone; player rounds test live
/// enemies and stop at the first one they touch. Every impact frees its bullet.
pub fn resolve_hits(
    pool: &mut BulletPool,
    combat: &mut CombatWorld,
    drone: Option<Vec3>,
    tun: &CombatTunables,
    mut on_impact: impl FnMut(Impact),
) {
    let player_r2 = tun.player_radius * tun.player_radius;
    let enemy_r2 = tun.enemy_radius * tun.enemy_radius;

    for idx in 0..pool.capacity() {
        let b = pool.slots()[idx];
        if !b.active {
            continue;
        }
        match b.owner {
            Owner::Enemy => {
                if let Some(d) = drone
                    && b.position.distance_squared(d) < player_r2
                {
                    pool.deactivate(idx);
                    on_impact(Impact::Drone);
                }
            }
            Owner::Player => {
                let Some(index) = combat
                    .alive()
                    .find(|(_, p)| b.position.distance_squared(*p) < enemy_r2)
                    .map(|(i, _)| i)
                else {
                    continue;
                };
                pool.deactivate(idx);
                let outcome = combat.damage(index, 1);
                on_impact(Impact::Enemy { index, outcome });
            }
        }
    }
}

pub(super) fn combat_live(run: Res<RunState>) -> bool {
    run.controls_enabled()
}

pub(super) fn sync_pool(run: Res<RunState>, mut pool: ResMut<BulletPool>) {
    if pool.sync_run(run.run_id()) {
        debug!(run_id = run.run_id(), "bullet pool cleared");
    }
}

pub(super) fn fire_player(
    input: Res<InputFrame>,
    pose: Res<DronePose>,
    tunables: Res<Tunables>,
    mut run: ResMut<RunState>,
    mut pool: ResMut<BulletPool>,
) {
    if !input.0.fire_pressed || !run.mode().has_weapons() {
        return;
    }
    let Some(pose) = pose.0 else {
        return;
    };
    if !run.try_consume_ammo() {
        debug!("dry fire");
        return;
    }
    let tun = &tunables.combat;
    let (origin, velocity) = player_shot(pose.position, pose.forward, tun);
    pool.spawn(Owner::Player, origin, velocity, tun.player_bullet_ttl);
}

pub(super) fn fire_enemies(
    time: Res<Time>,
    run: Res<RunState>,
    pose: Res<DronePose>,
    tunables: Res<Tunables>,
    mut combat: ResMut<CombatWorld>,
    mut pool: ResMut<BulletPool>,
) {
    let Some(pose) = pose.0 else {
        return;
    };
    let level = level_spec(run.level());
    let tun = &tunables.combat;
    combat.tick_fire(time.delta_secs(), level.enemy_fire_rate, tun.fire_jitter, |from| {
        let (origin, velocity) = enemy_shot(from, pose.position, level.enemy_bullet_speed, tun);
        pool.spawn(Owner::Enemy, origin, velocity, tun.enemy_bullet_ttl);
    });
}

pub(super) fn advance_bullets(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut pool: ResMut<BulletPool>,
) {
    let tun = &tunables.combat;
    pool.advance(time.delta_secs(), tun.bounds_min, tun.bounds_max);
}

/// Apply impacts to the run in the same step, so a kill counts before anything reads the
/// objective.
pub(super) fn apply_hits(
    time: Res<Time>,
    pose: Res<DronePose>,
    tunables: Res<Tunables>,
    mut run: ResMut<RunState>,
    mut combat: ResMut<CombatWorld>,
    mut pool: ResMut<BulletPool>,
    mut transitions: MessageWriter<RunTransition>,
) {
    let now = time.elapsed_secs();
    let drone = pose.0.map(|p| p.position);
    resolve_hits(&mut pool, &mut combat, drone, &tunables.combat, |impact| {
        let change = match impact {
            Impact::Drone => {
                debug!("drone shot");
                run.apply_damage(now)
            }
            Impact::Enemy { index, outcome: DamageOutcome::Hit } => {
                debug!(index, "enemy hit");
                run.mark_enemy_hit(now);
                None
            }
            Impact::Enemy { index, outcome: DamageOutcome::Killed } => {
                debug!(index, "enemy killed");
                run.mark_enemy_hit(now);
                run.record_kill(now)
            }
            Impact::Enemy { outcome: DamageOutcome::Ignored, .. } => None,
        };
        if let Some(t) = change {
            transitions.write(t);
        }
    });
}
