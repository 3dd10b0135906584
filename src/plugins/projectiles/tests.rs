use bevy::ecs::message::Messages;
use bevy::prelude::*;

use super::combat::{advance_bullets, apply_hits, fire_enemies, fire_player, sync_pool};
use super::*;
use crate::common::state::GameMode;
use crate::common::test_utils::{run_system_once, time_at};
use crate::common::tunables::{CombatTunables, RunTunables};
use crate::plugins::enemies::{CombatWorld, DamageOutcome};
use crate::plugins::input::{InputFrame, InputSnapshot};
use crate::plugins::player::{DronePose, Pose};
use crate::plugins::run::{RunPhase, RunState, RunTransition};

fn bounds() -> (Vec3, Vec3) {
    let t = CombatTunables::default();
    (t.bounds_min, t.bounds_max)
}

fn pose_at(position: Vec3) -> DronePose {
    DronePose(Some(Pose { position, rotation: Quat::IDENTITY, forward: Vec3::NEG_Z }))
}

/// Playing shooter run with its enemy batch and an empty pool.
fn combat_world(mode: GameMode) -> World {
    let mut world = World::new();
    world.insert_resource(time_at(1.0, 1.0 / 60.0));
    world.insert_resource(Tunables::default());
    let mut run = RunState::new(mode, RunTunables::default());
    run.start_or_restart();
    let mut combat = CombatWorld::default();
    combat.sync(mode, run.run_id(), run.level());
    world.insert_resource(run);
    world.insert_resource(combat);
    world.insert_resource(BulletPool::new(CombatTunables::default().pool_capacity));
    world.insert_resource(pose_at(Vec3::new(0.0, 2.0, 0.0)));
    world.insert_resource(InputFrame::default());
    world.init_resource::<Messages<RunTransition>>();
    world
}

fn press_fire(world: &mut World) {
    world.insert_resource(InputFrame(InputSnapshot { fire_pressed: true, ..default() }));
}

#[test]
fn acquire_prefers_free_slots_from_the_cursor() {
    let mut pool = BulletPool::new(4);
    assert_eq!(pool.spawn(Owner::Player, Vec3::ZERO, Vec3::ZERO, 1.0), 0);
    assert_eq!(pool.spawn(Owner::Player, Vec3::ZERO, Vec3::ZERO, 1.0), 1);
    pool.deactivate(0);
    // Cursor sits at 2; slot 0 is only reached after wrapping.
    assert_eq!(pool.acquire(), 2);
    assert_eq!(pool.spawn(Owner::Enemy, Vec3::ZERO, Vec3::ZERO, 1.0), 3);
    assert_eq!(pool.spawn(Owner::Enemy, Vec3::ZERO, Vec3::ZERO, 1.0), 0);
}

#[test]
fn saturated_pool_recycles_instead_of_growing() {
    let mut pool = BulletPool::new(8);
    for i in 0..8 {
        pool.spawn(Owner::Enemy, Vec3::splat(i as f32), Vec3::ZERO, 1.0);
    }
    assert_eq!(pool.active_count(), 8);

    let idx = pool.spawn(Owner::Player, Vec3::new(0.0, 9.0, 0.0), Vec3::ZERO, 1.0);
    assert_eq!(idx, 0);
    assert_eq!(pool.active_count(), 8);
    assert_eq!(pool.slots()[0].owner, Owner::Player);

    for _ in 0..100 {
        pool.spawn(Owner::Player, Vec3::ZERO, Vec3::ZERO, 1.0);
        assert!(pool.active_count() <= pool.capacity());
    }
}

#[test]
fn run_change_empties_the_pool() {
    let mut pool = BulletPool::new(16);
    assert!(pool.sync_run(1));
    for _ in 0..10 {
        pool.spawn(Owner::Enemy, Vec3::ZERO, Vec3::ONE, 2.0);
    }
    assert!(!pool.sync_run(1));
    assert_eq!(pool.active_count(), 10);

    assert!(pool.sync_run(2));
    assert_eq!(pool.active_count(), 0);
    assert_eq!(pool.acquire(), 0);
}

#[test]
#[should_panic(expected = "at least one slot")]
fn empty_pool_is_rejected() {
    let _ = BulletPool::new(0);
}

#[test]
fn ttl_is_charged_before_the_move() {
    let (min, max) = bounds();
    let mut pool = BulletPool::new(2);
    pool.spawn(Owner::Player, Vec3::ZERO, Vec3::NEG_Z, 0.1);

    pool.advance(0.06, min, max);
    assert!(pool.slots()[0].active);
    assert!((pool.slots()[0].position.z + 0.06).abs() < 1e-6);

    pool.advance(0.06, min, max);
    assert!(!pool.slots()[0].active);
    // Expired rounds do not move on their last step.
    assert!((pool.slots()[0].position.z + 0.06).abs() < 1e-6);
}

#[test]
fn leaving_the_world_box_frees_the_round() {
    let (min, max) = bounds();
    let mut pool = BulletPool::new(4);
    pool.spawn(Owner::Player, Vec3::new(0.0, 2.0, -239.9), Vec3::NEG_Z, 5.0);
    pool.spawn(Owner::Enemy, Vec3::new(0.0, -1.9, 0.0), Vec3::NEG_Y, 5.0);
    pool.spawn(Owner::Enemy, Vec3::new(0.0, 59.9, 0.0), Vec3::Y, 5.0);
    pool.spawn(Owner::Enemy, Vec3::new(500.0, 2.0, 0.0), Vec3::X, 5.0);

    pool.advance(0.2, min, max);

    let active: Vec<bool> = pool.slots().iter().map(|b| b.active).collect();
    assert_eq!(active, [false, false, false, true]);
}

#[test]
fn muzzles_follow_pose_and_aim() {
    let tun = CombatTunables::default();
    let (origin, vel) = player_shot(Vec3::new(1.0, 2.0, 3.0), Vec3::NEG_Z, &tun);
    assert!(origin.distance(Vec3::new(1.0, 2.15, 2.1)) < 1e-5);
    assert_eq!(vel, Vec3::NEG_Z * 18.0);

    let (origin, vel) = enemy_shot(Vec3::new(0.0, 2.0, -10.0), Vec3::new(0.0, 2.0, 0.0), 12.0, &tun);
    assert!(origin.distance(Vec3::new(0.0, 2.0, -9.2)) < 1e-5);
    assert!(vel.distance(Vec3::Z * 12.0) < 1e-5);
}

#[test]
fn player_round_hits_only_the_first_enemy_in_reach() {
    let tun = CombatTunables::default();
    let mut combat = CombatWorld::default();
    combat.sync(GameMode::Shooter, 1, 1);
    let target = combat.enemies()[0].position;

    let mut pool = BulletPool::new(4);
    pool.spawn(Owner::Player, target + Vec3::X * 0.69, Vec3::ZERO, 1.0);
    pool.spawn(Owner::Player, target + Vec3::X * 0.71, Vec3::ZERO, 1.0);

    let mut impacts = Vec::new();
    resolve_hits(&mut pool, &mut combat, None, &tun, |i| impacts.push(i));

    assert_eq!(impacts, [Impact::Enemy { index: 0, outcome: DamageOutcome::Killed }]);
    assert!(!pool.slots()[0].active);
    assert!(pool.slots()[1].active);
}

#[test]
fn each_enemy_dies_once_even_under_a_volley() {
    let tun = CombatTunables::default();
    let mut combat = CombatWorld::default();
    combat.sync(GameMode::Shooter, 1, 1);
    let target = combat.enemies()[0].position;

    let mut pool = BulletPool::new(8);
    for _ in 0..5 {
        pool.spawn(Owner::Player, target, Vec3::ZERO, 1.0);
    }
    let mut kills = 0;
    resolve_hits(&mut pool, &mut combat, None, &tun, |i| {
        if matches!(i, Impact::Enemy { outcome: DamageOutcome::Killed, .. }) {
            kills += 1;
        }
    });
    assert_eq!(kills, 1);
    // The dead enemy no longer soaks rounds.
    assert_eq!(pool.active_count(), 4);
}

#[test]
fn enemy_rounds_only_hurt_the_drone() {
    let tun = CombatTunables::default();
    let mut combat = CombatWorld::default();
    combat.sync(GameMode::Shooter, 1, 1);
    let drone = Vec3::new(0.0, 2.0, 0.0);
    let enemy = combat.enemies()[0].position;

    let mut pool = BulletPool::new(4);
    pool.spawn(Owner::Enemy, drone + Vec3::Y * 0.5, Vec3::ZERO, 1.0);
    pool.spawn(Owner::Enemy, enemy, Vec3::ZERO, 1.0);
    pool.spawn(Owner::Player, drone, Vec3::ZERO, 1.0);

    let mut impacts = Vec::new();
    resolve_hits(&mut pool, &mut combat, Some(drone), &tun, |i| impacts.push(i));

    assert_eq!(impacts, [Impact::Drone]);
    assert_eq!(pool.active_count(), 2);
    assert_eq!(combat.alive_count(), combat.enemies().len());
}

#[test]
fn fire_spends_one_round_per_press() {
    let mut world = combat_world(GameMode::Shooter);
    press_fire(&mut world);

    run_system_once(&mut world, fire_player);

    assert_eq!(world.resource::<RunState>().ammo(), 29);
    let pool = world.resource::<BulletPool>();
    assert_eq!(pool.active_count(), 1);
    let b = pool.slots()[0];
    assert_eq!(b.owner, Owner::Player);
    assert!(b.position.distance(Vec3::new(0.0, 2.15, -0.9)) < 1e-5);
}

#[test]
fn empty_magazine_never_fires() {
    let mut world = combat_world(GameMode::Shooter);
    {
        let mut run = world.resource_mut::<RunState>();
        while run.try_consume_ammo() {}
    }
    press_fire(&mut world);

    run_system_once(&mut world, fire_player);

    assert_eq!(world.resource::<RunState>().ammo(), 0);
    assert_eq!(world.resource::<BulletPool>().active_count(), 0);
}

#[test]
fn beginner_mode_has_no_gun() {
    let mut world = combat_world(GameMode::Beginner);
    press_fire(&mut world);

    run_system_once(&mut world, fire_player);

    assert_eq!(world.resource::<RunState>().ammo(), 30);
    assert_eq!(world.resource::<BulletPool>().active_count(), 0);
}

#[test]
fn enemies_open_fire_when_their_timers_run_out() {
    let mut world = combat_world(GameMode::Shooter);
    let soonest = world
        .resource::<CombatWorld>()
        .enemies()
        .iter()
        .map(|e| e.fire_cooldown)
        .fold(f32::INFINITY, f32::min);
    world.insert_resource(time_at(2.0, soonest + 0.001));

    run_system_once(&mut world, fire_enemies);

    let pool = world.resource::<BulletPool>();
    assert!(pool.active_count() >= 1);
    assert!(pool.slots().iter().filter(|b| b.active).all(|b| b.owner == Owner::Enemy));
    // Aimed at the drone.
    let b = pool.slots()[0];
    let to_drone = (Vec3::new(0.0, 2.0, 0.0) - b.position).normalize();
    assert!(b.velocity.normalize().dot(to_drone) > 0.999);
}

#[test]
fn killing_shot_counts_toward_the_objective_in_the_same_step() {
    let mut world = combat_world(GameMode::Shooter);
    let target = world.resource::<CombatWorld>().enemies()[0].position;
    world
        .resource_mut::<BulletPool>()
        .spawn(Owner::Player, target, Vec3::ZERO, 1.0);

    run_system_once(&mut world, apply_hits);

    let run = world.resource::<RunState>();
    assert_eq!(run.kills(), 1);
    assert_eq!(run.objective(), 1);
    assert!(run.hit_marker_active(1.0));
}

#[test]
fn shots_on_the_drone_cost_hit_points_until_lost() {
    let mut world = combat_world(GameMode::Shooter);
    for _ in 0..5 {
        world
            .resource_mut::<BulletPool>()
            .spawn(Owner::Enemy, Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO, 1.0);
        run_system_once(&mut world, apply_hits);
    }

    let run = world.resource::<RunState>();
    assert_eq!(run.hit_points(), 0);
    assert_eq!(run.phase(), RunPhase::Lost);
    let msgs = world.resource::<Messages<RunTransition>>();
    let mut cursor = msgs.get_cursor();
    assert!(cursor.read(msgs).any(|t| *t == RunTransition::Lost));
}

#[test]
fn pool_resets_when_the_run_moves_on() {
    let mut world = combat_world(GameMode::Shooter);
    run_system_once(&mut world, sync_pool);
    world
        .resource_mut::<BulletPool>()
        .spawn(Owner::Enemy, Vec3::ZERO, Vec3::ZERO, 1.0);

    run_system_once(&mut world, sync_pool);
    assert_eq!(world.resource::<BulletPool>().active_count(), 1);

    // Lose the run, then restart: new run id.
    let mut run = RunState::new(GameMode::Shooter, RunTunables::default());
    run.start_or_restart();
    for _ in 0..5 {
        run.apply_damage(0.0);
    }
    run.start_or_restart();
    assert_eq!(run.run_id(), 2);
    world.insert_resource(run);

    run_system_once(&mut world, sync_pool);
    assert_eq!(world.resource::<BulletPool>().active_count(), 0);
}

#[test]
fn advance_uses_the_step_clock() {
    let mut world = combat_world(GameMode::Shooter);
    world.insert_resource(time_at(1.0, 0.5));
    world
        .resource_mut::<BulletPool>()
        .spawn(Owner::Player, Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Z * 4.0, 1.0);

    run_system_once(&mut world, advance_bullets);

    let b = world.resource::<BulletPool>().slots()[0];
    assert!((b.position.z + 2.0).abs() < 1e-5);
    assert!((b.ttl - 0.5).abs() < 1e-5);
}
