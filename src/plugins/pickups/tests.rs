use avian3d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use super::*;
use crate::common::test_utils::{run_system_once, time_at};
use crate::common::tunables::RunTunables;
use crate::plugins::run::RunPhase;

#[test]
fn batches_are_deterministic() {
    assert_eq!(generate_coins(2, 3, 8), generate_coins(2, 3, 8));
    assert_eq!(generate_ammo(2, 3, 3), generate_ammo(2, 3, 3));
    assert_ne!(generate_coins(2, 3, 8), generate_coins(3, 3, 8));
}

#[test]
fn mode_picks_the_batch_kind_and_size() {
    let coins = generate_pickups(GameMode::Beginner, 1, 4);
    assert_eq!(coins.len(), 9);
    assert!(coins.iter().all(|p| p.reward == Reward::Coin));

    let crates = generate_pickups(GameMode::Shooter, 1, 4);
    assert_eq!(crates.len(), 4);
    assert!(crates.iter().all(|p| matches!(p.reward, Reward::Ammo(_))));
}

#[test]
fn coin_heights_cover_all_tiers() {
    let coins = generate_coins(0, 1, 400);
    let low = coins.iter().filter(|c| c.base.y < 1.9).count();
    let mid = coins.iter().filter(|c| (2.4..4.4).contains(&c.base.y)).count();
    let high = coins.iter().filter(|c| c.base.y >= 5.0).count();
    assert_eq!(low + mid + high, 400, "every coin sits in a tier");
    assert!(mid > high, "low {low}, mid {mid}, high {high}");
    assert!(low > 0 && high > 0);
}

#[test]
fn ammo_amounts_stay_in_range() {
    for p in generate_ammo(9, 7, 200) {
        let Reward::Ammo(n) = p.reward else { panic!("not ammo") };
        assert!((12..=21).contains(&n), "{n}");
    }
}

#[test]
fn bob_is_a_small_sine() {
    let p = generate_coins(0, 1, 1)[0];
    for i in 0..100 {
        let y = p.bob_height(i as f32 * 0.1);
        assert!((y - p.base.y).abs() <= 0.15 + 1e-6);
    }
}

fn collect_world(mode: GameMode) -> (World, Entity) {
    let mut world = World::new();
    world.insert_resource(time_at(2.0, 1.0 / 60.0));
    let mut run = RunState::new(mode, RunTunables::default());
    run.start_or_restart();
    world.insert_resource(run);
    world.init_resource::<Messages<CollisionStart>>();
    world.init_resource::<Messages<RunTransition>>();
    let drone = world.spawn(Drone).id();
    (world, drone)
}

fn spawn_pickup(world: &mut World, spec: PickupSpec) -> Entity {
    world
        .spawn(Pickup { spec, collected: false, debounce: Debounce::new(0.25) })
        .id()
}

fn touch(world: &mut World, a: Entity, b: Entity) {
    world.write_message(CollisionStart { collider1: a, collider2: b, body1: None, body2: None });
}

#[test]
fn coins_count_once_and_clear_the_level() {
    let (mut world, drone) = collect_world(GameMode::Beginner);
    let coins = generate_coins(1, 1, 2);
    let c0 = spawn_pickup(&mut world, coins[0]);
    let c1 = spawn_pickup(&mut world, coins[1]);

    // Duplicate enter events for the same coin in one step.
    touch(&mut world, drone, c0);
    touch(&mut world, c0, drone);
    run_system_once(&mut world, collect_pickups);
    world.resource_mut::<Messages<CollisionStart>>().clear();

    assert_eq!(world.resource::<RunState>().score(), 1);
    assert!(world.get::<Pickup>(c0).unwrap().collected);
    assert!(world.get::<PendingDespawn>(c0).is_some());

    touch(&mut world, drone, c1);
    run_system_once(&mut world, collect_pickups);

    let run = world.resource::<RunState>();
    assert_eq!(run.score(), 2);
    assert_eq!(run.phase(), RunPhase::LevelCleared);
}

#[test]
fn ammo_crate_pays_its_amount() {
    let (mut world, drone) = collect_world(GameMode::Shooter);
    let spec = PickupSpec { id: 0, base: Vec3::ZERO, phase: 0.0, reward: Reward::Ammo(15) };
    let crate_e = spawn_pickup(&mut world, spec);

    touch(&mut world, crate_e, drone);
    run_system_once(&mut world, collect_pickups);

    assert_eq!(world.resource::<RunState>().ammo(), 45);
}

#[test]
fn nothing_is_collected_before_the_run_starts() {
    let (mut world, drone) = collect_world(GameMode::Beginner);
    world.insert_resource(RunState::new(GameMode::Beginner, RunTunables::default()));
    let coin = spawn_pickup(&mut world, generate_coins(0, 1, 1)[0]);

    touch(&mut world, drone, coin);
    run_system_once(&mut world, collect_pickups);

    assert!(!world.get::<Pickup>(coin).unwrap().collected);
    assert_eq!(world.resource::<RunState>().score(), 0);
}

#[test]
fn non_drone_contacts_are_ignored() {
    let (mut world, _drone) = collect_world(GameMode::Beginner);
    let coin = spawn_pickup(&mut world, generate_coins(0, 1, 1)[0]);
    let rock = world.spawn_empty().id();

    touch(&mut world, rock, coin);
    run_system_once(&mut world, collect_pickups);

    assert!(!world.get::<Pickup>(coin).unwrap().collected);
}

#[test]
fn regenerate_spawns_mode_batch() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.insert_resource(RunState::new(GameMode::Beginner, RunTunables::default()));
    world.init_resource::<PickupBatch>();

    run_system_once(&mut world, regenerate_pickups);

    let mut q = world.query::<(&Pickup, &ContactKind)>();
    let all: Vec<_> = q.iter(&world).collect();
    assert_eq!(all.len(), 6);
    assert!(all.iter().all(|(_, k)| **k == ContactKind::Coin));
}
