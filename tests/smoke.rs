mod common;

use bevy::prelude::*;
use drone_arcade::common::state::GameMode;
use drone_arcade::common::tunables::Tunables;
use drone_arcade::plugins::input::Edge;
use drone_arcade::plugins::core::PendingDespawn;
use drone_arcade::plugins::enemies::CombatWorld;
use drone_arcade::plugins::hazards::Mine;
use drone_arcade::plugins::pickups::{Pickup, Reward};
use drone_arcade::plugins::player::Drone;
use drone_arcade::plugins::run::{RunPhase, RunState};
use drone_arcade::plugins::world::{Ground, SafePad};

fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
    app.world_mut()
        .query_filtered::<Entity, F>()
        .iter(app.world())
        .count()
}

#[test]
fn boots_and_ticks() {
    let mut app = common::app_headless(GameMode::Shooter);
    common::step(&mut app, 3);
}

#[test]
fn boots_into_intro_with_the_level_built() {
    let mut app = common::booted(GameMode::Shooter);
    common::step(&mut app, 2);

    assert_eq!(app.world().resource::<RunState>().phase(), RunPhase::Intro);
    assert_eq!(count::<With<Drone>>(&mut app), 1);
    assert_eq!(count::<With<Ground>>(&mut app), 1);
    assert_eq!(count::<With<SafePad>>(&mut app), 1);
    assert_eq!(count::<(With<Mine>, Without<PendingDespawn>)>(&mut app), 16);
    assert_eq!(count::<(With<Pickup>, Without<PendingDespawn>)>(&mut app), 3);
    assert_eq!(app.world().resource::<CombatWorld>().enemies().len(), 3);
}

#[test]
fn beginner_mode_lays_out_coins_and_no_gunships() {
    let mut app = common::booted(GameMode::Beginner);
    common::step(&mut app, 1);

    let mut q = app.world_mut().query::<&Pickup>();
    let rewards: Vec<Reward> = q.iter(app.world()).map(|p| p.spec.reward).collect();
    assert_eq!(rewards.len(), 6);
    assert!(rewards.iter().all(|r| *r == Reward::Coin));
    assert!(app.world().resource::<CombatWorld>().enemies().is_empty());
}

#[test]
fn idle_drone_never_sinks_through_the_floor() {
    let mut app = common::booted(GameMode::Shooter);
    let min = app.world().resource::<Tunables>().flight.min_height();

    for _ in 0..120 {
        common::step(&mut app, 1);
        let mut q = app.world_mut().query_filtered::<&Transform, With<Drone>>();
        let tf = q.single(app.world()).unwrap();
        assert!(tf.translation.y >= min, "y = {}", tf.translation.y);
    }
}

#[test]
fn grounded_drone_off_the_pad_stays_at_floor_height() {
    let mut app = common::booted(GameMode::Shooter);
    let min = app.world().resource::<Tunables>().flight.min_height();
    {
        let mut q = app.world_mut().query_filtered::<&mut Transform, With<Drone>>();
        let mut tf = q.single_mut(app.world_mut()).unwrap();
        tf.translation = Vec3::new(8.0, min, 0.0);
    }

    for _ in 0..90 {
        common::step(&mut app, 1);
        let mut q = app.world_mut().query_filtered::<&Transform, With<Drone>>();
        let y = q.single(app.world()).unwrap().translation.y;
        assert!(y >= min, "y = {y}");
        assert!(y < min + 0.05, "y = {y}");
    }
}

#[test]
fn released_stick_holds_altitude_once_playing() {
    let mut app = common::booted(GameMode::Shooter);
    common::press(&mut app, Edge::Start);
    let spawn_y = app.world().resource::<Tunables>().flight.spawn.y;

    common::step(&mut app, 64);

    let mut q = app.world_mut().query_filtered::<&Transform, With<Drone>>();
    let y = q.single(app.world()).unwrap().translation.y;
    assert!((y - spawn_y).abs() < 0.15, "y = {y}");
}
