use avian3d::prelude::*;
use bevy::prelude::*;

use super::*;
use crate::common::test_utils::run_system_once;

#[test]
fn spawns_ground_and_pad_on_enter() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    run_system_once(&mut world, spawn_world);

    let statics = world
        .query::<&RigidBody>()
        .iter(&world)
        .filter(|rb| matches!(**rb, RigidBody::Static))
        .count();
    assert_eq!(statics, 2);

    let mut ground = world.query_filtered::<&Transform, With<Ground>>();
    let tf = ground.single(&world).unwrap();
    // Top face sits exactly on ground_y.
    assert!((tf.translation.y + GROUND_THICKNESS * 0.5).abs() < 1e-6);
}

#[test]
fn ground_is_neutral_and_pad_is_safe() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    run_system_once(&mut world, spawn_world);

    let mut ground = world.query_filtered::<Option<&ContactKind>, With<Ground>>();
    assert!(ground.single(&world).unwrap().is_none());

    let mut pad = world.query_filtered::<(&ContactKind, &Transform), With<SafePad>>();
    let (kind, tf) = pad.single(&world).unwrap();
    assert_eq!(*kind, ContactKind::SafeGround);
    assert!(!kind.is_damaging());
    assert_eq!(tf.translation.x, Tunables::default().flight.spawn.x);
}
