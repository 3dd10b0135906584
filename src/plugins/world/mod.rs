//! World plugin: the static ground slab and the launch pad.
//!
//! Both are plain colliders. The ground carries no [`ContactKind`], so touching it is neutral;
//! the pad is tagged `SafeGround`. Meshes are attached by presentation.

use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::world_layers;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::physics::ContactKind;

/// Ground slab footprint (x, z). Covers the whole playable corridor.
pub const GROUND_SIZE: Vec2 = Vec2::new(320.0, 320.0);
pub const GROUND_THICKNESS: f32 = 0.2;
/// The corridor runs toward `-Z`; centre the slab on it.
const GROUND_CENTER_Z: f32 = -100.0;
pub const PAD_RADIUS: f32 = 2.0;
pub const PAD_HEIGHT: f32 = 0.1;

#[derive(Component, Debug)]
pub struct Ground;

#[derive(Component, Debug)]
pub struct SafePad;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_world);
}

fn spawn_world(mut commands: Commands, tunables: Res<Tunables>) {
    let flight = &tunables.flight;

    commands.spawn((
        Name::new("Ground"),
        Ground,
        Transform::from_xyz(0.0, flight.ground_y - GROUND_THICKNESS * 0.5, GROUND_CENTER_Z),
        RigidBody::Static,
        Collider::cuboid(GROUND_SIZE.x, GROUND_THICKNESS, GROUND_SIZE.y),
        world_layers(),
        DespawnOnExit(GameState::InGame),
    ));

    commands.spawn((
        Name::new("SafePad"),
        SafePad,
        ContactKind::SafeGround,
        Transform::from_xyz(flight.spawn.x, flight.ground_y + PAD_HEIGHT * 0.5, flight.spawn.z),
        RigidBody::Static,
        Collider::cylinder(PAD_RADIUS, PAD_HEIGHT),
        world_layers(),
        DespawnOnExit(GameState::InGame),
    ));
}

#[cfg(test)]
mod tests;
