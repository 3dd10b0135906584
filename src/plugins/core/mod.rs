//! Core plugin: shared resources and global settings.

use bevy::prelude::*;

use crate::common::sets::SimSet;
use crate::common::tunables::Tunables;

/// Monotonic fixed-step counter. Keys the per-step input snapshot.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimStep(pub u64);

/// Marked for removal outside the fixed physics step.
#[derive(Component, Debug)]
pub struct PendingDespawn;

pub fn plugin(app: &mut App) {
    // Keeps a caller-provided value.
    app.init_resource::<Tunables>();
    app.init_resource::<SimStep>();
    app.insert_resource(ClearColor(Color::srgb(0.53, 0.81, 0.92)));
    app.add_systems(FixedUpdate, advance_step.in_set(SimSet::Input))
        .add_systems(PostUpdate, despawn_marked);
}

pub fn advance_step(mut step: ResMut<SimStep>) {
    step.0 += 1;
}

fn despawn_marked(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}
