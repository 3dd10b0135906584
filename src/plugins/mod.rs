//! Feature plugins.

use bevy::prelude::*;

pub mod core;
pub mod enemies;
pub mod hazards;
pub mod input;
pub mod physics;
pub mod pickups;
pub mod player;
pub mod projectiles;
pub mod run;
pub mod world;

// Render-only
pub mod camera;
pub mod lighting;
pub mod presentation;

/// Register gameplay plugins that work in headless tests.
///
/// Order matters where a plugin reads another's resources in `build`: core inserts
/// `Tunables` before physics and projectiles size themselves from it.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    input::plugin(app);
    run::plugin(app);
    world::plugin(app);
    player::plugin(app);
    hazards::plugin(app);
    pickups::plugin(app);
    enemies::plugin(app);
    projectiles::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    lighting::plugin(app);
    camera::plugin(app);
    presentation::plugin(app);
}
