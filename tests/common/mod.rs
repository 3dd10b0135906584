//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `drone_arcade::game::configure_headless` to install gameplay plugins.
//!
//! Virtual time advances by exactly one fixed timestep per `app.update()`, so every update
//! after the first runs `FixedUpdate` once.

#![allow(dead_code)]

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use drone_arcade::common::state::{GameMode, GameState};
use drone_arcade::plugins::input::{Edge, InputSource};

/// Matches `Time<Fixed>`'s default 64 Hz step.
pub const STEP: Duration = Duration::from_micros(15_625);

pub fn app_headless(mode: GameMode) -> App {
    let mut app = App::new();

    // Add AssetPlugin + ScenePlugin so avian's collider constructors find their resources.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ))
    .init_asset::<Mesh>()
    .insert_resource(TimeUpdateStrategy::ManualDuration(STEP))
    .insert_resource(mode);

    drone_arcade::game::configure_headless(&mut app);
    // Complete plugin lifecycle (as `App::run` would) so `Plugin::finish` resources exist.
    app.finish();
    app.cleanup();
    app
}

/// Boot into `InGame` with at least one fixed step behind us.
pub fn booted(mode: GameMode) -> App {
    let mut app = app_headless(mode);
    step(&mut app, 2);
    assert_eq!(*app.world().resource::<State<GameState>>().get(), GameState::InGame);
    app
}

pub fn step(app: &mut App, n: usize) {
    for _ in 0..n {
        app.update();
    }
}

/// Latch an edge and run one more fixed step so the run consumes it.
pub fn press(app: &mut App, edge: Edge) {
    app.world_mut().resource_mut::<InputSource>().press(edge);
    step(app, 1);
}
