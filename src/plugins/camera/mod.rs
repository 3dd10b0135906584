//! Camera plugin (render-only): mirrors [`ChaseCamera`] into the `Camera3d`.
//!
//! ```text
//! OnEnter(InGame): spawn MainCamera (+ DistanceFog)
//! PostUpdate:      follow_chase copies position / look-at, fog follows the level table
//! ```
//! The core never touches the camera entity. Smoothing already happened in the flight step.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::levels::level_spec;
use crate::common::state::GameState;
use crate::plugins::player::ChaseCamera;
use crate::plugins::run::RunState;

#[derive(Component)]
pub struct MainCamera;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_camera)
        .add_systems(
            PostUpdate,
            (follow_chase, fog_follows_level)
                .before(TransformSystems::Propagate)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn_camera(mut commands: Commands, chase: Res<ChaseCamera>) {
    let visuals = level_spec(1).visuals;
    commands.spawn((
        Name::new("MainCamera"),
        MainCamera,
        Camera3d::default(),
        Transform::from_translation(chase.position).looking_at(chase.look_at, Vec3::Y),
        DistanceFog {
            color: visuals.sky_color(),
            falloff: FogFalloff::Linear { start: 20.0, end: visuals.fog_far },
            ..default()
        },
        DespawnOnExit(GameState::InGame),
    ));
}

fn follow_chase(chase: Res<ChaseCamera>, mut q_cam: Query<&mut Transform, With<MainCamera>>) {
    let Ok(mut tf) = q_cam.single_mut() else {
        return;
    };
    tf.translation = chase.position;
    tf.rotation = chase.rotation();
}

fn fog_follows_level(run: Res<RunState>, mut q_fog: Query<&mut DistanceFog, With<MainCamera>>) {
    if !run.is_changed() {
        return;
    }
    let visuals = level_spec(run.level()).visuals;
    for mut fog in &mut q_fog {
        fog.color = visuals.sky_color();
        fog.falloff = FogFalloff::Linear { start: 20.0, end: visuals.fog_far };
    }
}
