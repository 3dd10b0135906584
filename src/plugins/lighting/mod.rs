//! Lighting plugin (render-only): sun, moon and sky colour per level.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::levels::{Visuals, level_spec};
use crate::common::state::GameState;
use crate::plugins::run::RunState;

#[derive(Component)]
pub struct Sun;

#[derive(Component)]
pub struct Moon;

const MOON_POSITION: Vec3 = Vec3::new(-40.0, 45.0, -160.0);

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), setup)
        .add_systems(Update, apply_level_visuals.run_if(in_state(GameState::InGame)));
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let visuals = level_spec(1).visuals;
    commands.spawn((
        Name::new("Sun"),
        Sun,
        DirectionalLight {
            illuminance: visuals.sun_lux,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(20.0, 40.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
        DespawnOnExit(GameState::InGame),
    ));

    commands.spawn((
        Name::new("Moon"),
        Moon,
        Mesh3d(meshes.add(Sphere::new(4.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.9, 0.92, 1.0),
            emissive: LinearRgba::rgb(0.8, 0.82, 0.9),
            unlit: true,
            ..default()
        })),
        moon_transform(&visuals),
        moon_visibility(&visuals),
        DespawnOnExit(GameState::InGame),
    ));
}

fn moon_transform(v: &Visuals) -> Transform {
    Transform::from_translation(MOON_POSITION).with_scale(Vec3::splat(v.moon_scale.max(0.01)))
}

fn moon_visibility(v: &Visuals) -> Visibility {
    if v.moon_scale > 0.0 { Visibility::Visible } else { Visibility::Hidden }
}

fn apply_level_visuals(
    run: Res<RunState>,
    mut clear: ResMut<ClearColor>,
    mut q_sun: Query<&mut DirectionalLight, With<Sun>>,
    mut q_moon: Query<(&mut Transform, &mut Visibility), With<Moon>>,
) {
    if !run.is_changed() {
        return;
    }
    let visuals = level_spec(run.level()).visuals;
    clear.0 = visuals.sky_color();
    for mut sun in &mut q_sun {
        sun.illuminance = visuals.sun_lux;
    }
    for (mut tf, mut vis) in &mut q_moon {
        *tf = moon_transform(&visuals);
        *vis = moon_visibility(&visuals);
    }
}
