//! Presentation plugin (render-only): procedural meshes for everything the simulation owns.
//!
//! Entity-backed actors (drone, mines, pickups, boss, ground) get a mesh the frame they
//! appear. Slot-backed state (gunships, bullets, explosion particles) is mirrored into a fixed
//! set of visual entities every frame; nothing here writes simulation state.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::enemies::boss::{BOSS_RADIUS, Boss};
use crate::plugins::enemies::{CombatWorld, EXPLOSION_PARTICLES};
use crate::plugins::hazards::{MINE_RADIUS, Mine, MineState};
use crate::plugins::pickups::{Pickup, Reward};
use crate::plugins::player::Drone;
use crate::plugins::projectiles::{BulletPool, Owner};
use crate::plugins::run::RunState;
use crate::plugins::world::{GROUND_SIZE, GROUND_THICKNESS, Ground, PAD_HEIGHT, PAD_RADIUS, SafePad};

/// Explosions drawn at once; older ones beyond this are simply not shown.
const MAX_EXPLOSIONS: usize = 12;
const PICKUP_SPIN: f32 = 1.8;

#[derive(Resource)]
struct Palette {
    drone: (Handle<Mesh>, Handle<StandardMaterial>),
    drone_hurt: Handle<StandardMaterial>,
    mine: (Handle<Mesh>, Handle<StandardMaterial>),
    mine_spent: Handle<StandardMaterial>,
    coin: (Handle<Mesh>, Handle<StandardMaterial>),
    ammo: (Handle<Mesh>, Handle<StandardMaterial>),
    boss: (Handle<Mesh>, Handle<StandardMaterial>),
    enemy: (Handle<Mesh>, Handle<StandardMaterial>),
    /// Gunships while the hit marker is up.
    enemy_hit: Handle<StandardMaterial>,
    ground: (Handle<Mesh>, Handle<StandardMaterial>),
    pad: (Handle<Mesh>, Handle<StandardMaterial>),
    bullet: Handle<Mesh>,
    player_round: Handle<StandardMaterial>,
    enemy_round: Handle<StandardMaterial>,
    spark: (Handle<Mesh>, Handle<StandardMaterial>),
}

/// Visual for gunship slot `.0`.
#[derive(Component)]
struct EnemyVisual(usize);

/// Visual for bullet pool slot `.0`.
#[derive(Component)]
struct BulletVisual(usize);

/// Visual for particle `.1` of explosion `.0`.
#[derive(Component)]
struct SparkVisual(usize, usize);

/// Gunship batch the enemy visuals were built for.
#[derive(Resource, Default)]
struct EnemyVisualGeneration(Option<u32>);

pub fn plugin(app: &mut App) {
    app.init_resource::<Palette>()
        .init_resource::<EnemyVisualGeneration>()
        .add_systems(OnEnter(GameState::InGame), spawn_slot_visuals)
        .add_systems(
            Update,
            (
                dress_new_actors,
                show_spent_mines,
                spin_pickups,
                flash_drone_on_hit,
                rebuild_enemy_visuals,
                mirror_enemies,
                mirror_bullets,
                mirror_sparks,
            )
                .run_if(in_state(GameState::InGame)),
        );
}

fn lit(materials: &mut Assets<StandardMaterial>, color: Color) -> Handle<StandardMaterial> {
    materials.add(StandardMaterial { base_color: color, perceptual_roughness: 0.7, ..default() })
}

fn glowing(materials: &mut Assets<StandardMaterial>, color: Color) -> Handle<StandardMaterial> {
    materials.add(StandardMaterial {
        base_color: color,
        emissive: color.to_linear() * 4.0,
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        ..default()
    })
}

impl FromWorld for Palette {
    fn from_world(world: &mut World) -> Self {
        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        let m = &mut *materials;
        let mine_spent = glowing(m, Color::srgba(1.0, 0.55, 0.1, 0.6));
        let player_round = glowing(m, Color::srgb(1.0, 0.9, 0.3));
        let enemy_round = glowing(m, Color::srgb(1.0, 0.25, 0.2));
        let spark = glowing(m, Color::srgb(1.0, 0.6, 0.15));
        let drone_hurt = lit(m, Color::srgb(1.0, 0.2, 0.2));
        let enemy_hit = glowing(m, Color::srgb(1.0, 1.0, 1.0));
        let colors = [
            lit(m, Color::srgb(0.85, 0.86, 0.9)),
            lit(m, Color::srgb(0.75, 0.1, 0.1)),
            lit(m, Color::srgb(1.0, 0.82, 0.2)),
            lit(m, Color::srgb(0.3, 0.55, 0.25)),
            lit(m, Color::srgb(0.35, 0.05, 0.4)),
            lit(m, Color::srgb(0.4, 0.42, 0.48)),
            lit(m, Color::srgb(0.22, 0.3, 0.2)),
            lit(m, Color::srgb(0.2, 0.45, 0.8)),
        ];
        let [drone, mine, coin, ammo, boss, enemy, ground, pad] = colors;

        let mut meshes = world.resource_mut::<Assets<Mesh>>();
        Self {
            drone: (meshes.add(Cuboid::new(0.8, 0.4, 0.8)), drone),
            drone_hurt,
            mine: (meshes.add(Sphere::new(MINE_RADIUS)), mine),
            mine_spent,
            coin: (meshes.add(Cylinder::new(0.35, 0.08)), coin),
            ammo: (meshes.add(Cuboid::new(0.6, 0.4, 0.6)), ammo),
            boss: (meshes.add(Sphere::new(BOSS_RADIUS)), boss),
            enemy: (meshes.add(Cuboid::new(1.2, 0.5, 1.2)), enemy),
            enemy_hit,
            ground: (meshes.add(Cuboid::new(GROUND_SIZE.x, GROUND_THICKNESS, GROUND_SIZE.y)), ground),
            pad: (meshes.add(Cylinder::new(PAD_RADIUS, PAD_HEIGHT)), pad),
            bullet: meshes.add(Sphere::new(0.08)),
            player_round,
            enemy_round,
            spark: (meshes.add(Sphere::new(0.06)), spark),
        }
    }
}

fn spawn_slot_visuals(mut commands: Commands, palette: Res<Palette>, tunables: Res<Tunables>) {
    for slot in 0..tunables.combat.pool_capacity {
        commands.spawn((
            BulletVisual(slot),
            Mesh3d(palette.bullet.clone()),
            MeshMaterial3d(palette.player_round.clone()),
            Transform::default(),
            Visibility::Hidden,
            DespawnOnExit(GameState::InGame),
        ));
    }
    for x in 0..MAX_EXPLOSIONS {
        for p in 0..EXPLOSION_PARTICLES {
            commands.spawn((
                SparkVisual(x, p),
                Mesh3d(palette.spark.0.clone()),
                MeshMaterial3d(palette.spark.1.clone()),
                Transform::default(),
                Visibility::Hidden,
                DespawnOnExit(GameState::InGame),
            ));
        }
    }
}

#[allow(clippy::type_complexity)]
fn dress_new_actors(
    mut commands: Commands,
    palette: Res<Palette>,
    q_drone: Query<Entity, Added<Drone>>,
    q_mines: Query<Entity, Added<Mine>>,
    q_pickups: Query<(Entity, &Pickup), Added<Pickup>>,
    q_boss: Query<Entity, Added<Boss>>,
    q_ground: Query<Entity, Added<Ground>>,
    q_pad: Query<Entity, Added<SafePad>>,
) {
    let mut dress = |e: Entity, (mesh, mat): &(Handle<Mesh>, Handle<StandardMaterial>)| {
        commands
            .entity(e)
            .insert((Mesh3d(mesh.clone()), MeshMaterial3d(mat.clone())));
    };
    for e in &q_drone {
        dress(e, &palette.drone);
    }
    for e in &q_mines {
        dress(e, &palette.mine);
    }
    for (e, pickup) in &q_pickups {
        match pickup.spec.reward {
            Reward::Coin => dress(e, &palette.coin),
            Reward::Ammo(_) => dress(e, &palette.ammo),
        }
    }
    for e in &q_boss {
        dress(e, &palette.boss);
    }
    for e in &q_ground {
        dress(e, &palette.ground);
    }
    for e in &q_pad {
        dress(e, &palette.pad);
    }
}

fn show_spent_mines(
    palette: Res<Palette>,
    mut q: Query<(&Mine, &mut MeshMaterial3d<StandardMaterial>, &mut Transform), Changed<Mine>>,
) {
    for (mine, mut mat, mut tf) in &mut q {
        if let MineState::Exploding { remaining } = mine.state {
            mat.0 = palette.mine_spent.clone();
            tf.scale = Vec3::splat(1.0 + (1.0 - remaining) * 2.5);
        }
    }
}

fn spin_pickups(time: Res<Time>, mut q: Query<&mut Transform, With<Pickup>>) {
    let turn = Quat::from_rotation_y(PICKUP_SPIN * time.delta_secs());
    for mut tf in &mut q {
        tf.rotation = turn * tf.rotation;
    }
}

/// Run deadlines are on the fixed-step clock.
fn flash_drone_on_hit(
    time: Res<Time<Fixed>>,
    run: Res<RunState>,
    palette: Res<Palette>,
    mut q: Query<&mut MeshMaterial3d<StandardMaterial>, With<Drone>>,
) {
    let want = if run.hit_flash_active(time.elapsed_secs()) {
        &palette.drone_hurt
    } else {
        &palette.drone.1
    };
    for mut mat in &mut q {
        if mat.0 != *want {
            mat.0 = want.clone();
        }
    }
}

fn rebuild_enemy_visuals(
    mut commands: Commands,
    palette: Res<Palette>,
    combat: Res<CombatWorld>,
    mut built: ResMut<EnemyVisualGeneration>,
    q_old: Query<Entity, With<EnemyVisual>>,
) {
    if built.0 == Some(combat.generation()) {
        return;
    }
    built.0 = Some(combat.generation());
    for e in &q_old {
        commands.entity(e).despawn();
    }
    for (i, enemy) in combat.enemies().iter().enumerate() {
        commands.spawn((
            Name::new(format!("Gunship({})", enemy.id)),
            EnemyVisual(i),
            Mesh3d(palette.enemy.0.clone()),
            MeshMaterial3d(palette.enemy.1.clone()),
            Transform::from_translation(enemy.position),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

fn mirror_enemies(
    time: Res<Time<Fixed>>,
    run: Res<RunState>,
    palette: Res<Palette>,
    combat: Res<CombatWorld>,
    mut q: Query<(&EnemyVisual, &mut Visibility, &mut MeshMaterial3d<StandardMaterial>)>,
) {
    let want = if run.hit_marker_active(time.elapsed_secs()) {
        &palette.enemy_hit
    } else {
        &palette.enemy.1
    };
    for (v, mut vis, mut mat) in &mut q {
        let alive = combat.enemies().get(v.0).is_some_and(|e| e.alive);
        vis.set_if_neq(if alive { Visibility::Visible } else { Visibility::Hidden });
        if mat.0 != *want {
            mat.0 = want.clone();
        }
    }
}

fn mirror_bullets(
    palette: Res<Palette>,
    pool: Res<BulletPool>,
    mut q: Query<(
        &BulletVisual,
        &mut Transform,
        &mut Visibility,
        &mut MeshMaterial3d<StandardMaterial>,
    )>,
) {
    for (v, mut tf, mut vis, mut mat) in &mut q {
        let b = pool
            .slots()
            .get(v.0)
            .expect("bullet visual slot outside the pool");
        if !b.active {
            vis.set_if_neq(Visibility::Hidden);
            continue;
        }
        tf.translation = b.position;
        let want = match b.owner {
            Owner::Player => &palette.player_round,
            Owner::Enemy => &palette.enemy_round,
        };
        if mat.0 != *want {
            mat.0 = want.clone();
        }
        vis.set_if_neq(Visibility::Visible);
    }
}

fn mirror_sparks(combat: Res<CombatWorld>, mut q: Query<(&SparkVisual, &mut Transform, &mut Visibility)>) {
    let explosions = combat.explosions();
    let shown = &explosions[explosions.len().saturating_sub(MAX_EXPLOSIONS)..];
    for (v, mut tf, mut vis) in &mut q {
        let Some(x) = shown.get(v.0) else {
            vis.set_if_neq(Visibility::Hidden);
            continue;
        };
        let p = &x.particles[v.1];
        tf.translation = x.particle_position(p);
        tf.scale = Vec3::splat(x.alpha().max(0.05));
        vis.set_if_neq(Visibility::Visible);
    }
}
