//! Player plugin: the drone body, its flight controller and what it touches.
//!
//! Pipeline:
//! - FixedUpdate / `SimSet::Flight`: apply view toggles, then run [`FlightController::step`]
//!   against the drone's avian3d components and publish [`DronePose`] + [`ChaseCamera`].
//!   Control forces go through avian's `Forces`, so the solver integrates them.
//! - FixedPostUpdate (after avian writes back): snap the drone up to the floor height.
//! - FixedPostUpdate (after avian emits `CollisionStart`): damaging contacts, debounced.

pub mod flight;

use avian3d::collision::narrow_phase::CollisionEventSystems;
use avian3d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::debounce::Debounce;
use crate::common::layers::drone_layers;
use crate::common::levels::level_spec;
use crate::common::sets::SimSet;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::input::InputFrame;
use crate::plugins::physics::{BodyMut, ContactKind, contact_owners};
use crate::plugins::run::{RunState, RunTransition};

pub use flight::{CameraMode, ChaseCamera, FlightContext, FlightController, Pose, SteeringMode};

#[derive(Component)]
pub struct Drone;

/// Damage debounce for the drone. One contact can raise several collision-enter events.
#[derive(Component, Debug, Clone, Copy)]
pub struct HitCooldown(pub Debounce);

/// Latest post-step pose. `None` until a drone has flown one step.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct DronePose(pub Option<Pose>);

/// Player-selected view options.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PilotView {
    pub free_look: bool,
    pub steering: SteeringMode,
    pub camera: CameraMode,
}

impl PilotView {
    pub fn reset_camera(&mut self) {
        self.camera = CameraMode::Chase;
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<PilotView>()
        .init_resource::<DronePose>()
        .init_resource::<ChaseCamera>()
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(
            FixedUpdate,
            (apply_view_toggles, refresh_cooldown_on_start, fly)
                .chain()
                .in_set(SimSet::Flight),
        )
        .add_systems(
            FixedPostUpdate,
            (
                settle_on_floor.after(PhysicsSystems::Writeback),
                process_drone_contacts.after(CollisionEventSystems),
            )
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn(mut commands: Commands, tunables: Res<Tunables>, run: Res<RunState>) {
    let tun = &tunables.flight;

    commands.spawn((
        Name::new("Drone"),
        Drone,
        FlightController::new(run.run_id()),
        HitCooldown(Debounce::new(tun.hit_cooldown)),
        Transform::from_translation(tun.spawn),
        RigidBody::Dynamic,
        Collider::cuboid(0.8, tun.half_height * 2.0, 0.8),
        Mass(tun.mass),
        LinearDamping(3.0),
        AngularDamping(3.0),
        LockedAxes::new().lock_rotation_x().lock_rotation_z(),
        SweptCcd::default(),
        CollisionEventsEnabled,
        drone_layers(),
        DespawnOnExit(GameState::InGame),
    ));
}

fn apply_view_toggles(frame: Res<InputFrame>, run: Res<RunState>, mut view: ResMut<PilotView>) {
    let input = frame.0;
    if input.toggle_free_look_pressed {
        view.free_look = !view.free_look;
        debug!(free_look = view.free_look, "free look toggled");
    }
    if input.toggle_assist_pressed {
        view.steering = match view.steering {
            SteeringMode::Assisted => SteeringMode::Real,
            SteeringMode::Real => SteeringMode::Assisted,
        };
        debug!(steering = ?view.steering, "steering toggled");
    }
    // Cockpit only while actually flying.
    if input.toggle_cockpit_pressed && run.controls_enabled() {
        view.camera = match view.camera {
            CameraMode::Chase => CameraMode::Cockpit,
            CameraMode::Cockpit => CameraMode::Chase,
        };
        debug!(camera = ?view.camera, "camera toggled");
    }
    if input.reload_pressed {
        debug!(ammo = run.ammo(), "reload requested");
    }
}

/// A fresh run starts with a clean damage window.
fn refresh_cooldown_on_start(
    mut transitions: MessageReader<RunTransition>,
    mut q: Query<&mut HitCooldown, With<Drone>>,
) {
    let started = transitions
        .read()
        .any(|t| matches!(t, RunTransition::Started { .. }));
    if !started {
        return;
    }
    for mut cooldown in &mut q {
        cooldown.0.reset();
    }
}

#[allow(clippy::too_many_arguments)]
fn fly(
    time: Res<Time>,
    tunables: Res<Tunables>,
    frame: Res<InputFrame>,
    run: Res<RunState>,
    view: Res<PilotView>,
    mut camera: ResMut<ChaseCamera>,
    mut pose: ResMut<DronePose>,
    mut q: Query<
        (
            &mut FlightController,
            &mut Transform,
            Forces,
            &ComputedMass,
        ),
        With<Drone>,
    >,
) {
    let Ok((mut controller, mut tf, mut forces, computed)) = q.single_mut() else {
        pose.0 = None;
        return;
    };

    let level = level_spec(run.level());
    let ctx = FlightContext {
        dt: time.delta_secs(),
        time: time.elapsed_secs(),
        reset_token: run.run_id(),
        frozen: run.frozen(),
        disabled: !run.controls_enabled(),
        free_look: view.free_look,
        steering: view.steering,
        camera: view.camera,
        wind_strength: level.wind_strength,
        wind_cap: level.wind_speed_cap,
    };

    let mut body = BodyMut::new(&mut tf, &mut forces, computed, tunables.flight.mass);
    if let Some(p) = controller.step(&mut body, &frame.0, &ctx, &tunables.flight, &mut camera) {
        pose.0 = Some(p);
    }
}

/// The solver may leave the drone resting on the ground collider, just under the floor
/// height. Lift it back after every physics step.
fn settle_on_floor(
    tunables: Res<Tunables>,
    mut pose: ResMut<DronePose>,
    mut q: Query<(&mut Transform, &mut Position, &mut LinearVelocity), With<Drone>>,
) {
    let min_y = tunables.flight.min_height();
    for (mut tf, mut position, mut velocity) in &mut q {
        if tf.translation.y >= min_y {
            continue;
        }
        tf.translation.y = min_y;
        position.0.y = min_y;
        if velocity.y < 0.0 {
            velocity.y = 0.0;
        }
        if let Some(p) = pose.0.as_mut() {
            p.position = tf.translation;
        }
    }
}

/// Hazards, the boss and hostile ground cost one hit point, at most once per cooldown.
pub fn process_drone_contacts(
    time: Res<Time>,
    mut started: MessageReader<CollisionStart>,
    mut q_drone: Query<&mut HitCooldown, With<Drone>>,
    q_kind: Query<&ContactKind>,
    mut run: ResMut<RunState>,
    mut transitions: MessageWriter<RunTransition>,
) {
    let now = time.elapsed_secs();

    for ev in started.read() {
        let (a, b) = contact_owners(ev);
        let (drone, other) = if q_drone.contains(a) {
            (a, b)
        } else if q_drone.contains(b) {
            (b, a)
        } else {
            continue;
        };

        let Ok(kind) = q_kind.get(other) else {
            continue;
        };
        if !kind.is_damaging() {
            continue;
        }

        let Ok(mut cooldown) = q_drone.get_mut(drone) else {
            continue;
        };
        if !cooldown.0.try_fire(now) {
            debug!(?kind, "contact inside hit cooldown ignored");
            continue;
        }

        debug!(?kind, hp = run.hit_points(), "drone hit");
        if let Some(t) = run.apply_damage(now) {
            transitions.write(t);
        }
    }
}
