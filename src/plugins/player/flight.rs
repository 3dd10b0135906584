//! Flight controller: input snapshot + body state -> forces and rotations.
//!
//! Pure over [`PhysicsBody`], so it runs the same against the avian3d adapter and a plain
//! test body. One call to [`FlightController::step`] is one simulation step, evaluated in a
//! fixed order: reset, freeze, ground clamp, yaw, auto-level, vertical force, horizontal force,
//! wind, camera (chase, cockpit or free-look orbit), pose.

use bevy::prelude::*;

use crate::common::tunables::FlightTunables;
use crate::plugins::input::InputSnapshot;
use crate::plugins::physics::PhysicsBody;

/// Steering frame of reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SteeringMode {
    /// Screen-relative: forward follows the camera.
    #[default]
    Assisted,
    /// Body-relative: forward follows the drone's nose.
    Real,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    #[default]
    Chase,
    Cockpit,
}

/// Post-step drone pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
    pub forward: Vec3,
}

/// Desired camera placement. The render camera mirrors this.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ChaseCamera {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Default for ChaseCamera {
    fn default() -> Self {
        let tun = FlightTunables::default();
        Self {
            position: tun.spawn + tun.chase_offset,
            look_at: tun.spawn,
        }
    }
}

impl ChaseCamera {
    /// Viewing direction flattened onto the ground plane. Falls back to `-Z` when looking
    /// straight down.
    pub fn flat_forward(&self) -> Vec3 {
        let mut f = self.look_at - self.position;
        f.y = 0.0;
        f.try_normalize().unwrap_or(Vec3::NEG_Z)
    }

    pub fn rotation(&self) -> Quat {
        Transform::from_translation(self.position)
            .looking_at(self.look_at, Vec3::Y)
            .rotation
    }
}

/// Everything the step needs that is not the body or the input.
#[derive(Debug, Clone, Copy)]
pub struct FlightContext {
    pub dt: f32,
    /// Step clock, drives the wind phase.
    pub time: f32,
    pub reset_token: u32,
    pub frozen: bool,
    pub disabled: bool,
    pub free_look: bool,
    pub steering: SteeringMode,
    pub camera: CameraMode,
    pub wind_strength: f32,
    pub wind_cap: f32,
}

/// Per-drone controller memory. Holds no copy of the body state.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightController {
    last_reset: u32,
}

impl FlightController {
    pub fn new(reset_token: u32) -> Self {
        Self { last_reset: reset_token }
    }

    /// Advance one step. Returns `None` when frozen, otherwise the post-update pose.
    pub fn step<B: PhysicsBody>(
        &mut self,
        body: &mut B,
        input: &InputSnapshot,
        ctx: &FlightContext,
        tun: &FlightTunables,
        camera: &mut ChaseCamera,
    ) -> Option<Pose> {
        if ctx.reset_token != self.last_reset {
            self.last_reset = ctx.reset_token;
            pin_to_spawn(body, tun);
            camera.position = tun.spawn + tun.chase_offset;
            camera.look_at = tun.spawn;
        }

        if ctx.frozen {
            pin_to_spawn(body, tun);
            return None;
        }

        clamp_to_floor(body, tun.min_height());
        let pos = body.position();

        if !ctx.disabled {
            steer(body, input, ctx, tun, camera, pos);
        }

        let rotation = body.rotation();
        let forward = (rotation * Vec3::NEG_Z).normalize();
        if ctx.free_look {
            orbit(camera, tun, body.position(), input.orbit, input.zoom);
        } else {
            follow(camera, ctx, tun, body.position(), rotation, forward);
        }

        Some(Pose { position: body.position(), rotation, forward })
    }
}

/// Keep the body at or above `min_y`, dropping only the downward part of its velocity.
/// Returns whether it had to move.
pub fn clamp_to_floor<B: PhysicsBody>(body: &mut B, min_y: f32) -> bool {
    let mut pos = body.position();
    if pos.y > min_y {
        return false;
    }
    pos.y = min_y;
    body.set_position(pos);
    let v = body.linear_velocity();
    if v.y < 0.0 {
        body.set_linear_velocity(Vec3::new(v.x, 0.0, v.z));
    }
    true
}

fn pin_to_spawn<B: PhysicsBody>(body: &mut B, tun: &FlightTunables) {
    body.set_position(tun.spawn);
    body.set_rotation(Quat::IDENTITY);
    body.set_linear_velocity(Vec3::ZERO);
    body.set_angular_velocity(Vec3::ZERO);
}

fn steer<B: PhysicsBody>(
    body: &mut B,
    input: &InputSnapshot,
    ctx: &FlightContext,
    tun: &FlightTunables,
    camera: &ChaseCamera,
    pos: Vec3,
) {
    let dt = ctx.dt;

    let mut q = body.rotation();
    if input.yaw.abs() > tun.yaw_deadzone {
        q = (Quat::from_axis_angle(Vec3::Y, input.yaw * tun.yaw_rate * dt) * q).normalize();
        body.set_rotation(q);
    }

    if !ctx.free_look {
        let up_body = (q * Vec3::Y).normalize();
        let angle = up_body.dot(Vec3::Y).clamp(-1.0, 1.0).acos();
        if angle > 1e-4 {
            // Upside down the cross product vanishes; any horizontal axis works.
            let axis = up_body
                .cross(Vec3::Y)
                .try_normalize()
                .unwrap_or_else(|| q * Vec3::X);
            let t = 1.0 - (-tun.level_strength * dt).exp();
            q = (Quat::from_axis_angle(axis, angle * t) * q).normalize();
            body.set_rotation(q);

            let w = body.angular_velocity();
            body.set_angular_velocity(Vec3::new(
                w.x * tun.tilt_damping,
                w.y,
                w.z * tun.tilt_damping,
            ));
        }
    }

    let v = body.linear_velocity();
    let m = body.mass();

    let lift = input.lift;
    let mut vy_target = 0.0;
    if lift > tun.lift_deadzone {
        vy_target = tun.max_ascend * lift;
    }
    if lift < -tun.lift_deadzone {
        vy_target = tun.max_descend * -lift;
        if pos.y <= tun.min_height() + 1e-3 {
            vy_target = 0.0;
        }
    }
    // Gravity is cancelled so a released stick holds altitude.
    let ay = (vy_target - v.y) * tun.vertical_accel + tun.gravity;

    let (forward, right) = match ctx.steering {
        SteeringMode::Assisted => {
            let f = camera.flat_forward();
            (f, f.cross(Vec3::Y).normalize())
        }
        SteeringMode::Real => ((q * Vec3::NEG_Z).normalize(), (q * Vec3::X).normalize()),
    };
    let raw = right * input.move_x + forward * -input.move_z;
    let dir = if input.move_x.abs() + input.move_z.abs() < 1e-3 {
        Vec3::ZERO
    } else {
        raw.normalize_or_zero()
    };
    let max_speed = if input.boost { tun.boost_speed } else { tun.max_speed };
    let ax = (dir.x * max_speed - v.x) * tun.horizontal_accel;
    let az = (dir.z * max_speed - v.z) * tun.horizontal_accel;

    body.apply_force(Vec3::new(ax, ay, az) * m);

    if ctx.wind_strength > 0.0 {
        body.apply_force(wind_force(ctx.time, ctx.wind_strength));
        let v = body.linear_velocity();
        body.set_linear_velocity(Vec3::new(
            v.x.clamp(-ctx.wind_cap, ctx.wind_cap),
            v.y,
            v.z.clamp(-ctx.wind_cap, ctx.wind_cap),
        ));
    }
}

/// Low-frequency horizontal gusting.
pub fn wind_force(t: f32, strength: f32) -> Vec3 {
    let gust = 0.6 + 0.4 * (t * 0.25).sin();
    Vec3::new(
        (t * 0.35).sin() * strength * gust,
        0.0,
        (t * 0.28).cos() * strength * 0.55 * gust,
    )
}

fn follow(
    camera: &mut ChaseCamera,
    ctx: &FlightContext,
    tun: &FlightTunables,
    pos: Vec3,
    rotation: Quat,
    forward: Vec3,
) {
    match ctx.camera {
        CameraMode::Cockpit => {
            let target = pos + Vec3::Y * 0.2 + forward * 0.28;
            camera.position = camera.position.lerp(target, tun.cockpit_lerp);
            camera.look_at = camera.position + forward * 8.0;
        }
        CameraMode::Chase => {
            let offset = match ctx.steering {
                SteeringMode::Assisted => rotation * tun.chase_offset,
                SteeringMode::Real => tun.chase_offset,
            };
            camera.position = camera.position.lerp(pos + offset, tun.chase_lerp);
            camera.look_at = pos;
        }
    }
}

/// Free-look: swing the camera around `target` on a sphere.
///
/// `look.x` turns about world up, `look.y` tilts toward the pole, and each unit of `zoom` pulls
/// in by one [`FlightTunables::orbit_zoom_step`]. Distance and polar angle are clamped every
/// call, so the camera never drops below the drone's horizon.
pub fn orbit(camera: &mut ChaseCamera, tun: &FlightTunables, target: Vec3, look: Vec2, zoom: f32) {
    let mut offset = camera.position - camera.look_at;
    if offset.length_squared() < 1e-6 {
        offset = tun.chase_offset;
    }

    let distance = (offset.length() * tun.orbit_zoom_step.powf(zoom))
        .clamp(tun.orbit_min_distance, tun.orbit_max_distance);
    let polar = ((offset.y / offset.length()).clamp(-1.0, 1.0).acos() - look.y)
        .clamp(tun.orbit_min_polar, tun.orbit_max_polar);
    let azimuth = offset.x.atan2(offset.z) - look.x;

    let (sin_p, cos_p) = polar.sin_cos();
    let (sin_a, cos_a) = azimuth.sin_cos();
    camera.position = target + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * distance;
    camera.look_at = target;
}
