//! Test helpers.
//!
//! Systems that use `Commands` enqueue structural changes; `world.flush()` applies them before
//! assertions run.

use std::time::Duration;

use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

use crate::plugins::physics::PhysicsBody;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// A `Time` whose last step was `dt` long and whose clock reads `elapsed`.
pub fn time_at(elapsed: f32, dt: f32) -> Time {
    let mut t = Time::<()>::default();
    t.advance_to(Duration::from_secs_f32((elapsed - dt).max(0.0)));
    t.advance_by(Duration::from_secs_f32(dt));
    t
}

/// Plain in-memory body with semi-implicit Euler integration.
#[derive(Debug, Clone, PartialEq)]
pub struct SimBody {
    pub position: Vec3,
    pub rotation: Quat,
    pub linear: Vec3,
    pub angular: Vec3,
    pub force: Vec3,
    pub mass: f32,
}

impl Default for SimBody {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 0.0),
            rotation: Quat::IDENTITY,
            linear: Vec3::ZERO,
            angular: Vec3::ZERO,
            force: Vec3::ZERO,
            mass: 1.0,
        }
    }
}

impl SimBody {
    /// Consume accumulated force, apply `gravity` and move.
    pub fn integrate(&mut self, gravity: f32, dt: f32) {
        self.linear += (self.force / self.mass + Vec3::NEG_Y * gravity) * dt;
        self.position += self.linear * dt;
        self.force = Vec3::ZERO;
    }
}

impl PhysicsBody for SimBody {
    fn position(&self) -> Vec3 {
        self.position
    }
    fn set_position(&mut self, p: Vec3) {
        self.position = p;
    }
    fn rotation(&self) -> Quat {
        self.rotation
    }
    fn set_rotation(&mut self, q: Quat) {
        self.rotation = q;
    }
    fn linear_velocity(&self) -> Vec3 {
        self.linear
    }
    fn set_linear_velocity(&mut self, v: Vec3) {
        self.linear = v;
    }
    fn angular_velocity(&self) -> Vec3 {
        self.angular
    }
    fn set_angular_velocity(&mut self, w: Vec3) {
        self.angular = w;
    }
    fn apply_force(&mut self, f: Vec3) {
        self.force += f;
    }
    fn mass(&self) -> f32 {
        self.mass
    }
}
