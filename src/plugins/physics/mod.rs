//! Physics plugin: avian3d setup plus the body contract the flight code drives.
//!
//! Gameplay code never talks to the engine directly. It talks to [`PhysicsBody`]:
//! read/write pose and velocities, push world-space forces, query mass. [`BodyMut`] backs it
//! with avian's [`Forces`] query data, so pushed forces are integrated by the solver's own
//! substeps and cleared after the step.

use avian3d::dynamics::rigid_body::forces::ForcesItem;
use avian3d::prelude::*;
use bevy::prelude::*;

use crate::common::tunables::Tunables;

pub fn plugin(app: &mut App) {
    let g = app.world().resource::<Tunables>().flight.gravity;
    app.add_plugins(PhysicsPlugins::default());
    app.insert_resource(Gravity(Vec3::new(0.0, -g, 0.0)));
}

/// The physics-body contract consumed by the flight controller and hazard springs.
pub trait PhysicsBody {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, p: Vec3);
    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, q: Quat);
    fn linear_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, v: Vec3);
    fn angular_velocity(&self) -> Vec3;
    fn set_angular_velocity(&mut self, w: Vec3);
    /// World-space force; accumulates until the next integration.
    fn apply_force(&mut self, f: Vec3);
    fn mass(&self) -> f32;
}

/// What a body is, as seen by whoever touches it.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactKind {
    Hazard,
    Boss,
    Coin,
    Ammo,
    DangerGround,
    SafeGround,
}

impl ContactKind {
    /// Touching this costs the drone a hit point.
    #[inline]
    pub fn is_damaging(self) -> bool {
        matches!(self, Self::Hazard | Self::Boss | Self::DangerGround)
    }
}

/// Gameplay owner of a collider: its rigid body if it has one, else itself.
#[inline]
pub fn contact_owners(ev: &CollisionStart) -> (Entity, Entity) {
    (ev.body1.unwrap_or(ev.collider1), ev.body2.unwrap_or(ev.collider2))
}

/// Mass reported for a body whose mass properties have not been computed yet.
fn settled_mass(computed: &ComputedMass, fallback: f32) -> f32 {
    let m = computed.value();
    if m.is_finite() && m > 0.0 { m } else { fallback }
}

/// [`PhysicsBody`] over one entity: its `Transform` plus avian's force/velocity view.
pub struct BodyMut<'a, 'w, 's> {
    pub transform: &'a mut Transform,
    pub forces: &'a mut ForcesItem<'w, 's>,
    mass: f32,
}

impl<'a, 'w, 's> BodyMut<'a, 'w, 's> {
    /// `fallback_mass` covers the first step, before avian has filled in [`ComputedMass`].
    pub fn new(
        transform: &'a mut Transform,
        forces: &'a mut ForcesItem<'w, 's>,
        computed: &ComputedMass,
        fallback_mass: f32,
    ) -> Self {
        assert!(fallback_mass > 0.0, "body mass must be positive, got {fallback_mass}");
        let mass = settled_mass(computed, fallback_mass);
        Self { transform, forces, mass }
    }
}

impl PhysicsBody for BodyMut<'_, '_, '_> {
    #[inline]
    fn position(&self) -> Vec3 {
        self.transform.translation
    }
    #[inline]
    fn set_position(&mut self, p: Vec3) {
        self.transform.translation = p;
    }
    #[inline]
    fn rotation(&self) -> Quat {
        self.transform.rotation
    }
    #[inline]
    fn set_rotation(&mut self, q: Quat) {
        self.transform.rotation = q.normalize();
    }
    #[inline]
    fn linear_velocity(&self) -> Vec3 {
        self.forces.linear_velocity()
    }
    #[inline]
    fn set_linear_velocity(&mut self, v: Vec3) {
        *self.forces.linear_velocity_mut() = v;
    }
    #[inline]
    fn angular_velocity(&self) -> Vec3 {
        self.forces.angular_velocity()
    }
    #[inline]
    fn set_angular_velocity(&mut self, w: Vec3) {
        *self.forces.angular_velocity_mut() = w;
    }
    #[inline]
    fn apply_force(&mut self, f: Vec3) {
        self.forces.apply_force(f);
    }
    #[inline]
    fn mass(&self) -> f32 {
        self.mass
    }
}
