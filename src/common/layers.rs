//! Collision layers.

use avian3d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    World,
    Drone,
    Hazard,
    Pickup,
    Boss,
}

/// Drone collides with everything it can touch.
#[inline]
pub fn drone_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Drone, [Layer::World, Layer::Hazard, Layer::Pickup, Layer::Boss])
}

#[inline]
pub fn hazard_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Hazard, [Layer::Drone, Layer::World])
}

/// "Disabled" without structural changes: empty filters collide with nothing.
#[inline]
pub fn spent_hazard_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Hazard, [] as [Layer; 0])
}

#[inline]
pub fn pickup_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Pickup, [Layer::Drone])
}

#[inline]
pub fn boss_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Boss, [Layer::Drone])
}

#[inline]
pub fn world_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::World, [Layer::Drone, Layer::Hazard])
}
