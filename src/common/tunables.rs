//! Tunable gameplay constants.

use bevy::prelude::*;

/// Flight-controller constants.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightTunables {
    pub spawn: Vec3,
    pub ground_y: f32,
    pub half_height: f32,
    pub ground_epsilon: f32,
    pub gravity: f32,
    pub mass: f32,
    pub yaw_rate: f32,
    pub yaw_deadzone: f32,
    pub level_strength: f32,
    pub tilt_damping: f32,
    pub lift_deadzone: f32,
    pub max_ascend: f32,
    pub max_descend: f32,
    pub vertical_accel: f32,
    pub max_speed: f32,
    pub boost_speed: f32,
    pub horizontal_accel: f32,
    pub chase_offset: Vec3,
    pub chase_lerp: f32,
    pub cockpit_lerp: f32,
    /// Free-look orbit radius limits.
    pub orbit_min_distance: f32,
    pub orbit_max_distance: f32,
    /// Polar angle from straight up; the max keeps the camera at or above the horizon.
    pub orbit_min_polar: f32,
    pub orbit_max_polar: f32,
    /// Radius multiplier per unit of zoom input.
    pub orbit_zoom_step: f32,
    pub hit_cooldown: f32,
}

impl FlightTunables {
    #[inline]
    pub fn min_height(&self) -> f32 {
        self.ground_y + self.half_height + self.ground_epsilon
    }
}

impl Default for FlightTunables {
    fn default() -> Self {
        Self {
            spawn: Vec3::new(0.0, 2.0, 0.0),
            ground_y: 0.0,
            half_height: 0.2,
            ground_epsilon: 0.01,
            gravity: 9.81,
            mass: 1.0,
            yaw_rate: 2.3,
            yaw_deadzone: 0.06,
            level_strength: 6.5,
            tilt_damping: 0.92,
            lift_deadzone: 0.05,
            max_ascend: 3.2,
            max_descend: -2.6,
            vertical_accel: 3.5,
            max_speed: 3.0,
            boost_speed: 4.2,
            horizontal_accel: 2.2,
            chase_offset: Vec3::new(0.0, 2.0, 6.0),
            chase_lerp: 0.12,
            cockpit_lerp: 0.35,
            orbit_min_distance: 3.0,
            orbit_max_distance: 30.0,
            orbit_min_polar: 0.05,
            orbit_max_polar: std::f32::consts::FRAC_PI_2,
            orbit_zoom_step: 0.9,
            hit_cooldown: 0.6,
        }
    }
}

/// Projectile and enemy-fire constants.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatTunables {
    pub pool_capacity: usize,
    pub player_bullet_speed: f32,
    pub player_bullet_ttl: f32,
    pub enemy_bullet_ttl: f32,
    pub muzzle_forward: f32,
    pub muzzle_up: f32,
    pub enemy_muzzle: f32,
    pub player_radius: f32,
    pub enemy_radius: f32,
    pub fire_jitter: f32,
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
}

impl Default for CombatTunables {
    fn default() -> Self {
        Self {
            pool_capacity: 260,
            player_bullet_speed: 18.0,
            player_bullet_ttl: 1.4,
            enemy_bullet_ttl: 2.0,
            muzzle_forward: 0.9,
            muzzle_up: 0.15,
            enemy_muzzle: 0.8,
            player_radius: 0.55,
            enemy_radius: 0.70,
            fire_jitter: 0.15,
            bounds_min: Vec3::new(f32::NEG_INFINITY, -2.0, -240.0),
            bounds_max: Vec3::new(f32::INFINITY, 60.0, 40.0),
        }
    }
}

/// Run-level constants.
#[derive(Debug, Clone, PartialEq)]
pub struct RunTunables {
    pub max_hits: u8,
    pub starting_ammo: u32,
    pub ammo_cap: u32,
    pub ammo_floor_on_advance: u32,
    pub level_clear_delay: f32,
    pub hit_flash: f32,
    pub hit_marker: f32,
}

impl Default for RunTunables {
    fn default() -> Self {
        Self {
            max_hits: 5,
            starting_ammo: 30,
            ammo_cap: 999,
            ammo_floor_on_advance: 20,
            level_clear_delay: 1.2,
            hit_flash: 0.14,
            hit_marker: 0.09,
        }
    }
}

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub flight: FlightTunables,
    pub combat: CombatTunables,
    pub run: RunTunables,
    /// Debounce for coin / ammo collection contacts.
    pub pickup_cooldown: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            flight: FlightTunables::default(),
            combat: CombatTunables::default(),
            run: RunTunables::default(),
            pickup_cooldown: 0.25,
        }
    }
}
