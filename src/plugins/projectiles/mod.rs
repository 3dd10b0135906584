//! Projectiles plugin: one pooled bullet simulation for both factions.
//!
//! Bullets are plain slots in [`BulletPool`], not entities. Presentation mirrors the pool into
//! a fixed set of visual entities each frame.
//!
//! # Step (FixedUpdate, `SimSet::Combat`, only while the run is `Playing`)
//! ```text
//!   fire_player      consume the fire edge: ammo -> player round along the drone's forward
//!        │
//!   fire_enemies     tick every live enemy's timer; elapsed -> round aimed at the drone
//!        │
//!   advance_bullets  ttl -= dt, move, free on expiry or out of bounds
//!        │
//!   apply_hits       squared-distance tests -> RunState (damage / hit marker / kill)
//! ```
//! `sync_pool` runs in `SimSet::Spawn` and clears every slot as soon as the run id moves, so
//! no round outlives a restart or a level change.

pub mod combat;
pub mod pool;

use bevy::prelude::*;

use crate::common::sets::SimSet;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;

pub use combat::{Impact, enemy_shot, player_shot, resolve_hits};
pub use pool::{Bullet, BulletPool, Owner};

pub fn plugin(app: &mut App) {
    let capacity = app.world().resource::<Tunables>().combat.pool_capacity;

    app.insert_resource(BulletPool::new(capacity))
        .add_systems(
            FixedUpdate,
            combat::sync_pool
                .in_set(SimSet::Spawn)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedUpdate,
            (
                combat::fire_player,
                combat::fire_enemies,
                combat::advance_bullets,
                combat::apply_hits,
            )
                .chain()
                .in_set(SimSet::Combat)
                .run_if(in_state(GameState::InGame))
                .run_if(combat::combat_live),
        );
}

#[cfg(test)]
mod tests;
