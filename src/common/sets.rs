//! Fixed-step ordering.
//!
//! ```text
//! FixedUpdate:     Input -> Run -> Spawn -> Flight -> Actors -> Combat
//! FixedPostUpdate: avian step -> floor settle (after Writeback)
//!                  -> contact handlers (after CollisionEventSystems)
//! ```
//!
//! Input is sampled once in `Input` and read by value everywhere after it. A kill resolved in
//! `Combat` is visible to the run state in the same step because `Combat` writes it directly.

use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    Input,
    Run,
    Spawn,
    Flight,
    Actors,
    Combat,
}

pub fn configure(app: &mut App) {
    app.configure_sets(
        FixedUpdate,
        (
            SimSet::Input,
            SimSet::Run,
            SimSet::Spawn,
            SimSet::Flight,
            SimSet::Actors,
            SimSet::Combat,
        )
            .chain(),
    );
}
