//! Common, shared types.

pub mod debounce;
pub mod layers;
pub mod levels;
pub mod rng;
pub mod sets;
pub mod state;
pub mod tunables;

#[cfg(test)]
pub mod test_utils;
