//! Deterministic seeded PRNG for procedural layouts.
//!
//! mulberry32: a 32-bit add / multiply / xor-shift mixer. Pure integer state, no platform
//! entropy, so a seed always reproduces the same stream inside this crate.

/// Seed recipe for one spawner: `base + run_id * run_mul + level * level_mul` (wrapping).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedRecipe {
    pub base: u32,
    pub run_mul: u32,
    pub level_mul: u32,
}

impl SeedRecipe {
    pub const MINES: Self = Self { base: 4242, run_mul: 613, level_mul: 29 };
    pub const COINS: Self = Self { base: 9001, run_mul: 999, level_mul: 77 };
    pub const AMMO: Self = Self { base: 5000, run_mul: 777, level_mul: 91 };
    pub const ENEMIES: Self = Self { base: 2000, run_mul: 333, level_mul: 17 };

    #[inline]
    pub fn seed(self, run_id: u32, level: u8) -> u32 {
        self.base
            .wrapping_add(run_id.wrapping_mul(self.run_mul))
            .wrapping_add(u32::from(level).wrapping_mul(self.level_mul))
    }

    #[inline]
    pub fn stream(self, run_id: u32, level: u8) -> Prng {
        Prng::new(self.seed(run_id, level))
    }
}

#[derive(Clone, Debug)]
pub struct Prng {
    state: u32,
}

impl Prng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform in `[0, 1)`.
    ///
    /// Only the top 24 bits are used so the quotient is exact in `f32` and never rounds up to 1.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / 16_777_216.0
    }

    #[inline]
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Uniform in `[-half, half)`.
    #[inline]
    pub fn centered(&mut self, half: f32) -> f32 {
        (self.next_f32() - 0.5) * half * 2.0
    }
}
