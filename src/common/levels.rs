//! Closed per-level tables.
//!
//! Levels are `1..=MAX_LEVEL`. Anything outside that range is a programmer error and panics.

use bevy::prelude::*;

pub const MAX_LEVEL: u8 = 8;
pub const BOSS_LEVEL: u8 = 8;

/// Hazard count per mine tier (tier = `min(level, 3)`).
pub const MINES_PER_TIER: [usize; 3] = [16, 26, 34];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Visuals {
    /// Clear colour and fog colour, sRGB.
    pub sky: [f32; 3],
    pub sun_lux: f32,
    pub fog_far: f32,
    /// `0.0` hides the moon.
    pub moon_scale: f32,
}

impl Visuals {
    pub fn sky_color(&self) -> Color {
        Color::srgb(self.sky[0], self.sky[1], self.sky[2])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelSpec {
    pub kills_required: u32,
    pub coins_required: u32,
    pub coin_count: usize,
    pub enemy_count: usize,
    pub enemy_hp: i32,
    /// Seconds between enemy shots, before jitter.
    pub enemy_fire_rate: f32,
    pub enemy_bullet_speed: f32,
    pub ammo_count: usize,
    pub mine_tier: u8,
    pub wind_strength: f32,
    pub wind_speed_cap: f32,
    pub visuals: Visuals,
}

impl LevelSpec {
    #[inline]
    pub fn mine_count(&self) -> usize {
        MINES_PER_TIER[usize::from(self.mine_tier - 1)]
    }
}

const fn row(
    kills_required: u32,
    coins_required: u32,
    coin_count: usize,
    enemy_count: usize,
    enemy_hp: i32,
    enemy_fire_rate: f32,
    enemy_bullet_speed: f32,
    ammo_count: usize,
    mine_tier: u8,
    wind_strength: f32,
    wind_speed_cap: f32,
    visuals: Visuals,
) -> LevelSpec {
    LevelSpec {
        kills_required,
        coins_required,
        coin_count,
        enemy_count,
        enemy_hp,
        enemy_fire_rate,
        enemy_bullet_speed,
        ammo_count,
        mine_tier,
        wind_strength,
        wind_speed_cap,
        visuals,
    }
}

const fn sky(hex: u32, sun_lux: f32, moon_scale: f32) -> Visuals {
    Visuals {
        sky: [
            ((hex >> 16) & 0xFF) as f32 / 255.0,
            ((hex >> 8) & 0xFF) as f32 / 255.0,
            (hex & 0xFF) as f32 / 255.0,
        ],
        sun_lux,
        fog_far: 180.0,
        moon_scale,
    }
}

static LEVELS: [LevelSpec; MAX_LEVEL as usize] = [
    row(3, 2, 6, 3, 1, 1.10, 10.0, 3, 1, 0.00, 3.0, sky(0x87CEEB, 12_000.0, 0.0)),
    row(4, 3, 7, 4, 1, 1.10, 10.0, 3, 2, 0.18, 3.0, sky(0x6F7F91, 10_000.0, 0.0)),
    row(5, 4, 8, 5, 1, 0.85, 10.0, 3, 3, 0.28, 3.4, sky(0x4C5A6B, 9_000.0, 0.0)),
    row(6, 5, 9, 6, 2, 0.85, 12.0, 4, 3, 0.28, 3.4, sky(0x2B3340, 7_500.0, 0.0)),
    row(7, 6, 10, 7, 2, 0.70, 12.0, 4, 3, 0.28, 3.4, sky(0x1B1F2A, 6_500.0, 1.3)),
    row(8, 7, 11, 8, 2, 0.70, 12.0, 4, 3, 0.28, 3.4, sky(0x11131A, 5_500.0, 1.6)),
    row(9, 8, 12, 9, 3, 0.55, 14.0, 5, 3, 0.28, 3.4, sky(0x080A10, 4_500.0, 1.9)),
    row(12, 10, 14, 12, 3, 0.55, 14.0, 6, 3, 0.28, 3.4, sky(0x000000, 3_800.0, 2.2)),
];

/// Look up a level row.
///
/// # Panics
/// If `level` is not in `1..=MAX_LEVEL`.
pub fn level_spec(level: u8) -> &'static LevelSpec {
    assert!(
        (1..=MAX_LEVEL).contains(&level),
        "level {level} is outside the level table (1..={MAX_LEVEL})"
    );
    &LEVELS[usize::from(level - 1)]
}
