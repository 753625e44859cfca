//! Gameplay configuration
//!
//! Loaded through the kernel's [`Config`] trait, so presets can live in
//! `.toml` or `.ron` files next to the kernel config.

use crate::weapon::WeaponConfig;
use serde::{Deserialize, Serialize};
use sim_kernel::config::Config;
use sim_kernel::events::DifficultySnapshot;

/// Gameplay configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Asteroid field settings
    pub field: FieldConfig,

    /// Difficulty ramp
    pub difficulty: DifficultyConfig,

    /// Player weapon
    pub weapon: WeaponConfig,
}

impl Config for GameplayConfig {}

/// Asteroid field configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Asteroids seeded on start
    pub asteroid_count: u32,

    /// Slowest initial drift speed
    pub min_speed: f32,

    /// Fastest initial drift speed
    pub max_speed: f32,

    /// Largest spin in radians per second (either direction)
    pub max_spin: f32,

    /// Radius of a small asteroid; larger sizes scale from it
    pub base_radius: f32,

    /// No asteroid is seeded closer than this to the playfield centre
    pub safe_radius: f32,

    /// Child speed relative to the parent when splitting
    pub split_speedup: f32,

    /// Angle in radians between each child and the parent heading
    pub split_angle: f32,

    /// RNG seed; random when absent
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            asteroid_count: 5,
            min_speed: 20.0,
            max_speed: 60.0,
            max_spin: 1.0,
            base_radius: 12.0,
            safe_radius: 150.0,
            split_speedup: 1.25,
            split_angle: 0.5,
            seed: None,
        }
    }
}

/// Difficulty ramp configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Seconds of play per level
    pub level_interval: f32,

    /// Highest reachable level
    pub max_level: u32,

    /// Speed multiplier gained per level
    pub speed_step: f32,

    /// Spawn interval at level 1
    pub base_spawn_interval: f32,

    /// Spawn interval removed per level
    pub spawn_interval_step: f32,

    /// Spawn interval floor
    pub min_spawn_interval: f32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            level_interval: 30.0,
            max_level: 10,
            speed_step: 0.1,
            base_spawn_interval: 10.0,
            spawn_interval_step: 1.0,
            min_spawn_interval: 2.0,
        }
    }
}

impl DifficultyConfig {
    /// Level reached after `elapsed` seconds
    pub fn level_at(&self, elapsed: f32) -> u32 {
        if self.level_interval <= 0.0 {
            return self.max_level.max(1);
        }
        let earned = (elapsed.max(0.0) / self.level_interval).floor() as u32;
        earned.saturating_add(1).min(self.max_level.max(1))
    }

    /// Parameters at a level
    pub fn snapshot(&self, level: u32) -> DifficultySnapshot {
        let steps = level.saturating_sub(1) as f32;
        DifficultySnapshot {
            level,
            speed_multiplier: 1.0 + self.speed_step * steps,
            spawn_interval: (self.base_spawn_interval - self.spawn_interval_step * steps)
                .max(self.min_spawn_interval),
        }
    }
}
