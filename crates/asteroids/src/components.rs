//! Game-specific components

use serde::{Deserialize, Serialize};
use sim_kernel::ecs::Component;

/// Asteroid component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Asteroid {
    /// Asteroid size category
    pub size: AsteroidSize,

    /// Hits left before the asteroid breaks
    pub health: u32,
}

impl Component for Asteroid {}

impl Asteroid {
    /// Create an asteroid of the given size with one hit point
    pub fn new(size: AsteroidSize) -> Self {
        Self { size, health: 1 }
    }

    /// Subtract damage; returns true once health reaches zero
    pub fn take_damage(&mut self, damage: u32) -> bool {
        self.health = self.health.saturating_sub(damage);
        self.health == 0
    }
}

impl Default for Asteroid {
    fn default() -> Self {
        Self::new(AsteroidSize::Large)
    }
}

/// Asteroid size categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidSize {
    /// Large asteroid (splits into medium)
    Large,

    /// Medium asteroid (splits into small)
    Medium,

    /// Small asteroid (destroyed completely)
    Small,
}

impl AsteroidSize {
    /// Get the scale factor for this size
    pub fn scale_factor(self) -> f32 {
        match self {
            Self::Large => 2.0,
            Self::Medium => 1.5,
            Self::Small => 1.0,
        }
    }

    /// Get the points awarded for destroying this size
    pub fn points(self) -> u32 {
        match self {
            Self::Large => 20,
            Self::Medium => 50,
            Self::Small => 100,
        }
    }

    /// Get the next smaller size when split
    pub fn split_into(self) -> Option<Self> {
        match self {
            Self::Large => Some(Self::Medium),
            Self::Medium => Some(Self::Small),
            Self::Small => None,
        }
    }
}

/// Projectile component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projectile {
    /// Damage dealt on impact
    pub damage: u32,
}

impl Component for Projectile {}

impl Default for Projectile {
    fn default() -> Self {
        Self { damage: 1 }
    }
}
