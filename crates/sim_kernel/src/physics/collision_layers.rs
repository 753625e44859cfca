//! Collision layer system for filtering collision detection
//! 
//! Every collider sits on exactly one [`CollisionLayer`] and carries a set of
//! [`CollisionGroups`] tags. Layers decide *whether* two colliders are tested
//! (through the [`InteractionMatrix`]); groups decide *which* response
//! handlers fire.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Exclusive collision layer of a collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CollisionLayer {
    /// Player ship
    Player,
    /// Shots fired by the player
    PlayerProjectile,
    /// Enemy ships
    Enemy,
    /// Shots fired by enemies
    EnemyProjectile,
    /// Asteroids and other drifting hazards
    Asteroid,
    /// Pickups and collectibles
    Pickup,
    /// Static environment geometry
    Environment,
}

impl CollisionLayer {
    /// Every layer, in declaration order
    pub const ALL: [Self; 7] = [
        Self::Player,
        Self::PlayerProjectile,
        Self::Enemy,
        Self::EnemyProjectile,
        Self::Asteroid,
        Self::Pickup,
        Self::Environment,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    /// Whether this layer carries projectiles
    pub const fn is_projectile(self) -> bool {
        matches!(self, Self::PlayerProjectile | Self::EnemyProjectile)
    }
}

bitflags! {
    /// Response-matching tags; a collider may carry several
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct CollisionGroups: u32 {
        /// Sides with the player
        const FRIENDLY = 1 << 0;
        /// Hurts the player
        const HOSTILE = 1 << 1;
        /// Can be destroyed by collisions
        const DESTRUCTIBLE = 1 << 2;
        /// Takes no side
        const NEUTRAL = 1 << 3;
    }
}

/// Symmetric table of which layers are tested against each other
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionMatrix {
    rows: [[bool; CollisionLayer::ALL.len()]; CollisionLayer::ALL.len()],
}

impl InteractionMatrix {
    /// Matrix in which no layers interact
    pub fn empty() -> Self {
        Self {
            rows: [[false; CollisionLayer::ALL.len()]; CollisionLayer::ALL.len()],
        }
    }

    /// Matrix in which every layer interacts with every layer
    pub fn all() -> Self {
        Self {
            rows: [[true; CollisionLayer::ALL.len()]; CollisionLayer::ALL.len()],
        }
    }

    /// Let two layers interact (order does not matter)
    pub fn allow(mut self, a: CollisionLayer, b: CollisionLayer) -> Self {
        self.set(a, b, true);
        self
    }

    /// Stop two layers from interacting (order does not matter)
    pub fn deny(mut self, a: CollisionLayer, b: CollisionLayer) -> Self {
        self.set(a, b, false);
        self
    }

    /// Set whether two layers interact
    pub fn set(&mut self, a: CollisionLayer, b: CollisionLayer, interacts: bool) {
        self.rows[a.index()][b.index()] = interacts;
        self.rows[b.index()][a.index()] = interacts;
    }

    /// Check if two layers should be tested for overlap
    pub fn interacts(&self, a: CollisionLayer, b: CollisionLayer) -> bool {
        self.rows[a.index()][b.index()]
    }
}

impl Default for InteractionMatrix {
    /// The arcade matrix: ships, shots and hazards hit what they plausibly
    /// should, and friendly fire is off.
    fn default() -> Self {
        use CollisionLayer::{Asteroid, Enemy, EnemyProjectile, Environment, Pickup, Player, PlayerProjectile};

        Self::empty()
            .allow(Player, Enemy)
            .allow(Player, EnemyProjectile)
            .allow(Player, Asteroid)
            .allow(Player, Pickup)
            .allow(Player, Environment)
            .allow(PlayerProjectile, Enemy)
            .allow(PlayerProjectile, Asteroid)
            .allow(PlayerProjectile, Environment)
            .allow(EnemyProjectile, Asteroid)
            .allow(EnemyProjectile, Environment)
            .allow(Enemy, Asteroid)
            .allow(Enemy, Environment)
            .allow(Asteroid, Environment)
    }
}
