//! Concrete gameplay events published by the kernel

use super::Event;
use crate::ecs::EntityId;
use serde::{Deserialize, Serialize};

/// Why an entity was destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestructionCause {
    /// Hit by a projectile
    Projectile,
    /// Rammed or touched by another body
    Collision,
    /// Killed by the environment (walls, leaving the playfield)
    Environmental,
    /// Anything else (expired lifetime, scripted removal)
    Other,
}

/// An entity was destroyed
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDestroyed {
    /// The destroyed entity (already removed when listeners run)
    pub entity: EntityId,
    /// Classification of the cause
    pub cause: DestructionCause,
    /// Entity responsible, if any
    pub instigator: Option<EntityId>,
    /// Points awarded for the destruction
    pub score_value: u32,
}

impl Event for EntityDestroyed {
    fn source(&self) -> Option<EntityId> {
        Some(self.entity)
    }
}

/// Difficulty parameters at one moment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySnapshot {
    /// Difficulty level, starting at 1
    pub level: u32,
    /// Multiplier applied to hazard speeds
    pub speed_multiplier: f32,
    /// Seconds between hazard spawns
    pub spawn_interval: f32,
}

/// Difficulty parameters changed
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyChanged {
    /// Entity that triggered the change, if any
    pub source: Option<EntityId>,
    /// Parameters before the change
    pub previous: DifficultySnapshot,
    /// Parameters after the change
    pub current: DifficultySnapshot,
}

impl Event for DifficultyChanged {
    fn source(&self) -> Option<EntityId> {
        self.source
    }
}
