//! Small data components shared by gameplay modules

use crate::ecs::{Component, EntityId};

/// Points awarded when this entity is destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreValue(pub u32);

impl Component for ScoreValue {}

/// Entity that fired or spawned this one (e.g. the shooter of a bullet)
///
/// Stored as a plain id; the owner may already be gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner {
    /// Owning entity
    pub shooter: EntityId,
}

impl Component for Owner {}
