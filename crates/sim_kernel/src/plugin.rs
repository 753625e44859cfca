//! Plugin lifecycle for gameplay feature modules
//!
//! A plugin seeds its entities on `start` and removes exactly those on
//! `stop`. Either argument may be missing, in which case the call does
//! nothing. The kernel does not make start/stop idempotent; each plugin tracks
//! that itself, usually through a [`SpawnTracker`].

use crate::ecs::{EntityId, SystemError, World};
use crate::state::SimulationState;

/// Start/stop hooks of a feature module
pub trait Plugin: Send {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Start order among plugins; lower starts earlier
    fn priority(&self) -> i32 {
        0
    }

    /// Populate entities and resources
    fn start(&mut self, state: Option<&SimulationState>, world: Option<&mut World>) -> Result<(), SystemError>;

    /// Remove everything `start` added
    fn stop(&mut self, state: Option<&SimulationState>, world: Option<&mut World>) -> Result<(), SystemError>;
}

/// Started flag plus the entities a plugin spawned
#[derive(Debug, Default, Clone)]
pub struct SpawnTracker {
    started: bool,
    spawned: Vec<EntityId>,
}

impl SpawnTracker {
    /// Create a tracker in the stopped state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark as started; returns false if it already was
    pub fn begin(&mut self) -> bool {
        !std::mem::replace(&mut self.started, true)
    }

    /// Remember an entity spawned by the plugin
    pub fn track(&mut self, entity: EntityId) {
        self.spawned.push(entity);
    }

    /// Whether the plugin is started
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Entities spawned and not yet released
    pub fn spawned(&self) -> &[EntityId] {
        &self.spawned
    }

    /// Remove every tracked entity still alive and mark as stopped
    ///
    /// Returns how many entities were removed; zero if not started.
    pub fn release(&mut self, world: &mut World) -> usize {
        if !std::mem::replace(&mut self.started, false) {
            return 0;
        }
        self.spawned
            .drain(..)
            .filter(|&entity| world.remove_entity(entity))
            .count()
    }
}
