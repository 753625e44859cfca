//! ECS World implementation

use super::storage::{AnyPool, ComponentPool};
use super::{Component, EntityId};
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Entity store errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldError {
    /// The entity does not exist in this world
    #[error("Invalid entity: {0}")]
    InvalidEntity(EntityId),
}

/// ECS World containing all entities and components
///
/// Owns entity lifetime. Removal is immediate and unconditional; callers that
/// remove while walking the entity list should either walk a snapshot from
/// [`World::entities`] or use [`World::queue_removal`] and
/// [`World::flush_removals`].
///
/// Pools are plain maps without an internal lock: every mutation goes through
/// `&mut World`, so the borrow checker already guarantees a single writer, and
/// the world is `Send + Sync` for a future parallel scheduler to share it.
#[derive(Default)]
pub struct World {
    entities: Vec<EntityId>,
    alive: HashSet<EntityId>,
    pools: HashMap<TypeId, Box<dyn AnyPool>>,
    pending_removals: Vec<EntityId>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Create a new entity with no components
    pub fn create(&mut self) -> EntityId {
        let entity = EntityId::next();
        self.entities.push(entity);
        self.alive.insert(entity);
        entity
    }

    /// Create an entity and attach components fluently
    pub fn spawn(&mut self) -> EntityBuilder<'_> {
        let entity = self.create();
        EntityBuilder { world: self, entity }
    }
    
    /// Add a component to an entity, replacing any existing one of that kind
    pub fn add_component<T: Component>(&mut self, entity: EntityId, component: T) -> Result<(), WorldError> {
        if !self.alive.contains(&entity) {
            return Err(WorldError::InvalidEntity(entity));
        }

        self.pool_mut_or_insert::<T>().insert(entity, component);
        Ok(())
    }
    
    /// Get a component from an entity
    pub fn get_component<T: Component>(&self, entity: EntityId) -> Option<&T> {
        self.pool::<T>()?.get(entity)
    }
    
    /// Get a mutable component from an entity
    pub fn get_component_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        self.pool_mut::<T>()?.get_mut(entity)
    }

    /// Check if entity has a component
    pub fn has_component<T: Component>(&self, entity: EntityId) -> bool {
        self.pool::<T>().is_some_and(|pool| pool.contains(entity))
    }

    /// Remove a component, returning true iff it was present
    pub fn remove_component<T: Component>(&mut self, entity: EntityId) -> bool {
        self.take_component::<T>(entity).is_some()
    }

    /// Remove and return a component
    pub fn take_component<T: Component>(&mut self, entity: EntityId) -> Option<T> {
        self.pool_mut::<T>()?.take(entity)
    }

    /// Remove an entity and all of its components
    ///
    /// Returns false if the entity was not alive.
    pub fn remove_entity(&mut self, entity: EntityId) -> bool {
        if !self.alive.remove(&entity) {
            return false;
        }

        for pool in self.pools.values_mut() {
            pool.remove(entity);
        }
        self.entities.retain(|&e| e != entity);
        true
    }

    /// Defer an entity's removal until [`World::flush_removals`]
    pub fn queue_removal(&mut self, entity: EntityId) {
        if self.alive.contains(&entity) && !self.pending_removals.contains(&entity) {
            self.pending_removals.push(entity);
        }
    }

    /// Whether an entity is waiting in the removal queue
    pub fn is_queued_for_removal(&self, entity: EntityId) -> bool {
        self.pending_removals.contains(&entity)
    }

    /// Apply queued removals, returning the entities actually removed
    pub fn flush_removals(&mut self) -> Vec<EntityId> {
        let pending = std::mem::take(&mut self.pending_removals);
        pending
            .into_iter()
            .filter(|&entity| self.remove_entity(entity))
            .collect()
    }

    /// Check whether an entity is alive
    pub fn contains(&self, entity: EntityId) -> bool {
        self.alive.contains(&entity)
    }

    /// Snapshot of all entity ids in insertion order
    ///
    /// The order is stable but carries no gameplay meaning.
    pub fn entities(&self) -> Vec<EntityId> {
        self.entities.clone()
    }

    /// Snapshot of the ids that carry a `T` component, in insertion order
    pub fn query<T: Component>(&self) -> Vec<EntityId> {
        match self.pool::<T>() {
            Some(pool) => self
                .entities
                .iter()
                .copied()
                .filter(|&entity| pool.contains(entity))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Number of alive entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the world has no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Remove every entity and component
    pub fn clear(&mut self) {
        self.entities.clear();
        self.alive.clear();
        self.pending_removals.clear();
        for pool in self.pools.values_mut() {
            pool.clear();
        }
    }

    fn pool<T: Component>(&self) -> Option<&ComponentPool<T>> {
        self.pools
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<ComponentPool<T>>()
    }

    fn pool_mut<T: Component>(&mut self) -> Option<&mut ComponentPool<T>> {
        self.pools
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<ComponentPool<T>>()
    }

    fn pool_mut_or_insert<T: Component>(&mut self) -> &mut ComponentPool<T> {
        let pool = self
            .pools
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentPool::<T>::new()));
        match pool.as_any_mut().downcast_mut::<ComponentPool<T>>() {
            Some(pool) => pool,
            None => unreachable!("component pool registered under a foreign TypeId"),
        }
    }
}

/// Fluent helper returned by [`World::spawn`]
pub struct EntityBuilder<'w> {
    world: &'w mut World,
    entity: EntityId,
}

impl EntityBuilder<'_> {
    /// Attach a component
    pub fn with<T: Component>(self, component: T) -> Self {
        self.world.pool_mut_or_insert::<T>().insert(self.entity, component);
        self
    }

    /// Finish and return the entity id
    pub fn id(self) -> EntityId {
        self.entity
    }
}
