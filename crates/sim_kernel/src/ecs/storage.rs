//! Typed component pools
//!
//! One [`ComponentPool`] exists per component type. The world keeps them
//! behind the type-erased [`AnyPool`] interface so it can evict an entity's
//! components without knowing their types.

use super::{Component, EntityId};
use std::any::Any;
use std::collections::HashMap;

/// Storage for every instance of one component type, keyed by owning entity
pub struct ComponentPool<T: Component> {
    data: HashMap<EntityId, T>,
}

impl<T: Component> ComponentPool<T> {
    /// Create an empty pool
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Insert a component, returning the one it replaced
    pub fn insert(&mut self, entity: EntityId, component: T) -> Option<T> {
        self.data.insert(entity, component)
    }

    /// Get an entity's component
    pub fn get(&self, entity: EntityId) -> Option<&T> {
        self.data.get(&entity)
    }

    /// Get an entity's component mutably
    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        self.data.get_mut(&entity)
    }

    /// Remove an entity's component
    pub fn take(&mut self, entity: EntityId) -> Option<T> {
        self.data.remove(&entity)
    }

    /// Check whether an entity has a component in this pool
    pub fn contains(&self, entity: EntityId) -> bool {
        self.data.contains_key(&entity)
    }

    /// Number of stored components
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T: Component> Default for ComponentPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a [`ComponentPool`]
pub(crate) trait AnyPool: Send + Sync {
    /// Drop the entity's component if present
    fn remove(&mut self, entity: EntityId) -> bool;

    /// Drop every component
    fn clear(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyPool for ComponentPool<T> {
    fn remove(&mut self, entity: EntityId) -> bool {
        self.data.remove(&entity).is_some()
    }

    fn clear(&mut self) {
        self.data.clear();
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
