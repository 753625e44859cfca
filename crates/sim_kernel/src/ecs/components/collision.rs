//! Collision components for ECS
//!
//! [`ColliderComponent`] describes how an entity is classified and sized for
//! overlap tests. [`CollisionResponseComponent`] holds the handlers invoked
//! when it touches something.

use crate::ecs::{Component, EntityId, World};
use crate::ecs::components::TransformComponent;
use crate::foundation::math::Vec2;
use crate::physics::collision_layers::{CollisionGroups, CollisionLayer};
use std::fmt;
use std::sync::Arc;

/// Component that marks an entity as taking part in collision detection
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderComponent {
    /// Exclusive collision layer
    pub layer: CollisionLayer,

    /// Response-matching tags
    pub groups: CollisionGroups,

    /// Radius override; the transform radius is used when `None`
    pub radius: Option<f32>,

    /// Disabled colliders are skipped entirely
    pub enabled: bool,
}

impl Component for ColliderComponent {}

impl ColliderComponent {
    /// Create a collider on a layer with no groups
    pub fn new(layer: CollisionLayer) -> Self {
        Self {
            layer,
            groups: CollisionGroups::empty(),
            radius: None,
            enabled: true,
        }
    }

    /// Add group tags
    pub fn with_groups(mut self, groups: CollisionGroups) -> Self {
        self.groups |= groups;
        self
    }

    /// Override the radius taken from the transform
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Effective radius given the entity's transform
    pub fn radius(&self, transform: &TransformComponent) -> f32 {
        self.radius.unwrap_or(transform.radius)
    }

    /// Axis-aligned bounds `(min, max)` derived from the radius
    pub fn bounds(&self, transform: &TransformComponent) -> (Vec2, Vec2) {
        let r = self.radius(transform);
        let extent = Vec2::new(r, r);
        (transform.position - extent, transform.position + extent)
    }
}

/// Collision response callback
///
/// Receives `(self, other, world)` and returns true when `self` should be
/// treated as destroyed.
pub type ResponseHandler = Arc<dyn Fn(EntityId, EntityId, &mut World) -> bool + Send + Sync>;

/// Per-layer and per-group response handlers of one entity
///
/// When the owner touches another collider, handlers registered for the other
/// collider's layer run first, then handlers for any group it carries.
#[derive(Clone, Default)]
pub struct CollisionResponseComponent {
    by_layer: Vec<(CollisionLayer, ResponseHandler)>,
    by_group: Vec<(CollisionGroups, ResponseHandler)>,
}

impl Component for CollisionResponseComponent {}

impl CollisionResponseComponent {
    /// Create an empty response table
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to contact with colliders on `layer`
    pub fn on_layer<F>(mut self, layer: CollisionLayer, handler: F) -> Self
    where
        F: Fn(EntityId, EntityId, &mut World) -> bool + Send + Sync + 'static,
    {
        let handler: ResponseHandler = Arc::new(handler);
        self.by_layer.push((layer, handler));
        self
    }

    /// Respond to contact with colliders carrying any of `groups`
    pub fn on_group<F>(mut self, groups: CollisionGroups, handler: F) -> Self
    where
        F: Fn(EntityId, EntityId, &mut World) -> bool + Send + Sync + 'static,
    {
        let handler: ResponseHandler = Arc::new(handler);
        self.by_group.push((groups, handler));
        self
    }

    /// Handlers matching a collider with the given layer and groups
    pub fn handlers_for(&self, layer: CollisionLayer, groups: CollisionGroups) -> Vec<ResponseHandler> {
        let layer_handlers = self
            .by_layer
            .iter()
            .filter(|(l, _)| *l == layer)
            .map(|(_, handler)| handler);
        let group_handlers = self
            .by_group
            .iter()
            .filter(|(g, _)| g.intersects(groups))
            .map(|(_, handler)| handler);
        layer_handlers.chain(group_handlers).cloned().collect()
    }

    /// Whether any handler is registered
    pub fn is_empty(&self) -> bool {
        self.by_layer.is_empty() && self.by_group.is_empty()
    }
}

impl fmt::Debug for CollisionResponseComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionResponseComponent")
            .field("layers", &self.by_layer.iter().map(|(l, _)| *l).collect::<Vec<_>>())
            .field("groups", &self.by_group.iter().map(|(g, _)| *g).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_falls_back_to_transform() {
        let transform = TransformComponent::new(Vec2::new(1.0, 1.0), 3.0);
        let collider = ColliderComponent::new(CollisionLayer::Asteroid);
        assert_eq!(collider.radius(&transform), 3.0);
        let collider = collider.with_radius(1.5);
        assert_eq!(collider.radius(&transform), 1.5);
        let (min, max) = collider.bounds(&transform);
        assert_eq!(min, Vec2::new(-0.5, -0.5));
        assert_eq!(max, Vec2::new(2.5, 2.5));
    }

    #[test]
    fn test_handlers_matched_by_layer_then_group() {
        let response = CollisionResponseComponent::new()
            .on_group(CollisionGroups::HOSTILE, |_, _, _| false)
            .on_layer(CollisionLayer::Enemy, |_, _, _| true)
            .on_layer(CollisionLayer::Asteroid, |_, _, _| false);

        let mut world = World::new();
        let a = world.create();
        let b = world.create();

        let handlers = response.handlers_for(CollisionLayer::Enemy, CollisionGroups::HOSTILE);
        assert_eq!(handlers.len(), 2);
        assert!(handlers[0](a, b, &mut world));
        assert!(!handlers[1](a, b, &mut world));

        assert!(response.handlers_for(CollisionLayer::Pickup, CollisionGroups::FRIENDLY).is_empty());
        assert_eq!(response.handlers_for(CollisionLayer::Pickup, CollisionGroups::HOSTILE | CollisionGroups::NEUTRAL).len(), 1);
    }
}
