//! Physics module
//!
//! - [`integrator`]: fixed-step force/impulse integration, drag, speed clamp
//!   and the sleep state machine.
//! - [`motion`]: per-frame position and rotation integration.
//! - [`collision_system`]: pairwise circle overlap and response dispatch.
//! - [`boundary`]: playfield wrap/clamp/destroy.
//!
//! The free functions below are the entity-level access contract: an entity
//! without a [`PhysicsComponent`] reads as motionless and ignores pushes.

pub mod collision_layers;
pub mod integrator;
pub mod motion;
pub mod collision_system;
pub mod boundary;

pub use boundary::BoundarySystem;
pub use collision_layers::{CollisionGroups, CollisionLayer, InteractionMatrix};
pub use collision_system::{circles_overlap, CollisionPair, CollisionSystem};
pub use integrator::{step_body, PhysicsIntegrationSystem};
pub use motion::MotionSystem;

use crate::ecs::components::PhysicsComponent;
use crate::ecs::{EntityId, World};
use crate::foundation::math::Vec2;

/// Linear velocity of an entity (zero without a physics component)
pub fn velocity(world: &World, entity: EntityId) -> Vec2 {
    world
        .get_component::<PhysicsComponent>(entity)
        .map_or_else(Vec2::zeros, PhysicsComponent::velocity)
}

/// Angular velocity of an entity (zero without a physics component)
pub fn angular_velocity(world: &World, entity: EntityId) -> f32 {
    world
        .get_component::<PhysicsComponent>(entity)
        .map_or(0.0, PhysicsComponent::angular_velocity)
}

/// Push a force for the next fixed step; false if not accepted
pub fn apply_force(world: &mut World, entity: EntityId, force: Vec2) -> bool {
    world
        .get_component_mut::<PhysicsComponent>(entity)
        .is_some_and(|body| body.apply_force(force))
}

/// Push an impulse for the next fixed step; false if not accepted
pub fn apply_impulse(world: &mut World, entity: EntityId, impulse: Vec2) -> bool {
    world
        .get_component_mut::<PhysicsComponent>(entity)
        .is_some_and(|body| body.apply_impulse(impulse))
}

/// Overwrite an entity's velocity; false without a physics component
pub fn set_velocity(world: &mut World, entity: EntityId, velocity: Vec2) -> bool {
    match world.get_component_mut::<PhysicsComponent>(entity) {
        Some(body) => {
            body.set_velocity(velocity);
            true
        }
        None => false,
    }
}

/// Whether an entity's body is asleep (false without a physics component)
pub fn is_sleeping(world: &World, entity: EntityId) -> bool {
    world
        .get_component::<PhysicsComponent>(entity)
        .is_some_and(PhysicsComponent::is_sleeping)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_component_defaults() {
        let mut world = World::new();
        let entity = world.create();
        assert_eq!(velocity(&world, entity), Vec2::zeros());
        assert_eq!(angular_velocity(&world, entity), 0.0);
        assert!(!apply_force(&mut world, entity, Vec2::new(1.0, 0.0)));
        assert!(!apply_impulse(&mut world, entity, Vec2::new(1.0, 0.0)));
        assert!(!set_velocity(&mut world, entity, Vec2::new(1.0, 0.0)));
        assert!(!is_sleeping(&world, entity));
    }

    #[test]
    fn test_entity_level_access() {
        let mut world = World::new();
        let entity = world.spawn().with(PhysicsComponent::default()).id();
        assert!(set_velocity(&mut world, entity, Vec2::new(2.0, 0.0)));
        assert_eq!(velocity(&world, entity), Vec2::new(2.0, 0.0));
        assert!(apply_impulse(&mut world, entity, Vec2::new(1.0, 0.0)));
    }
}
