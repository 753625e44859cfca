//! Playfield boundary enforcement

use crate::ecs::components::{BoundaryPolicy, PhysicsComponent, TransformComponent};
use crate::ecs::{EntityId, System, SystemContext, SystemError, World};
use crate::events::{DestructionCause, EntityDestroyed, EventBus};
use crate::foundation::math::Vec2;

/// LateUpdate system applying each entity's [`BoundaryPolicy`]
///
/// Entities without a policy are left alone.
#[derive(Debug)]
pub struct BoundarySystem {
    priority: i32,
}

impl Default for BoundarySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundarySystem {
    /// Default priority within LateUpdate
    pub const PRIORITY: i32 = 200;

    /// Create the system
    pub fn new() -> Self {
        Self {
            priority: Self::PRIORITY,
        }
    }

    /// Override the priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Apply every policy against a `width` x `height` playfield, returning
    /// the entities removed
    pub fn enforce(world: &mut World, events: &EventBus, width: f32, height: f32) -> Vec<EntityId> {
        let mut removed = Vec::new();

        for entity in world.query::<BoundaryPolicy>() {
            let Some(policy) = world.get_component::<BoundaryPolicy>(entity).copied() else {
                continue;
            };
            let Some(transform) = world.get_component_mut::<TransformComponent>(entity) else {
                continue;
            };

            match policy {
                BoundaryPolicy::Wrap => wrap(transform, width, height),
                BoundaryPolicy::Clamp => {
                    let walls = clamp(transform, width, height);
                    if walls != Vec2::zeros() {
                        cancel_velocity(world, entity, walls);
                    }
                }
                BoundaryPolicy::Destroy { margin } => {
                    if outside(transform.position, width, height, margin) {
                        removed.push(entity);
                    }
                }
            }
        }

        for &entity in &removed {
            world.remove_entity(entity);
            log::trace!("Entity {} left the playfield", entity);
            events.publish(EntityDestroyed {
                entity,
                cause: DestructionCause::Environmental,
                instigator: None,
                score_value: 0,
            });
        }
        removed
    }
}

fn wrap(transform: &mut TransformComponent, width: f32, height: f32) {
    let r = transform.radius;
    transform.position.x = wrap_axis(transform.position.x, width, r);
    transform.position.y = wrap_axis(transform.position.y, height, r);
}

// Wraps only once the body is fully past the edge
fn wrap_axis(value: f32, extent: f32, radius: f32) -> f32 {
    let span = extent + 2.0 * radius;
    if value < -radius {
        value + span
    } else if value > extent + radius {
        value - span
    } else {
        value
    }
}

/// Keeps the body inside the rectangle; returns, per axis, -1 or 1 for the
/// wall that was hit and 0 otherwise
fn clamp(transform: &mut TransformComponent, width: f32, height: f32) -> Vec2 {
    let r = transform.radius;
    let before = transform.position;
    transform.position.x = clamp_axis(before.x, width, r);
    transform.position.y = clamp_axis(before.y, height, r);
    Vec2::new(
        wall_side(before.x, transform.position.x),
        wall_side(before.y, transform.position.y),
    )
}

fn clamp_axis(value: f32, extent: f32, radius: f32) -> f32 {
    let low = radius.min(extent * 0.5);
    let high = (extent - radius).max(extent * 0.5);
    value.clamp(low, high)
}

fn wall_side(before: f32, after: f32) -> f32 {
    if before < after {
        -1.0
    } else if before > after {
        1.0
    } else {
        0.0
    }
}

fn outside(position: Vec2, width: f32, height: f32, margin: f32) -> bool {
    position.x < -margin
        || position.x > width + margin
        || position.y < -margin
        || position.y > height + margin
}

fn cancel_velocity(world: &mut World, entity: EntityId, walls: Vec2) {
    let Some(body) = world.get_component_mut::<PhysicsComponent>(entity) else {
        return;
    };

    // Only motion into the wall is cancelled; sliding along it survives
    let mut velocity = body.velocity();
    if velocity.x * walls.x > 0.0 {
        velocity.x = 0.0;
    }
    if velocity.y * walls.y > 0.0 {
        velocity.y = 0.0;
    }
    if velocity != body.velocity() {
        body.set_velocity(velocity);
    }
}

impl System for BoundarySystem {
    fn name(&self) -> &str {
        "boundary"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn run(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        Self::enforce(ctx.world, ctx.events, ctx.state.width(), ctx.state.height());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::{Arc, Mutex};

    fn entity(world: &mut World, position: Vec2, policy: BoundaryPolicy) -> EntityId {
        world
            .spawn()
            .with(TransformComponent::new(position, 5.0))
            .with(policy)
            .id()
    }

    #[test]
    fn test_wrap_after_fully_off_screen() {
        let mut world = World::new();
        let partly = entity(&mut world, Vec2::new(-4.0, 50.0), BoundaryPolicy::Wrap);
        let fully = entity(&mut world, Vec2::new(106.0, 50.0), BoundaryPolicy::Wrap);
        BoundarySystem::enforce(&mut world, &EventBus::new(), 100.0, 100.0);

        let partly = world.get_component::<TransformComponent>(partly).unwrap();
        assert_relative_eq!(partly.position.x, -4.0);
        let fully = world.get_component::<TransformComponent>(fully).unwrap();
        assert_relative_eq!(fully.position.x, -4.0);
    }

    #[test]
    fn test_clamp_cancels_velocity_into_wall() {
        let mut world = World::new();
        let e = entity(&mut world, Vec2::new(120.0, 50.0), BoundaryPolicy::Clamp);
        world
            .add_component(e, PhysicsComponent::default().with_velocity(Vec2::new(30.0, 10.0)))
            .unwrap();
        BoundarySystem::enforce(&mut world, &EventBus::new(), 100.0, 100.0);

        let transform = world.get_component::<TransformComponent>(e).unwrap();
        assert_relative_eq!(transform.position.x, 95.0);
        let body = world.get_component::<PhysicsComponent>(e).unwrap();
        assert_eq!(body.velocity(), Vec2::new(0.0, 10.0));
    }

    #[test]
    fn test_clamp_keeps_velocity_away_from_wall() {
        let mut world = World::new();
        let e = entity(&mut world, Vec2::new(-10.0, 50.0), BoundaryPolicy::Clamp);
        world
            .add_component(e, PhysicsComponent::default().with_velocity(Vec2::new(30.0, 0.0)))
            .unwrap();
        BoundarySystem::enforce(&mut world, &EventBus::new(), 100.0, 100.0);

        let body = world.get_component::<PhysicsComponent>(e).unwrap();
        assert_eq!(body.velocity(), Vec2::new(30.0, 0.0));
    }

    #[test]
    fn test_destroy_beyond_margin() {
        let mut world = World::new();
        let inside = entity(&mut world, Vec2::new(105.0, 50.0), BoundaryPolicy::Destroy { margin: 10.0 });
        let gone = entity(&mut world, Vec2::new(50.0, -20.0), BoundaryPolicy::Destroy { margin: 10.0 });

        let events = EventBus::new();
        let causes = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&causes);
        events.subscribe_fn(move |event: &EntityDestroyed| {
            sink.lock().unwrap().push((event.entity, event.cause));
            Ok(())
        });

        let removed = BoundarySystem::enforce(&mut world, &events, 100.0, 100.0);
        assert_eq!(removed, vec![gone]);
        assert!(world.contains(inside));
        assert!(!world.contains(gone));
        assert_eq!(*causes.lock().unwrap(), vec![(gone, DestructionCause::Environmental)]);
    }

    #[test]
    fn test_entities_without_policy_untouched() {
        let mut world = World::new();
        let e = world
            .spawn()
            .with(TransformComponent::new(Vec2::new(-500.0, -500.0), 1.0))
            .id();
        BoundarySystem::enforce(&mut world, &EventBus::new(), 100.0, 100.0);
        assert_eq!(
            world.get_component::<TransformComponent>(e).unwrap().position,
            Vec2::new(-500.0, -500.0)
        );
    }
}
