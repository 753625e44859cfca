//! Per-frame motion pass
//!
//! Moves transforms by the latest velocity every frame using the variable
//! frame delta, so positions stay smooth between fixed physics steps.

use crate::ecs::components::{PhysicsComponent, TransformComponent};
use crate::ecs::{System, SystemContext, SystemError};

/// Update system applying `position += velocity * dt` and the rotation analogue
#[derive(Debug, Default)]
pub struct MotionSystem {
    priority: i32,
}

impl MotionSystem {
    /// Default priority within Update
    pub const PRIORITY: i32 = 0;

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
}

impl System for MotionSystem {
    fn name(&self) -> &str {
        "motion"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn run(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        let dt = ctx.delta_time;
        for entity in ctx.world.query::<PhysicsComponent>() {
            let Some((velocity, angular_velocity)) = ctx
                .world
                .get_component::<PhysicsComponent>(entity)
                .filter(|body| body.is_moving())
                .map(|body| (body.velocity(), body.angular_velocity()))
            else {
                continue;
            };

            if let Some(transform) = ctx.world.get_component_mut::<TransformComponent>(entity) {
                transform.position += velocity * dt;
                if angular_velocity != 0.0 {
                    transform.rotate(angular_velocity * dt);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;
    use crate::events::EventBus;
    use crate::foundation::math::Vec2;
    use crate::state::SimulationState;
    use approx::assert_relative_eq;

    fn run_motion(world: &mut World, dt: f32) {
        let state = SimulationState::default();
        let events = EventBus::new();
        let mut ctx = SystemContext { state: &state, world, events: &events, delta_time: dt };
        MotionSystem::new().run(&mut ctx).unwrap();
    }

    #[test]
    fn test_moves_by_velocity() {
        let mut world = World::new();
        let entity = world.spawn()
            .with(TransformComponent::from_position(Vec2::new(1.0, 1.0)))
            .with(PhysicsComponent::default().with_velocity(Vec2::new(10.0, -5.0)).with_angular_velocity(1.0))
            .id();
        run_motion(&mut world, 0.5);

        let transform = world.get_component::<TransformComponent>(entity).unwrap();
        assert_relative_eq!(transform.position.x, 6.0);
        assert_relative_eq!(transform.position.y, -1.5);
        assert_relative_eq!(transform.rotation, 0.5);
    }

    #[test]
    fn test_sleeping_and_static_bodies_stay_put() {
        let mut world = World::new();
        let mut sleeping = PhysicsComponent::default().with_velocity(Vec2::new(10.0, 0.0));
        sleeping.sleep();
        let a = world.spawn().with(TransformComponent::default()).with(sleeping).id();
        let b = world.spawn().with(TransformComponent::default()).with(PhysicsComponent::fixed()).id();
        run_motion(&mut world, 1.0);

        assert_eq!(world.get_component::<TransformComponent>(a).unwrap().position, Vec2::zeros());
        assert_eq!(world.get_component::<TransformComponent>(b).unwrap().position, Vec2::zeros());
    }

    #[test]
    fn test_body_without_transform_is_skipped() {
        let mut world = World::new();
        world.spawn().with(PhysicsComponent::default().with_velocity(Vec2::new(1.0, 0.0)));
        run_motion(&mut world, 1.0);
    }
}
