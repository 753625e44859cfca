//! Lifetime expiry
//!
//! Despawns entities whose [`Lifetime`] has run out, measured against the
//! simulation clock rather than wall time.

use crate::ecs::components::Lifetime;
use crate::ecs::{System, SystemContext, SystemError};
use crate::events::{DestructionCause, EntityDestroyed};

/// LateUpdate system removing expired entities
#[derive(Debug)]
pub struct LifetimeSystem {
    priority: i32,
}

impl Default for LifetimeSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl LifetimeSystem {
    /// Default priority within LateUpdate
    pub const PRIORITY: i32 = 300;

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

impl System for LifetimeSystem {
    fn name(&self) -> &str {
        "lifetime"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn run(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        let now = ctx.state.elapsed();
        for entity in ctx.world.query::<Lifetime>() {
            let expired = ctx
                .world
                .get_component::<Lifetime>(entity)
                .is_some_and(|lifetime| lifetime.is_expired(now));
            if expired {
                ctx.world.queue_removal(entity);
            }
        }

        for entity in ctx.world.flush_removals() {
            ctx.events.publish(EntityDestroyed {
                entity,
                cause: DestructionCause::Other,
                instigator: None,
                score_value: 0,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;
    use crate::events::EventBus;
    use crate::state::SimulationState;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_expired_entities_removed() {
        let mut world = World::new();
        let old = world.spawn().with(Lifetime::new(0.0, 1.0)).id();
        let young = world.spawn().with(Lifetime::new(0.0, 5.0)).id();
        let immortal = world.spawn().with(Lifetime::new(0.0, 0.0)).id();

        let mut state = SimulationState::default();
        state.begin_frame(2.0);
        let events = EventBus::new();
        let destroyed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&destroyed);
        events.subscribe_fn(move |event: &EntityDestroyed| {
            sink.lock().unwrap().push((event.entity, event.cause));
            Ok(())
        });

        let mut ctx = SystemContext { state: &state, world: &mut world, events: &events, delta_time: 2.0 };
        LifetimeSystem::new().run(&mut ctx).unwrap();

        assert!(!world.contains(old));
        assert!(world.contains(young));
        assert!(world.contains(immortal));
        assert_eq!(*destroyed.lock().unwrap(), vec![(old, DestructionCause::Other)]);
    }
}
