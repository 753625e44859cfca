//! # Sim Kernel
//!
//! A small real-time simulation kernel for arcade-style games.
//!
//! ## Features
//!
//! - **Entity Store**: typed component pools keyed by entity id
//! - **Scheduler**: phased (Update / FixedUpdate / LateUpdate), priority-ordered systems
//! - **Physics**: fixed-step force/impulse integration with drag, speed limits and sleeping
//! - **Collisions**: layer-filtered circle overlaps with per-layer and per-group responses
//! - **Event Bus**: typed synchronous publish/subscribe
//! - **Plugins**: start/stop hooks for gameplay feature modules
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sim_kernel::prelude::*;
//!
//! fn main() -> Result<(), EngineError> {
//!     sim_kernel::foundation::logging::init();
//!
//!     let mut simulation = Simulation::builder().with_default_systems().build()?;
//!     let ship = simulation
//!         .world_mut()
//!         .spawn()
//!         .with(TransformComponent::new(Vec2::new(512.0, 384.0), 10.0))
//!         .with(PhysicsComponent::default())
//!         .id();
//!
//!     sim_kernel::physics::apply_impulse(simulation.world_mut(), ship, Vec2::new(100.0, 0.0));
//!     simulation.start();
//!     for _ in 0..60 {
//!         simulation.frame(1.0 / 60.0);
//!     }
//!     simulation.stop();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::cast_precision_loss)]

pub mod foundation;
pub mod config;
pub mod ecs;
pub mod events;
pub mod physics;
pub mod plugin;
pub mod state;

mod engine;

pub use engine::{EngineError, FrameStats, Simulation, SimulationBuilder};

/// Common imports for kernel users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, KernelConfig, PhysicsSettings},
        ecs::components::{
            BodyType, BoundaryPolicy, ColliderComponent, CollisionResponseComponent, Lifetime,
            Owner, PhysicsComponent, ScoreValue, TransformComponent,
        },
        ecs::{Component, EntityId, Scheduler, System, SystemContext, SystemError, SystemPhase, World},
        events::{DestructionCause, EntityDestroyed, Event, EventBus, Listener, ListenerError},
        foundation::math::Vec2,
        physics::{CollisionGroups, CollisionLayer, InteractionMatrix},
        plugin::{Plugin, SpawnTracker},
        state::SimulationState,
        EngineError, FrameStats, Simulation, SimulationBuilder,
    };
}
