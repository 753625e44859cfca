//! Entity-Component-System implementation
//!
//! Entity store, component pools, system traits and the phased scheduler.

pub mod world;
pub mod entity;
pub mod component;
pub mod storage;
pub mod system;
pub mod scheduler;
pub mod components;
pub mod systems;

pub use world::{EntityBuilder, World, WorldError};
pub use entity::EntityId;
pub use component::Component;
pub use storage::ComponentPool;
pub use system::{System, SystemContext, SystemError, SystemPhase};
pub use scheduler::{PhaseReport, Scheduler};
