//! ECS systems that are not tied to the physics module

pub mod lifetime_system;

pub use lifetime_system::LifetimeSystem;
