//! ECS Components module
//! 
//! Plain data records the kernel's built-in systems read and write

pub mod transform;
pub mod physics;
pub mod collision;
pub mod lifetime;
pub mod boundary;
pub mod gameplay;

pub use transform::TransformComponent;
pub use physics::{BodyType, PhysicsComponent, PhysicsError, SleepState};
pub use collision::{ColliderComponent, CollisionResponseComponent, ResponseHandler};
pub use lifetime::Lifetime;
pub use boundary::BoundaryPolicy;
pub use gameplay::{Owner, ScoreValue};
