//! Physics component: rigid-body-like state for one entity
//!
//! Holds velocity, per-step force/impulse accumulators, mass, drag and the
//! sleep state. The integration itself lives in `crate::physics::integrator`.

use crate::ecs::Component;
use crate::foundation::math::Vec2;
use thiserror::Error;

/// Rejected physics parameters
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PhysicsError {
    /// Mass must be finite and strictly positive
    #[error("Invalid mass: {0} (must be finite and > 0)")]
    InvalidMass(f32),

    /// Drag must lie in `[0, 1]`
    #[error("Invalid drag: {0} (must be within 0..=1)")]
    InvalidDrag(f32),

    /// Max speed must be finite and non-negative
    #[error("Invalid max speed: {0} (must be finite and >= 0)")]
    InvalidMaxSpeed(f32),
}

/// How a body takes part in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyType {
    /// Integrates forces and impulses
    #[default]
    Dynamic,
    /// Moves only through explicitly set velocities
    Kinematic,
    /// Never moves
    Static,
}

/// Sleep state of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SleepState {
    /// Integrating normally
    #[default]
    Awake,
    /// At rest; skipped by integration until woken
    Sleeping,
}

/// Component for entities driven by the physics integrator
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsComponent {
    pub(crate) velocity: Vec2,
    pub(crate) acceleration: Vec2,
    pub(crate) force: Vec2,
    pub(crate) impulse: Vec2,
    pub(crate) mass: f32,
    pub(crate) drag: f32,
    pub(crate) angular_velocity: f32,
    pub(crate) angular_drag: f32,
    pub(crate) max_speed: f32,
    pub(crate) body_type: BodyType,
    pub(crate) sleep_state: SleepState,
    pub(crate) sleep_timer: f32,
}

impl Component for PhysicsComponent {}

impl Default for PhysicsComponent {
    fn default() -> Self {
        Self {
            velocity: Vec2::zeros(),
            acceleration: Vec2::zeros(),
            force: Vec2::zeros(),
            impulse: Vec2::zeros(),
            mass: 1.0,
            drag: 1.0,
            angular_velocity: 0.0,
            angular_drag: 1.0,
            max_speed: 0.0,
            body_type: BodyType::Dynamic,
            sleep_state: SleepState::Awake,
            sleep_timer: 0.0,
        }
    }
}

impl PhysicsComponent {
    /// Create a dynamic body with the given mass
    pub fn new(mass: f32) -> Result<Self, PhysicsError> {
        let mut body = Self::default();
        body.set_mass(mass)?;
        Ok(body)
    }

    /// Create a kinematic body (unit mass, moved only by velocity sets)
    pub fn kinematic() -> Self {
        Self {
            body_type: BodyType::Kinematic,
            ..Default::default()
        }
    }

    /// Create a static body
    pub fn fixed() -> Self {
        Self {
            body_type: BodyType::Static,
            ..Default::default()
        }
    }

    /// Set linear drag (builder form)
    pub fn with_drag(mut self, drag: f32) -> Result<Self, PhysicsError> {
        self.set_drag(drag)?;
        Ok(self)
    }

    /// Set angular drag (builder form)
    pub fn with_angular_drag(mut self, angular_drag: f32) -> Result<Self, PhysicsError> {
        self.set_angular_drag(angular_drag)?;
        Ok(self)
    }

    /// Set the speed limit (builder form)
    pub fn with_max_speed(mut self, max_speed: f32) -> Result<Self, PhysicsError> {
        self.set_max_speed(max_speed)?;
        Ok(self)
    }

    /// Set the initial velocity (builder form)
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.set_velocity(velocity);
        self
    }

    /// Set the initial angular velocity (builder form)
    pub fn with_angular_velocity(mut self, angular_velocity: f32) -> Self {
        self.set_angular_velocity(angular_velocity);
        self
    }

    /// Set mass; non-positive or non-finite values are rejected
    pub fn set_mass(&mut self, mass: f32) -> Result<(), PhysicsError> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(PhysicsError::InvalidMass(mass));
        }
        self.mass = mass;
        Ok(())
    }

    /// Set linear drag; 1.0 means no drag, 0.0 stops the body in one reference frame
    pub fn set_drag(&mut self, drag: f32) -> Result<(), PhysicsError> {
        if !(0.0..=1.0).contains(&drag) {
            return Err(PhysicsError::InvalidDrag(drag));
        }
        self.drag = drag;
        Ok(())
    }

    /// Set angular drag with the same meaning as [`Self::set_drag`]
    pub fn set_angular_drag(&mut self, angular_drag: f32) -> Result<(), PhysicsError> {
        if !(0.0..=1.0).contains(&angular_drag) {
            return Err(PhysicsError::InvalidDrag(angular_drag));
        }
        self.angular_drag = angular_drag;
        Ok(())
    }

    /// Set the speed limit (0 = unlimited)
    pub fn set_max_speed(&mut self, max_speed: f32) -> Result<(), PhysicsError> {
        if !max_speed.is_finite() || max_speed < 0.0 {
            return Err(PhysicsError::InvalidMaxSpeed(max_speed));
        }
        self.max_speed = max_speed;
        Ok(())
    }

    /// Accumulate a force for the next fixed step
    ///
    /// Only awake dynamic bodies accept forces. Returns whether the force was
    /// accepted.
    pub fn apply_force(&mut self, force: Vec2) -> bool {
        if self.body_type != BodyType::Dynamic || self.is_sleeping() {
            return false;
        }
        self.force += force;
        self.sleep_timer = 0.0;
        true
    }

    /// Accumulate an impulse for the next fixed step, waking the body
    ///
    /// Returns whether the impulse was accepted (dynamic bodies only).
    pub fn apply_impulse(&mut self, impulse: Vec2) -> bool {
        if self.body_type != BodyType::Dynamic {
            return false;
        }
        self.impulse += impulse;
        self.wake();
        true
    }

    /// Set linear velocity, waking the body. Ignored for static bodies.
    pub fn set_velocity(&mut self, velocity: Vec2) {
        if self.body_type == BodyType::Static {
            return;
        }
        self.velocity = velocity;
        self.wake();
    }

    /// Set angular velocity, waking the body. Ignored for static bodies.
    pub fn set_angular_velocity(&mut self, angular_velocity: f32) {
        if self.body_type == BodyType::Static {
            return;
        }
        self.angular_velocity = angular_velocity;
        self.wake();
    }

    /// Force the body awake and restart its rest timer
    pub fn wake(&mut self) {
        self.sleep_state = SleepState::Awake;
        self.sleep_timer = 0.0;
    }

    /// Put the body to sleep, zeroing its motion
    pub fn sleep(&mut self) {
        self.sleep_state = SleepState::Sleeping;
        self.velocity = Vec2::zeros();
        self.angular_velocity = 0.0;
        self.clear_accumulators();
    }

    pub(crate) fn clear_accumulators(&mut self) {
        self.force = Vec2::zeros();
        self.impulse = Vec2::zeros();
        self.acceleration = Vec2::zeros();
    }

    /// Linear velocity
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Linear speed
    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }

    /// Angular velocity in radians per second
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Mass
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Linear drag
    pub fn drag(&self) -> f32 {
        self.drag
    }

    /// Angular drag
    pub fn angular_drag(&self) -> f32 {
        self.angular_drag
    }

    /// Speed limit (0 = unlimited)
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Body type
    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    /// Sleep state
    pub fn sleep_state(&self) -> SleepState {
        self.sleep_state
    }

    /// Whether the body is asleep
    pub fn is_sleeping(&self) -> bool {
        self.sleep_state == SleepState::Sleeping
    }

    /// Seconds the body has continuously been at rest
    pub fn sleep_timer(&self) -> f32 {
        self.sleep_timer
    }

    /// Force accumulated for the next step
    pub fn pending_force(&self) -> Vec2 {
        self.force
    }

    /// Impulse accumulated for the next step
    pub fn pending_impulse(&self) -> Vec2 {
        self.impulse
    }

    /// Whether the motion pass should move this body
    pub fn is_moving(&self) -> bool {
        self.body_type != BodyType::Static && !self.is_sleeping()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_mass() {
        assert_eq!(PhysicsComponent::new(0.0), Err(PhysicsError::InvalidMass(0.0)));
        assert!(PhysicsComponent::new(-2.0).is_err());
        assert!(PhysicsComponent::new(f32::NAN).is_err());

        let mut body = PhysicsComponent::new(2.0).unwrap();
        assert!(body.set_mass(0.0).is_err());
        assert_eq!(body.mass(), 2.0);
    }

    #[test]
    fn test_rejects_invalid_drag() {
        let body = PhysicsComponent::default();
        assert!(body.clone().with_drag(1.5).is_err());
        assert!(body.clone().with_angular_drag(-0.1).is_err());
        assert!(body.with_drag(f32::NAN).is_err());
    }

    #[test]
    fn test_static_rejects_forces() {
        let mut body = PhysicsComponent::fixed();
        assert!(!body.apply_force(Vec2::new(1.0, 0.0)));
        assert!(!body.apply_impulse(Vec2::new(1.0, 0.0)));
        body.set_velocity(Vec2::new(5.0, 0.0));
        assert_eq!(body.velocity(), Vec2::zeros());
        assert!(!body.is_moving());
    }

    #[test]
    fn test_kinematic_ignores_forces_but_takes_velocity() {
        let mut body = PhysicsComponent::kinematic();
        assert!(!body.apply_force(Vec2::new(1.0, 0.0)));
        assert!(!body.apply_impulse(Vec2::new(1.0, 0.0)));
        body.set_velocity(Vec2::new(3.0, 0.0));
        assert_eq!(body.velocity(), Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_impulse_wakes_sleeping_body() {
        let mut body = PhysicsComponent::default();
        body.sleep();
        assert!(body.is_sleeping());
        assert!(!body.apply_force(Vec2::new(1.0, 0.0)));

        assert!(body.apply_impulse(Vec2::new(1.0, 0.0)));
        assert_eq!(body.sleep_state(), SleepState::Awake);
        assert_eq!(body.pending_impulse(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_force_resets_rest_timer() {
        let mut body = PhysicsComponent::default();
        body.sleep_timer = 0.3;
        body.apply_force(Vec2::new(0.0, 1.0));
        assert_eq!(body.sleep_timer(), 0.0);
        assert_eq!(body.pending_force(), Vec2::new(0.0, 1.0));
    }
}
