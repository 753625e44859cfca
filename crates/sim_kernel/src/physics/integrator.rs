//! Fixed-step physics integration

use crate::config::PhysicsSettings;
use crate::ecs::components::{BodyType, PhysicsComponent};
use crate::ecs::{System, SystemContext, SystemError};
use crate::foundation::math::{clamp_magnitude, Vec2};

/// Advance one body by one fixed step of `dt` seconds
///
/// Order: impulse → force → velocity integration → speed clamp → drag →
/// snap-to-zero → sleep bookkeeping. Forces and impulses are consumed.
pub fn step_body(body: &mut PhysicsComponent, dt: f32, settings: &PhysicsSettings) {
    if body.body_type != BodyType::Dynamic || body.is_sleeping() {
        // Static and kinematic bodies never take forces; sleeping ones drop them
        body.clear_accumulators();
        return;
    }

    body.velocity += body.impulse / body.mass;
    body.impulse = Vec2::zeros();

    body.acceleration += body.force / body.mass;
    body.velocity += body.acceleration * dt;
    body.force = Vec2::zeros();
    body.acceleration = Vec2::zeros();

    body.velocity = clamp_magnitude(body.velocity, body.max_speed);

    // Normalised to the reference frame rate so drag means the same at any step size
    let exponent = dt * settings.reference_frame_rate;
    body.velocity *= body.drag.powf(exponent);
    body.angular_velocity *= body.angular_drag.powf(exponent);

    if body.velocity.magnitude() < settings.velocity_epsilon {
        body.velocity = Vec2::zeros();
    }
    if body.angular_velocity.abs() < settings.angular_epsilon {
        body.angular_velocity = 0.0;
    }

    update_sleep(body, dt, settings);
}

fn update_sleep(body: &mut PhysicsComponent, dt: f32, settings: &PhysicsSettings) {
    let at_rest = body.velocity.magnitude() < settings.sleep_velocity_threshold
        && body.angular_velocity.abs() < settings.sleep_angular_threshold;

    if !at_rest {
        body.sleep_timer = 0.0;
        return;
    }

    body.sleep_timer += dt;
    if body.sleep_timer >= settings.sleep_time {
        body.sleep();
    }
}

/// FixedUpdate system integrating every physics body
pub struct PhysicsIntegrationSystem {
    settings: PhysicsSettings,
    priority: i32,
}

impl PhysicsIntegrationSystem {
    /// Default priority within FixedUpdate
    pub const PRIORITY: i32 = 0;

    /// Create the system with the given physics constants
    pub fn new(settings: PhysicsSettings) -> Self {
        Self {
            settings,
            priority: Self::PRIORITY,
        }
    }

    /// Override the priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl System for PhysicsIntegrationSystem {
    fn name(&self) -> &str {
        "physics_integration"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn run(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        for entity in ctx.world.query::<PhysicsComponent>() {
            if let Some(body) = ctx.world.get_component_mut::<PhysicsComponent>(entity) {
                step_body(body, ctx.delta_time, &self.settings);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const DT: f32 = 1.0 / 60.0;

    fn settings() -> PhysicsSettings {
        PhysicsSettings::default()
    }

    #[test]
    fn test_force_changes_velocity_by_f_over_m_dt() {
        let mut body = PhysicsComponent::new(2.0).unwrap();
        body.apply_force(Vec2::new(120.0, 0.0));
        step_body(&mut body, DT, &settings());
        assert_relative_eq!(body.velocity().x, 120.0 / 2.0 * DT, epsilon = 1e-5);
        assert_eq!(body.pending_force(), Vec2::zeros());
    }

    #[test]
    fn test_force_is_not_persistent() {
        let mut body = PhysicsComponent::new(1.0).unwrap();
        body.apply_force(Vec2::new(60.0, 0.0));
        step_body(&mut body, DT, &settings());
        let after_first = body.velocity();
        step_body(&mut body, DT, &settings());
        assert_relative_eq!(body.velocity().x, after_first.x, epsilon = 1e-6);
    }

    #[test]
    fn test_impulse_independent_of_dt() {
        for dt in [1.0 / 30.0, 1.0 / 60.0, 1.0 / 240.0] {
            let mut body = PhysicsComponent::new(4.0).unwrap();
            body.apply_impulse(Vec2::new(0.0, 20.0));
            step_body(&mut body, dt, &settings());
            assert_relative_eq!(body.velocity().y, 5.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_speed_clamped_preserving_direction() {
        let mut body = PhysicsComponent::new(1.0).unwrap().with_max_speed(10.0).unwrap();
        body.apply_impulse(Vec2::new(30.0, 40.0));
        step_body(&mut body, DT, &settings());
        assert_relative_eq!(body.speed(), 10.0, epsilon = 1e-4);
        assert_relative_eq!(body.velocity().x / body.velocity().y, 0.75, epsilon = 1e-5);
    }

    #[test]
    fn test_drag_decays_monotonically_to_zero() {
        let mut body = PhysicsComponent::new(1.0)
            .unwrap()
            .with_drag(0.9)
            .unwrap()
            .with_velocity(Vec2::new(50.0, 0.0));
        let mut previous = body.speed();
        let mut steps = 0;
        while body.speed() > 0.0 {
            step_body(&mut body, DT, &settings());
            assert!(body.speed() < previous);
            previous = body.speed();
            steps += 1;
            assert!(steps < 10_000, "drag never reached zero");
        }
        assert_eq!(body.velocity(), Vec2::zeros());
    }

    #[test]
    fn test_drag_independent_of_step_size() {
        let mut coarse = PhysicsComponent::new(1.0).unwrap().with_drag(0.95).unwrap().with_velocity(Vec2::new(100.0, 0.0));
        let mut fine = coarse.clone();
        step_body(&mut coarse, 1.0 / 30.0, &settings());
        step_body(&mut fine, 1.0 / 60.0, &settings());
        step_body(&mut fine, 1.0 / 60.0, &settings());
        assert_relative_eq!(coarse.speed(), fine.speed(), epsilon = 1e-3);
        assert_relative_eq!(coarse.speed(), 100.0 * 0.95_f32.powi(2), epsilon = 1e-3);
    }

    #[test]
    fn test_angular_drag() {
        let mut body = PhysicsComponent::new(1.0).unwrap().with_angular_drag(0.5).unwrap().with_angular_velocity(4.0);
        step_body(&mut body, DT, &settings());
        assert_relative_eq!(body.angular_velocity(), 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_fast_body_never_sleeps() {
        let mut body = PhysicsComponent::new(1.0).unwrap().with_velocity(Vec2::new(5.0, 0.0));
        for _ in 0..600 {
            step_body(&mut body, DT, &settings());
        }
        assert!(!body.is_sleeping());
        assert_eq!(body.sleep_timer(), 0.0);
    }

    #[test]
    fn test_slow_body_falls_asleep_with_zero_velocity() {
        let settings = settings();
        let mut body = PhysicsComponent::new(1.0).unwrap().with_velocity(Vec2::new(0.2, 0.0));
        let steps = (settings.sleep_time / DT).ceil() as usize + 1;
        for _ in 0..steps {
            step_body(&mut body, DT, &settings);
        }
        assert!(body.is_sleeping());
        assert_eq!(body.velocity(), Vec2::zeros());
    }

    #[test]
    fn test_sleeping_body_drops_forces_until_woken() {
        let mut body = PhysicsComponent::new(1.0).unwrap();
        body.sleep();
        body.apply_force(Vec2::new(100.0, 0.0));
        step_body(&mut body, DT, &settings());
        assert_eq!(body.velocity(), Vec2::zeros());
        assert!(body.is_sleeping());

        body.apply_impulse(Vec2::new(3.0, 0.0));
        step_body(&mut body, DT, &settings());
        assert!(!body.is_sleeping());
        assert_abs_diff_eq!(body.velocity().x, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_kinematic_keeps_its_velocity() {
        let mut body = PhysicsComponent::kinematic().with_velocity(Vec2::new(0.1, 0.0));
        body.drag = 0.5;
        for _ in 0..120 {
            step_body(&mut body, DT, &settings());
        }
        assert_eq!(body.velocity(), Vec2::new(0.1, 0.0));
        assert!(!body.is_sleeping());
    }

    #[test]
    fn test_snap_to_zero() {
        let mut body = PhysicsComponent::new(1.0).unwrap().with_velocity(Vec2::new(0.001, 0.0)).with_angular_velocity(0.0001);
        step_body(&mut body, DT, &settings());
        assert_eq!(body.velocity(), Vec2::zeros());
        assert_eq!(body.angular_velocity(), 0.0);
    }
}
