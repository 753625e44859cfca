//! Transform component for the ECS system
//!
//! Pure data: world-space position, facing angle, bounding radius and an
//! optional outline polygon in local space.

use crate::ecs::Component;
use crate::foundation::math::{wrap_angle, Vec2};

/// ECS Transform component
#[derive(Debug, Clone, PartialEq)]
pub struct TransformComponent {
    /// World space position
    pub position: Vec2,
    
    /// Facing angle in radians, kept in `[0, 2π)` by the motion system
    pub rotation: f32,
    
    /// Bounding circle radius
    pub radius: f32,

    /// Outline vertices in local space (may be empty)
    pub shape: Vec<Vec2>,
}

impl Component for TransformComponent {}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            radius: 0.0,
            shape: Vec::new(),
        }
    }
}

impl TransformComponent {
    /// Create from position only
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create from position and radius
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            radius,
            ..Default::default()
        }
    }

    /// Set the facing angle
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = wrap_angle(rotation);
        self
    }

    /// Set the outline polygon
    pub fn with_shape(mut self, shape: Vec<Vec2>) -> Self {
        self.shape = shape;
        self
    }

    /// Rotate by `delta` radians, keeping the angle wrapped
    pub fn rotate(&mut self, delta: f32) {
        self.rotation = wrap_angle(self.rotation + delta);
    }

    /// Outline vertices transformed into world space
    pub fn world_shape(&self) -> Vec<Vec2> {
        let (sin, cos) = self.rotation.sin_cos();
        self.shape
            .iter()
            .map(|p| self.position + Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, TAU};

    #[test]
    fn test_rotate_wraps() {
        let mut transform = TransformComponent::default();
        transform.rotate(TAU + 1.0);
        assert_relative_eq!(transform.rotation, 1.0, epsilon = 1e-5);
        transform.rotate(-2.0);
        assert!(transform.rotation >= 0.0 && transform.rotation < TAU);
    }

    #[test]
    fn test_world_shape() {
        let transform = TransformComponent::new(Vec2::new(10.0, 0.0), 1.0)
            .with_rotation(FRAC_PI_2)
            .with_shape(vec![Vec2::new(1.0, 0.0)]);
        let world = transform.world_shape();
        assert_relative_eq!(world[0].x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(world[0].y, 1.0, epsilon = 1e-5);
    }
}
