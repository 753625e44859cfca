//! Math utilities and types
//!
//! The kernel simulates a flat arcade playfield, so everything is expressed
//! with nalgebra 2D vectors. Rotation is a scalar angle in radians.

pub use nalgebra::Vector2;

use std::f32::consts::TAU;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Wrap an angle into the `[0, 2π)` range
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Unit vector pointing along `angle` (radians, 0 = +X)
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Rescale `v` so its magnitude does not exceed `max` (direction preserved)
///
/// A non-positive `max` means "no limit".
pub fn clamp_magnitude(v: Vec2, max: f32) -> Vec2 {
    if max <= 0.0 {
        return v;
    }
    let magnitude = v.magnitude();
    if magnitude > max {
        v * (max / magnitude)
    } else {
        v
    }
}
