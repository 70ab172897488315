//! Math utilities and types for the gallery's plan and world space.
//!
//! This module provides small vector and matrix types plus the scalar helpers
//! shared by generation, navigation and placement. The types are `Pod` so that
//! geometry and transforms can be handed to a GPU renderer without copying.
//!
//! # Module Organization
//!
//! - [`vec`] contains [`Vec2`] (plan coordinates) and [`Vec3`] (world coordinates)
//! - [`mat`] contains the column-major [`Mat4`]
//! - [`ray`] contains [`Ray`] with the plane and wall casts used for picking
//! - Angle conversion and easing live at the root

pub mod mat;
pub mod ray;
pub mod vec;

pub use mat::Mat4;
pub use ray::Ray;
pub use vec::{Vec2, Vec3};

/// Converts degrees to radians.
///
/// # Example
/// ```
/// use hilbert_gallery::math::deg_to_rad;
///
/// assert_eq!(deg_to_rad(180.0), std::f32::consts::PI);
/// ```
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * (std::f32::consts::PI / 180.0)
}

/// Cubic ease-in-out over `t ∈ [0, 1]`; values outside are clamped.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Sign of `value` as `-1`, `0` or `1`. Unlike `f32::signum`, zero maps to zero.
pub fn sign(value: f32) -> i32 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
