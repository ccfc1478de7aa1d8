pub mod polygon_2d;
pub mod vector_2d;

/// 3D point type. Nodes carry `z` through; all offset math is planar.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Value substituted for setbacks that are zero or negative.
pub const SETBACK_EPSILON: f64 = 1e-6;

/// Distance under which two nodes are treated as the same location.
pub const COINCIDENCE_TOLERANCE: f64 = 1e-9;

/// Replaces a non-positive setback with [`SETBACK_EPSILON`].
#[must_use]
pub fn clamp_setback(value: f64, epsilon: f64) -> f64 {
    if value <= 0.0 {
        epsilon
    } else {
        value
    }
}
