use super::{Point3, Vector3, TOLERANCE};

/// Angle in radians between two vectors, in `[0, π]`.
///
/// The cosine is clamped to `[-1, 1]` before `acos` so that rounding on
/// nearly parallel vectors never produces `NaN`. Returns `0.0` when either
/// vector has zero length.
#[must_use]
pub fn angle_between(a: &Vector3, b: &Vector3) -> f64 {
    let mags = a.norm() * b.norm();
    if mags < TOLERANCE {
        return 0.0;
    }
    (a.dot(b) / mags).clamp(-1.0, 1.0).acos()
}

/// Signed length of the projection of `a` onto the direction of `onto`.
///
/// Returns `0.0` when `onto` has zero length.
#[must_use]
pub fn scalar_projection(a: &Vector3, onto: &Vector3) -> f64 {
    let len = onto.norm();
    if len < TOLERANCE {
        return 0.0;
    }
    a.dot(onto) / len
}

/// Returns `v` rescaled to the given length. A zero vector stays zero.
#[must_use]
pub fn with_magnitude(v: &Vector3, magnitude: f64) -> Vector3 {
    let len = v.norm();
    if len < TOLERANCE {
        return Vector3::zeros();
    }
    v * (magnitude / len)
}

/// Right-hand normal of a direction in the XY plane (`v × ẑ`).
///
/// For clockwise polygons this points into the interior. Not normalized.
#[must_use]
pub fn inward_normal(v: &Vector3) -> Vector3 {
    Vector3::new(v.y, -v.x, 0.0)
}

/// Unit right-hand normal of a direction in the XY plane.
#[must_use]
pub fn unit_inward_normal(v: &Vector3) -> Vector3 {
    with_magnitude(&inward_normal(v), 1.0)
}

/// Z component of `a × b`. Positive when `b` turns left of `a`.
#[must_use]
pub fn cross_z(a: &Vector3, b: &Vector3) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Rotates a vector counter-clockwise by `radians` in the XY plane.
#[must_use]
pub fn rotate_2d(v: &Vector3, radians: f64) -> Vector3 {
    let (sin, cos) = radians.sin_cos();
    Vector3::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos, 0.0)
}

/// Sum of the unit vectors of `a` and `b`.
#[must_use]
pub fn bisector_2d(a: &Vector3, b: &Vector3) -> Vector3 {
    with_magnitude(a, 1.0) + with_magnitude(b, 1.0)
}

/// Wraps a compass angle into `[0, 360)` degrees.
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Converts between compass degrees (north = 0, clockwise) and
/// trigonometric degrees (east = 0, counter-clockwise). The mapping is its
/// own inverse.
#[must_use]
pub fn compass_to_trig_degrees(degrees: f64) -> f64 {
    (450.0 - degrees).rem_euclid(360.0)
}

/// Unit vector pointing along a compass direction.
#[must_use]
pub fn vector_from_compass(degrees: f64) -> Vector3 {
    let (sin, cos) = compass_to_trig_degrees(degrees).to_radians().sin_cos();
    Vector3::new(cos, sin, 0.0)
}

/// Compass direction (north = 0, clockwise) of a vector in the XY plane.
#[must_use]
pub fn compass_from_vector(v: &Vector3) -> f64 {
    normalize_degrees(v.x.atan2(v.y).to_degrees())
}

/// Returns `true` when the two points match on every axis within `tolerance`.
#[must_use]
pub fn points_coincident(a: &Point3, b: &Point3, tolerance: f64) -> bool {
    (b.x - a.x).abs() <= tolerance
        && (b.y - a.y).abs() <= tolerance
        && (b.z - a.z).abs() <= tolerance
}

/// Returns `true` when the two points match in X and Y within `tolerance`.
#[must_use]
pub fn points_coincident_2d(a: &Point3, b: &Point3, tolerance: f64) -> bool {
    (b.x - a.x).abs() <= tolerance && (b.y - a.y).abs() <= tolerance
}

/// Relative comparison of a found value against a target.
///
/// A zero target falls back to an absolute comparison with `tolerance`.
#[must_use]
pub fn is_within_tolerance(found: f64, target: f64, tolerance: f64) -> bool {
    if target == 0.0 {
        (found - target).abs() < tolerance
    } else {
        (found - target).abs() < (target * tolerance).abs()
    }
}
