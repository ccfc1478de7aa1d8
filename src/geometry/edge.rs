use crate::math::vector_2d::{unit_inward_normal, with_magnitude};
use crate::math::{Point3, Vector3, TOLERANCE};

/// Z difference under which an edge is considered flat.
const FLAT_SLOPE_TOLERANCE: f64 = 0.001;

/// A directed polygon edge from `a` to `b` with its current setback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: Point3,
    pub b: Point3,
    pub setback: f64,
}

impl Edge {
    /// Creates a new edge.
    #[must_use]
    pub fn new(a: Point3, b: Point3, setback: f64) -> Self {
        Self { a, b, setback }
    }

    /// Direction of travel, `b - a`.
    #[must_use]
    pub fn vector(&self) -> Vector3 {
        self.b - self.a
    }

    /// Length of the edge projected onto the XY plane.
    #[must_use]
    pub fn length(&self) -> f64 {
        let d = self.vector();
        (d.x * d.x + d.y * d.y).sqrt()
    }

    /// Full 3D length of the edge.
    #[must_use]
    pub fn length_3d(&self) -> f64 {
        self.vector().norm()
    }

    /// Midpoint of the edge.
    #[must_use]
    pub fn midpoint(&self) -> Point3 {
        self.a + self.vector() * 0.5
    }

    /// Unit normal pointing into a clockwise polygon.
    #[must_use]
    pub fn inward_normal(&self) -> Vector3 {
        unit_inward_normal(&self.vector())
    }

    /// Rise over planar run, or `None` for a vertical edge.
    #[must_use]
    pub fn slope(&self) -> Option<f64> {
        let run = self.length();
        if run < TOLERANCE {
            return None;
        }
        Some((self.b.z - self.a.z) / run)
    }

    /// Returns `true` when both endpoints sit at (nearly) the same height.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        (self.b.z - self.a.z).abs() < FLAT_SLOPE_TOLERANCE
    }

    /// Moves both endpoints `distance` towards each other along the edge.
    #[must_use]
    pub fn shrink_towards_center(&self, distance: f64) -> Self {
        let step = with_magnitude(&self.vector(), distance);
        Self {
            a: self.a + step,
            b: self.b - step,
            setback: self.setback,
        }
    }
}
