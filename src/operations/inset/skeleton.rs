use std::f64::consts::FRAC_PI_2;

use super::InsetOptions;
use crate::math::vector_2d::{angle_between, cross_z, inward_normal, with_magnitude};
use crate::math::{clamp_setback, Point3, Vector3, TOLERANCE};

/// How the boundary turns at a vertex of a clockwise polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VertexTurn {
    /// Right turn; the vertex moves into the polygon along its bisector.
    Convex,
    /// Left turn (reflex vertex); the vertex moves against its bisector.
    Concave,
    /// No turn; the vertex slides along the shared edge normal.
    Straight,
}

/// Per-vertex motion of a clockwise polygon as its edges move inward by
/// their setbacks. At fraction `t`, vertex `i` sits at
/// `origins[i] + vectors[i] * t`.
#[derive(Debug, Clone)]
pub(crate) struct Skeleton {
    pub origins: Vec<Point3>,
    pub vectors: Vec<Vector3>,
    pub turns: Vec<VertexTurn>,
    /// Per-edge setbacks, already clamped away from zero.
    pub setbacks: Vec<f64>,
}

impl Skeleton {
    /// Builds skeleton vectors for every vertex.
    ///
    /// Vertex `i` sits between incoming edge `i - 1` (A) and outgoing edge
    /// `i` (B). Its displacement combines the reversed A direction scaled by
    /// B's setback with the B direction scaled by A's setback, both divided
    /// by `cos(90° - turn)`, so that the moved vertex lies at distance
    /// `setback(A)` from A and `setback(B)` from B.
    ///
    /// Only a turn near zero is a straight run. Reversals (turn near π) are
    /// expected to have been removed by `simplify_ring` beforehand.
    pub fn build(origins: &[Point3], raw_setbacks: &[f64], options: &InsetOptions) -> Self {
        let n = origins.len();
        let setbacks: Vec<f64> = raw_setbacks
            .iter()
            .map(|&s| clamp_setback(s, options.setback_epsilon()))
            .collect();

        let mut vectors = Vec::with_capacity(n);
        let mut turns = Vec::with_capacity(n);
        for i in 0..n {
            let prev = (i + n - 1) % n;
            let next = (i + 1) % n;
            let a = origins[i] - origins[prev];
            let b = origins[next] - origins[i];
            let setback_a = setbacks[prev];
            let setback_b = setbacks[i];

            let turn_angle = angle_between(&a, &b);
            let cos_alpha = (FRAC_PI_2 - turn_angle).cos();

            let straight = turn_angle < options.straight_angle_tolerance()
                || (turn_angle < FRAC_PI_2 && cos_alpha.abs() < TOLERANCE);
            if straight {
                turns.push(VertexTurn::Straight);
                vectors.push(with_magnitude(&inward_normal(&a), setback_a));
                continue;
            }

            let turn = if cross_z(&a, &b) > 0.0 {
                VertexTurn::Concave
            } else {
                VertexTurn::Convex
            };
            let along_a = with_magnitude(&(-a), setback_b / cos_alpha);
            let along_b = with_magnitude(&b, setback_a / cos_alpha);
            let mut v = along_a + along_b;
            if turn == VertexTurn::Concave {
                v = -v;
            }
            turns.push(turn);
            vectors.push(v);
        }

        Self {
            origins: origins.to_vec(),
            vectors,
            turns,
            setbacks,
        }
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    /// Position of vertex `i` at fraction `t`.
    pub fn position_at(&self, i: usize, t: f64) -> Point3 {
        self.origins[i] + self.vectors[i] * t
    }

    /// Every vertex position at fraction `t`.
    pub fn positions_at(&self, t: f64) -> Vec<Point3> {
        (0..self.len()).map(|i| self.position_at(i, t)).collect()
    }

    /// Vector of edge `i` (vertex `i` to vertex `i + 1`) at `t = 0`.
    pub fn edge_vector(&self, i: usize) -> Vector3 {
        let n = self.len();
        self.origins[(i + 1) % n] - self.origins[i]
    }
}
