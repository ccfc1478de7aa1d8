use super::Edge;
use crate::math::polygon_2d::{distinct_node_count, signed_area_2d};
use crate::math::{Point3, TOLERANCE};

/// An implicitly closed polygon: node `i` connects to node `i + 1`, and the
/// last node connects back to the first. The closing node is never repeated.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    nodes: Vec<Point3>,
}

impl Polygon {
    /// Creates a polygon from its ordered nodes.
    #[must_use]
    pub fn new(nodes: Vec<Point3>) -> Self {
        Self { nodes }
    }

    /// Builds a polygon from `(x, y, z)` triples, dropping a repeated
    /// closing vertex if the caller left one in.
    #[must_use]
    pub fn from_xyz(coords: &[(f64, f64, f64)]) -> Self {
        let mut nodes: Vec<Point3> = coords.iter().map(|&(x, y, z)| Point3::new(x, y, z)).collect();
        if nodes.len() > 1 {
            let first = nodes[0];
            if nodes.last().is_some_and(|last| (last - first).norm() < TOLERANCE) {
                nodes.pop();
            }
        }
        Self { nodes }
    }

    /// The ordered nodes.
    #[must_use]
    pub fn nodes(&self) -> &[Point3] {
        &self.nodes
    }

    /// Consumes the polygon, returning its nodes.
    #[must_use]
    pub fn into_nodes(self) -> Vec<Point3> {
        self.nodes
    }

    /// Number of nodes, which is also the number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the polygon has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edge `i`, from node `i` to node `i + 1` (wrapping), with no setback.
    #[must_use]
    pub fn edge(&self, i: usize) -> Edge {
        let n = self.nodes.len();
        Edge::new(self.nodes[i % n], self.nodes[(i + 1) % n], 0.0)
    }

    /// All edges, with setbacks taken index-for-index from `setbacks`.
    /// Missing setbacks default to zero.
    #[must_use]
    pub fn edges(&self, setbacks: &[f64]) -> Vec<Edge> {
        (0..self.nodes.len())
            .map(|i| {
                let mut edge = self.edge(i);
                edge.setback = setbacks.get(i).copied().unwrap_or(0.0);
                edge
            })
            .collect()
    }

    /// Signed area in the XY plane; negative for clockwise winding.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.nodes)
    }

    /// Unsigned area in the XY plane.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Returns `true` for clockwise winding in the XY plane.
    #[must_use]
    pub fn is_clockwise(&self) -> bool {
        self.signed_area() < 0.0
    }

    /// Reverses the winding while keeping node 0 first, so the edge that
    /// was `i` becomes edge `n - 1 - i`.
    #[must_use]
    pub fn reversed_winding(&self) -> Self {
        let mut nodes = self.nodes.clone();
        if nodes.len() > 1 {
            nodes[1..].reverse();
        }
        Self { nodes }
    }

    /// Minimum and maximum node Z, or `None` for an empty polygon.
    #[must_use]
    pub fn z_range(&self) -> Option<(f64, f64)> {
        self.nodes.iter().fold(None, |acc, p| match acc {
            None => Some((p.z, p.z)),
            Some((lo, hi)) => Some((lo.min(p.z), hi.max(p.z))),
        })
    }

    /// A copy of this polygon with every node at height `z`.
    #[must_use]
    pub fn with_flat_z(&self, z: f64) -> Self {
        Self {
            nodes: self.nodes.iter().map(|p| Point3::new(p.x, p.y, z)).collect(),
        }
    }

    /// Number of nodes that are not coincident with an earlier node.
    #[must_use]
    pub fn distinct_node_count(&self, tolerance: f64) -> usize {
        distinct_node_count(&self.nodes, tolerance)
    }

    /// Returns `true` if the polygon cannot enclose any area: fewer than 3
    /// distinct nodes, or all nodes collinear.
    #[must_use]
    pub fn is_degenerate(&self, tolerance: f64) -> bool {
        self.distinct_node_count(tolerance) < 3 || self.area() < TOLERANCE
    }
}
