mod line_split;

use crate::error::{GeometryError, Result};
use crate::geometry::Polygon;
use crate::math::vector_2d::{scalar_projection, vector_from_compass};
use crate::math::{Point3, Vector3};

/// Coordinates of a point in an [`OrientedBoundingBox2D`] frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uv {
    pub u: f64,
    pub v: f64,
}

/// Pieces of a polygon cut by a line of constant `v`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineSplit {
    pub above: Vec<Polygon>,
    pub below: Vec<Polygon>,
}

/// A rectangle aligned to a compass direction that encloses a polygon,
/// plus the U/V frame it defines.
///
/// The U axis points along `direction_degrees` (clockwise from north) and
/// the V axis 90° counter-clockwise from it, so the frame has the same
/// handedness as XY. The UV origin is the box corner with the smallest U
/// and V; every source vertex therefore has `0 <= u <= u_extent` and
/// `0 <= v <= v_extent`.
#[derive(Debug, Clone)]
pub struct OrientedBoundingBox2D {
    direction: f64,
    u_axis: Vector3,
    v_axis: Vector3,
    reference: Point3,
    corners: [Point3; 4],
    u_extent: f64,
    v_extent: f64,
    source_uv: Vec<Uv>,
}

impl OrientedBoundingBox2D {
    /// Builds the box of `polygon` for the given compass direction.
    ///
    /// The midpoint of the first edge is used as the reference point for
    /// the axis projections.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the polygon has fewer than two
    /// nodes.
    pub fn new(polygon: &Polygon, direction_degrees: f64) -> Result<Self> {
        if polygon.len() < 2 {
            return Err(GeometryError::Degenerate("bounding box needs at least two nodes".to_owned()).into());
        }
        let u_axis = vector_from_compass(direction_degrees);
        let v_axis = vector_from_compass(direction_degrees - 90.0);
        let reference = polygon.edge(0).midpoint();

        let deltas: Vec<Uv> = polygon
            .nodes()
            .iter()
            .map(|p| {
                let offset = p - reference;
                Uv {
                    u: scalar_projection(&offset, &u_axis),
                    v: scalar_projection(&offset, &v_axis),
                }
            })
            .collect();

        let (u_min, u_max) = min_max(deltas.iter().map(|d| d.u));
        let (v_min, v_max) = min_max(deltas.iter().map(|d| d.v));

        let corner = |u: f64, v: f64| reference + u_axis * u + v_axis * v;
        let corners = [
            corner(u_min, v_min),
            corner(u_min, v_max),
            corner(u_max, v_max),
            corner(u_max, v_min),
        ];

        let source_uv = deltas
            .iter()
            .map(|d| Uv {
                u: d.u - u_min,
                v: d.v - v_min,
            })
            .collect();

        Ok(Self {
            direction: direction_degrees,
            u_axis,
            v_axis,
            reference,
            corners,
            u_extent: u_max - u_min,
            v_extent: v_max - v_min,
            source_uv,
        })
    }

    /// Compass direction of the U axis in degrees.
    #[must_use]
    pub fn direction(&self) -> f64 {
        self.direction
    }

    #[must_use]
    pub fn u_axis(&self) -> &Vector3 {
        &self.u_axis
    }

    #[must_use]
    pub fn v_axis(&self) -> &Vector3 {
        &self.v_axis
    }

    /// Midpoint of the source polygon's first edge.
    #[must_use]
    pub fn reference_point(&self) -> &Point3 {
        &self.reference
    }

    /// The UV origin: the corner with minimum U and minimum V.
    #[must_use]
    pub fn origin(&self) -> &Point3 {
        &self.corners[0]
    }

    /// Box corners in clockwise order: (uMin, vMin), (uMin, vMax),
    /// (uMax, vMax), (uMax, vMin).
    #[must_use]
    pub fn corners(&self) -> &[Point3; 4] {
        &self.corners
    }

    /// The box as a clockwise polygon.
    #[must_use]
    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(self.corners.to_vec())
    }

    #[must_use]
    pub fn u_extent(&self) -> f64 {
        self.u_extent
    }

    #[must_use]
    pub fn v_extent(&self) -> f64 {
        self.v_extent
    }

    /// UV coordinates of the source polygon's nodes, index for index.
    #[must_use]
    pub fn source_uv(&self) -> &[Uv] {
        &self.source_uv
    }

    /// Projects a world point into this frame.
    #[must_use]
    pub fn to_uv(&self, point: &Point3) -> Uv {
        let offset = point - self.origin();
        Uv {
            u: scalar_projection(&offset, &self.u_axis),
            v: scalar_projection(&offset, &self.v_axis),
        }
    }

    /// UV coordinates of another polygon's nodes, index for index.
    #[must_use]
    pub fn project(&self, polygon: &Polygon) -> Vec<Uv> {
        polygon.nodes().iter().map(|p| self.to_uv(p)).collect()
    }

    /// Lowest and highest V of a polygon in this frame.
    #[must_use]
    pub fn v_range(&self, polygon: &Polygon) -> Option<(f64, f64)> {
        if polygon.is_empty() {
            return None;
        }
        Some(min_max(self.project(polygon).iter().map(|uv| uv.v)))
    }

    /// Cuts `polygon` along the line `v = split_v` of this frame.
    ///
    /// The polygon must be simple. Pieces keep the input winding. A polygon
    /// that never crosses the line comes back whole on its own side.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` for polygons with fewer than
    /// three nodes and `OperationError::Failed` when the crossings cannot be
    /// paired, which happens for self-intersecting input.
    pub fn split(&self, polygon: &Polygon, split_v: f64) -> Result<LineSplit> {
        line_split::split_polygon(self, polygon, split_v)
    }
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| (lo.min(x), hi.max(x)))
}
