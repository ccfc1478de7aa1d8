use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::Polygon;
use crate::math::vector_2d::{inward_normal, with_magnitude};
use crate::math::{Point3, Vector3, TOLERANCE};

#[derive(Debug, Clone, Copy)]
enum Placement {
    OnPoint { center: Point3, x_dim: f64, y_dim: f64 },
    AlongPoints { a: Point3, b: Point3, thickness: f64 },
}

/// Creates a clockwise rectangle.
#[derive(Debug, Clone, Copy)]
pub struct MakeRectangle {
    placement: Placement,
}

impl MakeRectangle {
    /// Axis-aligned rectangle of `x_dim` by `y_dim` centred on `center`,
    /// starting at its lower-left corner. All nodes take the centre's Z.
    #[must_use]
    pub fn on_point(center: Point3, x_dim: f64, y_dim: f64) -> Self {
        Self {
            placement: Placement::OnPoint { center, x_dim, y_dim },
        }
    }

    /// Rectangle whose centre line runs from `a` to `b`, extending
    /// `thickness / 2` to either side.
    #[must_use]
    pub fn from_two_points(a: Point3, b: Point3, thickness: f64) -> Self {
        Self {
            placement: Placement::AlongPoints { a, b, thickness },
        }
    }

    /// Builds the rectangle.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a non-positive dimension
    /// and `GeometryError::ZeroVector` when `a` and `b` coincide in XY.
    pub fn execute(&self) -> Result<Polygon> {
        match self.placement {
            Placement::OnPoint { center, x_dim, y_dim } => {
                if x_dim <= 0.0 || y_dim <= 0.0 {
                    return Err(OperationError::InvalidInput(format!(
                        "rectangle dimensions must be positive, got {x_dim} x {y_dim}"
                    ))
                    .into());
                }
                let (x0, x1) = (center.x - x_dim / 2.0, center.x + x_dim / 2.0);
                let (y0, y1) = (center.y - y_dim / 2.0, center.y + y_dim / 2.0);
                let z = center.z;
                Ok(Polygon::new(vec![
                    Point3::new(x0, y0, z),
                    Point3::new(x0, y1, z),
                    Point3::new(x1, y1, z),
                    Point3::new(x1, y0, z),
                ]))
            }
            Placement::AlongPoints { a, b, thickness } => {
                if thickness <= 0.0 {
                    return Err(OperationError::InvalidInput("rectangle thickness must be positive".to_owned()).into());
                }
                let direction = Vector3::new(b.x - a.x, b.y - a.y, 0.0);
                if direction.norm() < TOLERANCE {
                    return Err(GeometryError::ZeroVector.into());
                }
                let right = with_magnitude(&inward_normal(&direction), thickness / 2.0);
                Ok(Polygon::new(vec![a + right, a - right, b - right, b + right]))
            }
        }
    }
}
