use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::Polygon;
use crate::math::vector_2d::{inward_normal, with_magnitude};
use crate::math::{Point3, Vector3, TOLERANCE};

/// Creates a clockwise buffer polygon around a line segment.
///
/// Nodes run left of `a`, left of `b`, right of `b`, right of `a`, looking
/// from `a` towards `b`. With `extend` the ends are pushed out along the
/// segment by half the width, giving square caps.
#[derive(Debug, Clone, Copy)]
pub struct MakeBuffer {
    a: Point3,
    b: Point3,
    width: f64,
    extend: bool,
}

impl MakeBuffer {
    /// Creates a new buffer operation with flat (non-extended) ends.
    #[must_use]
    pub fn new(a: Point3, b: Point3, width: f64) -> Self {
        Self {
            a,
            b,
            width,
            extend: false,
        }
    }

    /// Sets whether the ends are extended by half the width.
    #[must_use]
    pub fn with_extend(mut self, extend: bool) -> Self {
        self.extend = extend;
        self
    }

    /// Builds the buffer polygon.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a non-positive width and
    /// `GeometryError::ZeroVector` when the endpoints coincide in XY.
    pub fn execute(&self) -> Result<Polygon> {
        if self.width <= 0.0 {
            return Err(OperationError::InvalidInput("buffer width must be positive".to_owned()).into());
        }
        let direction = Vector3::new(self.b.x - self.a.x, self.b.y - self.a.y, 0.0);
        if direction.norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let half = self.width / 2.0;
        let right = with_magnitude(&inward_normal(&direction), half);
        let along = if self.extend {
            with_magnitude(&direction, half)
        } else {
            Vector3::zeros()
        };
        let start = self.a - along;
        let end = self.b + along;
        Ok(Polygon::new(vec![start - right, end - right, end + right, start + right]))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn flat_ends() {
        let buffer = MakeBuffer::new(Point3::origin(), Point3::new(10.0, 0.0, 0.0), 2.0)
            .execute()
            .unwrap();
        assert!(buffer.is_clockwise());
        assert_abs_diff_eq!(buffer.area(), 20.0, epsilon = 1e-12);
        assert_eq!(buffer.nodes()[0], Point3::new(0.0, 1.0, 0.0));
        assert_eq!(buffer.nodes()[2], Point3::new(10.0, -1.0, 0.0));
    }

    #[test]
    fn extended_ends() {
        let buffer = MakeBuffer::new(Point3::origin(), Point3::new(0.0, 10.0, 0.0), 2.0)
            .with_extend(true)
            .execute()
            .unwrap();
        assert!(buffer.is_clockwise());
        assert_abs_diff_eq!(buffer.area(), 24.0, epsilon = 1e-12);
        let ys: Vec<f64> = buffer.nodes().iter().map(|p| p.y).collect();
        assert_abs_diff_eq!(ys[0], -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ys[1], 11.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_segment_is_rejected() {
        let p = Point3::new(1.0, 1.0, 0.0);
        assert!(MakeBuffer::new(p, p, 1.0).execute().is_err());
        assert!(MakeBuffer::new(p, Point3::new(2.0, 1.0, 0.0), 0.0).execute().is_err());
    }
}
