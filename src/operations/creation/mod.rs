mod make_buffer;
mod make_rectangle;

pub use make_buffer::MakeBuffer;
pub use make_rectangle::MakeRectangle;

use crate::error::Result;
use crate::geometry::Polygon;
use crate::math::Point3;

/// Axis-aligned rectangle centred on `center`. See [`MakeRectangle::on_point`].
///
/// # Errors
///
/// Returns an error if either dimension is not positive.
pub fn rectangle_on_point(center: Point3, x_dim: f64, y_dim: f64) -> Result<Polygon> {
    MakeRectangle::on_point(center, x_dim, y_dim).execute()
}

/// Rectangle of the given thickness along `a`→`b`. See
/// [`MakeRectangle::from_two_points`].
///
/// # Errors
///
/// Returns an error if the points coincide or `thickness` is not positive.
pub fn rectangle_from_two_points(a: Point3, b: Point3, thickness: f64) -> Result<Polygon> {
    MakeRectangle::from_two_points(a, b, thickness).execute()
}

/// Buffer polygon around the segment `a`→`b`. See [`MakeBuffer`].
///
/// # Errors
///
/// Returns an error if the points coincide or `width` is not positive.
pub fn buffer_segment(a: Point3, b: Point3, width: f64, extend: bool) -> Result<Polygon> {
    MakeBuffer::new(a, b, width).with_extend(extend).execute()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::FloorPlate;
    use crate::operations::inset::PerEdgeInset;

    #[test]
    fn helpers_feed_the_inset_engine() {
        let footprints = [
            rectangle_on_point(Point3::new(0.0, 0.0, 0.0), 10.0, 10.0).unwrap(),
            rectangle_from_two_points(Point3::new(0.0, 5.0, 0.0), Point3::new(10.0, 5.0, 0.0), 10.0).unwrap(),
            buffer_segment(Point3::new(0.0, 5.0, 0.0), Point3::new(10.0, 5.0, 0.0), 10.0, false).unwrap(),
        ];
        for footprint in footprints {
            assert!(footprint.is_clockwise());
            let plate = FloorPlate::from_setbacks(footprint, &[1.0; 4]).unwrap();
            let result = PerEdgeInset::new(plate).execute();
            assert!((result.total_area() - 64.0).abs() < 1e-9);
        }
    }
}
