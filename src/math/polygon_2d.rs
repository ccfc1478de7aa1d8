use super::vector_2d::points_coincident_2d;
use super::{Point3, TOLERANCE};

/// Computes the signed area of a polygon in the XY plane (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point3]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Area-weighted centroid of a polygon in the XY plane.
///
/// Falls back to the vertex average when the polygon has no area.
#[must_use]
pub fn centroid_2d(points: &[Point3]) -> Option<Point3> {
    let n = points.len();
    if n == 0 {
        return None;
    }
    let area = signed_area_2d(points);
    if area.abs() < TOLERANCE {
        let (sx, sy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        #[allow(clippy::cast_precision_loss)]
        let count = n as f64;
        return Some(Point3::new(sx / count, sy / count, points[0].z));
    }
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        let cross = points[i].x * points[j].y - points[j].x * points[i].y;
        cx += (points[i].x + points[j].x) * cross;
        cy += (points[i].y + points[j].y) * cross;
    }
    let factor = 1.0 / (6.0 * area);
    Some(Point3::new(cx * factor, cy * factor, points[0].z))
}

/// Counts nodes that are not coincident (in XY) with any earlier node.
#[must_use]
pub fn distinct_node_count(points: &[Point3], tolerance: f64) -> usize {
    let mut distinct: Vec<&Point3> = Vec::with_capacity(points.len());
    for p in points {
        if !distinct.iter().any(|q| points_coincident_2d(p, q, tolerance)) {
            distinct.push(p);
        }
    }
    distinct.len()
}

/// Rotates a closed polygon so it starts at the leftmost vertex (smallest x),
/// breaking ties by smallest y, so that split pieces start at a predictable node.
#[must_use]
pub fn rotate_to_canonical_start(points: &[Point3]) -> Vec<Point3> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x - TOLERANCE || (pt.x - b.x).abs() < TOLERANCE && pt.y < b.y {
            best = i;
        }
    }
    if best == 0 {
        return points.to_vec();
    }
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn unit_square_cw() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        let mut pts = unit_square_cw();
        pts.reverse();
        assert!((signed_area_2d(&pts) - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        assert!((signed_area_2d(&unit_square_cw()) + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!((signed_area_2d(&[Point3::new(0.0, 0.0, 0.0)])).abs() < TOLERANCE);
        assert!((signed_area_2d(&[])).abs() < TOLERANCE);
    }

    #[test]
    fn centroid_of_square() {
        let c = centroid_2d(&unit_square_cw()).unwrap();
        assert!((c.x - 0.5).abs() < TOLERANCE);
        assert!((c.y - 0.5).abs() < TOLERANCE);
    }

    #[test]
    fn centroid_of_collapsed_polygon_is_vertex_mean() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
        ];
        let c = centroid_2d(&pts).unwrap();
        assert!((c.x - 2.0).abs() < TOLERANCE);
        assert!(centroid_2d(&[]).is_none());
    }

    #[test]
    fn distinct_nodes_ignore_duplicates() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1e-12, 0.0),
        ];
        assert_eq!(distinct_node_count(&pts, 1e-9), 2);
    }

    #[test]
    fn canonical_start_rotation() {
        let pts = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ];
        let rotated = rotate_to_canonical_start(&pts);
        assert!((rotated[0].x).abs() < TOLERANCE);
        assert!((rotated[0].y).abs() < TOLERANCE);
        assert_eq!(rotated.len(), 4);
    }
}
