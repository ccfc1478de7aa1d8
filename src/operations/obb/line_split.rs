use slotmap::{SecondaryMap, SlotMap};

use super::{LineSplit, OrientedBoundingBox2D, Uv};
use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::Polygon;
use crate::math::polygon_2d::{centroid_2d, rotate_to_canonical_start};
use crate::math::{Point3, TOLERANCE};

/// V distance within which a node counts as lying on the split line.
const ON_LINE_TOLERANCE: f64 = 1e-9;

slotmap::new_key_type! {
    /// Key of a working node during one split.
    struct WorkNodeKey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Above,
    Below,
    On,
}

/// Per-call copy of a guest node.
#[derive(Debug, Clone, Copy)]
struct WorkNode {
    point: Point3,
    uv: Uv,
    side: Side,
    is_split: bool,
}

/// Working state for one split. Nothing here outlives the call.
struct SplitArena {
    nodes: SlotMap<WorkNodeKey, WorkNode>,
    /// Ring order of the guest with crossing nodes inserted.
    order: Vec<WorkNodeKey>,
    position: SecondaryMap<WorkNodeKey, usize>,
    partner: SecondaryMap<WorkNodeKey, WorkNodeKey>,
    departed: SecondaryMap<WorkNodeKey, ()>,
}

impl SplitArena {
    fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            order: Vec::new(),
            position: SecondaryMap::new(),
            partner: SecondaryMap::new(),
            departed: SecondaryMap::new(),
        }
    }

    fn push(&mut self, node: WorkNode) {
        let key = self.nodes.insert(node);
        self.position.insert(key, self.order.len());
        self.order.push(key);
    }

    fn node(&self, key: WorkNodeKey) -> Option<&WorkNode> {
        self.nodes.get(key)
    }

    fn side_at(&self, index: usize) -> Side {
        let m = self.order.len();
        self.nodes.get(self.order[index % m]).map_or(Side::On, |n| n.side)
    }

    fn uv_at(&self, index: usize) -> Uv {
        let m = self.order.len();
        self.nodes
            .get(self.order[index % m])
            .map_or(Uv { u: 0.0, v: 0.0 }, |n| n.uv)
    }

    fn mark_split(&mut self, index: usize) {
        let key = self.order[index % self.order.len()];
        if let Some(node) = self.nodes.get_mut(key) {
            node.is_split = true;
        }
    }

    fn next(&self, key: WorkNodeKey) -> Option<WorkNodeKey> {
        let index = *self.position.get(key)?;
        Some(self.order[(index + 1) % self.order.len()])
    }
}

fn classify(v: f64, split_v: f64) -> Side {
    if (v - split_v).abs() <= ON_LINE_TOLERANCE {
        Side::On
    } else if v > split_v {
        Side::Above
    } else {
        Side::Below
    }
}

fn opposite(side: Side) -> Side {
    match side {
        Side::Above => Side::Below,
        Side::Below => Side::Above,
        Side::On => Side::On,
    }
}

/// Splits `polygon` by the line `v = split_v` of `frame`.
///
/// # Algorithm
///
/// 1. Every node is classified above, below or on the line. A polygon with
///    nothing strictly on one side is returned whole on the other.
/// 2. A crossing node is inserted on every edge that straddles the line.
/// 3. Maximal runs of on-line nodes are resolved into split nodes: a run
///    becomes a crossing only where the boundary actually passes from one
///    side to the other, so tangential touches do not split.
/// 4. Split nodes are sorted by U and paired left to right. Each pair is a
///    segment of the line inside the polygon.
/// 5. The ring is walked from every split node not yet jumped from; at a
///    split node reached by walking the walk jumps to its partner. Each
///    closed walk is one piece, assigned to a side by its centroid.
pub(super) fn split_polygon(frame: &OrientedBoundingBox2D, polygon: &Polygon, split_v: f64) -> Result<LineSplit> {
    let n = polygon.len();
    if n < 3 {
        return Err(GeometryError::Degenerate(format!("cannot split a polygon with {n} nodes")).into());
    }
    let uvs = frame.project(polygon);
    let sides: Vec<Side> = uvs.iter().map(|uv| classify(uv.v, split_v)).collect();

    if !sides.contains(&Side::Above) {
        return Ok(LineSplit {
            above: Vec::new(),
            below: vec![polygon.clone()],
        });
    }
    if !sides.contains(&Side::Below) {
        return Ok(LineSplit {
            above: vec![polygon.clone()],
            below: Vec::new(),
        });
    }

    let mut arena = SplitArena::new();
    let nodes = polygon.nodes();
    for i in 0..n {
        let j = (i + 1) % n;
        arena.push(WorkNode {
            point: nodes[i],
            uv: uvs[i],
            side: sides[i],
            is_split: false,
        });
        let straddles = matches!(
            (sides[i], sides[j]),
            (Side::Above, Side::Below) | (Side::Below, Side::Above)
        );
        if straddles {
            let t = (split_v - uvs[i].v) / (uvs[j].v - uvs[i].v);
            arena.push(WorkNode {
                point: nodes[i] + (nodes[j] - nodes[i]) * t,
                uv: Uv {
                    u: uvs[i].u + (uvs[j].u - uvs[i].u) * t,
                    v: split_v,
                },
                side: Side::On,
                is_split: false,
            });
        }
    }

    mark_split_nodes(&mut arena, polygon.is_clockwise());

    let mut splits: Vec<WorkNodeKey> = arena
        .order
        .iter()
        .copied()
        .filter(|&k| arena.node(k).is_some_and(|node| node.is_split))
        .collect();
    if splits.len() % 2 != 0 {
        tracing::warn!(count = splits.len(), split_v, "odd number of line crossings");
        return Err(OperationError::Failed(format!(
            "line split found {} crossings; the polygon may self-intersect",
            splits.len()
        ))
        .into());
    }
    splits.sort_by(|&a, &b| {
        let ua = arena.node(a).map_or(0.0, |node| node.uv.u);
        let ub = arena.node(b).map_or(0.0, |node| node.uv.u);
        ua.total_cmp(&ub)
    });
    for pair in splits.chunks_exact(2) {
        arena.partner.insert(pair[0], pair[1]);
        arena.partner.insert(pair[1], pair[0]);
    }

    let mut result = LineSplit::default();
    for &start in &splits {
        if arena.departed.contains_key(start) {
            continue;
        }
        let ring = walk_loop(&mut arena, start)?;
        if ring.len() < 3 {
            tracing::trace!(nodes = ring.len(), "dropping degenerate split piece");
            continue;
        }
        let is_above = centroid_2d(&ring).is_some_and(|c| frame.to_uv(&c).v > split_v);
        let piece = Polygon::new(rotate_to_canonical_start(&ring));
        if is_above {
            result.above.push(piece);
        } else {
            result.below.push(piece);
        }
    }
    tracing::debug!(
        above = result.above.len(),
        below = result.below.len(),
        crossings = splits.len(),
        "line split"
    );
    Ok(result)
}

/// Flags the on-line nodes where the boundary crosses the line.
///
/// For a run of on-line nodes, `prev` and `next` are the sides of the
/// off-line nodes before and after it. A run with extent also has an
/// interior side: traversing a clockwise ring towards +U the interior lies
/// below the line.
fn mark_split_nodes(arena: &mut SplitArena, clockwise: bool) {
    let m = arena.order.len();
    let Some(anchor) = (0..m).find(|&i| arena.side_at(i) != Side::On) else {
        return;
    };

    let mut runs: Vec<(usize, usize)> = Vec::new();
    let mut run_start: Option<usize> = None;
    for offset in 1..=m {
        let index = anchor + offset;
        match (arena.side_at(index), run_start) {
            (Side::On, None) => run_start = Some(index),
            (Side::On, Some(_)) => {}
            (_, Some(first)) => {
                runs.push((first, index - 1));
                run_start = None;
            }
            (_, None) => {}
        }
    }

    for (first, last) in runs {
        let prev = arena.side_at(first + m - 1);
        let next = arena.side_at(last + 1);
        let du = arena.uv_at(last).u - arena.uv_at(first).u;

        if first == last || du.abs() < TOLERANCE {
            if prev != next {
                arena.mark_split(first);
            }
            continue;
        }

        let interior = if (du > 0.0) == clockwise {
            Side::Below
        } else {
            Side::Above
        };
        if prev != next {
            if prev == opposite(interior) {
                arena.mark_split(first);
            } else {
                arena.mark_split(last);
            }
        } else if prev != interior {
            arena.mark_split(first);
            arena.mark_split(last);
        }
    }
}

/// Walks one closed piece starting at split node `start`, marking every
/// split node it jumps from as departed.
fn walk_loop(arena: &mut SplitArena, start: WorkNodeKey) -> Result<Vec<Point3>> {
    let limit = arena.order.len() * 2;
    let mut ring = Vec::new();
    let mut current = start;
    let mut jumped = false;
    loop {
        let node = *arena
            .node(current)
            .ok_or_else(|| OperationError::Failed("split walk lost its node".to_owned()))?;
        ring.push(node.point);

        let following = if node.is_split && !jumped {
            arena.departed.insert(current, ());
            jumped = true;
            arena.partner.get(current).copied()
        } else {
            jumped = false;
            arena.next(current)
        };
        let following = following.ok_or_else(|| OperationError::Failed("unpaired split node".to_owned()))?;
        if following == start {
            return Ok(ring);
        }
        if ring.len() > limit {
            tracing::warn!(nodes = ring.len(), "split walk did not close");
            return Err(OperationError::Failed("split walk did not close".to_owned()).into());
        }
        current = following;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn polygon(coords: &[(f64, f64)]) -> Polygon {
        let xyz: Vec<(f64, f64, f64)> = coords.iter().map(|&(x, y)| (x, y, 0.0)).collect();
        Polygon::from_xyz(&xyz)
    }

    fn square() -> Polygon {
        polygon(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)])
    }

    fn split(guest: &Polygon, split_v: f64) -> LineSplit {
        OrientedBoundingBox2D::new(&square(), 90.0)
            .unwrap()
            .split(guest, split_v)
            .unwrap()
    }

    fn areas(pieces: &[Polygon]) -> Vec<f64> {
        let mut a: Vec<f64> = pieces.iter().map(Polygon::area).collect();
        a.sort_by(f64::total_cmp);
        a
    }

    #[test]
    fn line_outside_range_keeps_polygon_whole() {
        let result = split(&square(), 12.0);
        assert!(result.above.is_empty());
        assert_eq!(result.below, vec![square()]);

        let result = split(&square(), -1.0);
        assert_eq!(result.above, vec![square()]);
        assert!(result.below.is_empty());
    }

    #[test]
    fn line_along_an_edge_keeps_polygon_whole() {
        let result = split(&square(), 10.0);
        assert!(result.above.is_empty());
        assert_eq!(result.below.len(), 1);
    }

    #[test]
    fn square_halves() {
        let result = split(&square(), 5.0);
        assert_eq!(result.above.len(), 1);
        assert_eq!(result.below.len(), 1);
        assert_abs_diff_eq!(result.above[0].area(), 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.below[0].area(), 50.0, epsilon = 1e-9);
        assert!(result.above[0].is_clockwise());
        assert!(result.below[0].is_clockwise());
        assert!(result.above[0].nodes().iter().all(|p| p.y >= 5.0 - 1e-9));
        assert!(result.below[0].nodes().iter().all(|p| p.y <= 5.0 + 1e-9));
    }

    #[test]
    fn diamond_splits_through_vertices() {
        let diamond = polygon(&[(5.0, 0.0), (0.0, 5.0), (5.0, 10.0), (10.0, 5.0)]);
        let result = split(&diamond, 5.0);
        assert_eq!(result.above.len(), 1);
        assert_eq!(result.below.len(), 1);
        assert_eq!(result.above[0].len(), 3);
        assert_eq!(result.below[0].len(), 3);
        assert_abs_diff_eq!(result.above[0].area(), 25.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.below[0].area(), 25.0, epsilon = 1e-9);
    }

    #[test]
    fn u_shape_gives_two_arms() {
        let u_shape = polygon(&[
            (0.0, 0.0),
            (0.0, 10.0),
            (3.0, 10.0),
            (3.0, 3.0),
            (7.0, 3.0),
            (7.0, 10.0),
            (10.0, 10.0),
            (10.0, 0.0),
        ]);
        let result = split(&u_shape, 5.0);
        assert_eq!(result.above.len(), 2);
        assert_eq!(result.below.len(), 1);
        let above = areas(&result.above);
        assert_abs_diff_eq!(above[0], 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(above[1], 15.0, epsilon = 1e-9);
        // Lower half less the part of the notch below the line.
        assert_abs_diff_eq!(result.below[0].area(), 42.0, epsilon = 1e-9);
    }

    #[test]
    fn notch_floor_on_line_splits_at_both_ends() {
        let notched = polygon(&[
            (0.0, 0.0),
            (0.0, 10.0),
            (3.0, 10.0),
            (3.0, 5.0),
            (7.0, 5.0),
            (7.0, 10.0),
            (10.0, 10.0),
            (10.0, 0.0),
        ]);
        let result = split(&notched, 5.0);
        assert_eq!(result.above.len(), 2);
        assert_eq!(result.below.len(), 1);
        let above = areas(&result.above);
        assert_abs_diff_eq!(above[0], 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(above[1], 15.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.below[0].area(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn step_on_line_splits_at_one_end() {
        let step = polygon(&[(0.0, 0.0), (0.0, 5.0), (5.0, 5.0), (5.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        let result = split(&step, 5.0);
        assert_eq!(result.above.len(), 1);
        assert_eq!(result.below.len(), 1);
        assert_abs_diff_eq!(result.above[0].area(), 25.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.below[0].area(), 50.0, epsilon = 1e-9);

        let mirrored = polygon(&[(0.0, 0.0), (0.0, 10.0), (5.0, 10.0), (5.0, 5.0), (10.0, 5.0), (10.0, 0.0)]);
        let result = split(&mirrored, 5.0);
        assert_eq!(result.above.len(), 1);
        assert_eq!(result.below.len(), 1);
        assert_abs_diff_eq!(result.above[0].area(), 25.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.below[0].area(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn counter_clockwise_guest_keeps_winding() {
        let ccw = square().reversed_winding();
        let result = split(&ccw, 4.0);
        assert_eq!(result.above.len(), 1);
        assert_eq!(result.below.len(), 1);
        assert!(!result.above[0].is_clockwise());
        assert_abs_diff_eq!(result.above[0].area(), 60.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.below[0].area(), 40.0, epsilon = 1e-9);
    }

    #[test]
    fn pieces_cover_the_guest() {
        let house = polygon(&[(0.0, 0.0), (0.0, 6.0), (5.0, 10.0), (10.0, 6.0), (10.0, 0.0)]);
        for split_v in [1.0, 3.0, 6.0, 8.5] {
            let result = split(&house, split_v);
            let total: f64 = result.above.iter().chain(&result.below).map(Polygon::area).sum();
            assert_abs_diff_eq!(total, house.area(), epsilon = 1e-9);
        }
    }

    #[test]
    fn too_few_nodes_is_an_error() {
        let obb = OrientedBoundingBox2D::new(&square(), 90.0).unwrap();
        let segment = polygon(&[(0.0, 0.0), (1.0, 1.0)]);
        assert!(obb.split(&segment, 0.5).is_err());
    }
}
