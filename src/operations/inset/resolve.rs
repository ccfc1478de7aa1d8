use std::f64::consts::PI;

use super::events::{EdgeCollapse, VertexPoke};
use super::skeleton::Skeleton;
use super::InsetOptions;
use crate::geometry::{EdgeData, FloorPlate, Polygon};
use crate::math::vector_2d::{angle_between, cross_z, points_coincident_2d};
use crate::math::{Point3, Vector3};

/// An edge removed from a plate, with the inset distance at which it went.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Removed {
    pub data: EdgeData,
    pub distance: f64,
}

/// Removes `forced` if given, then zero-length edges and spike tips until
/// neither remains.
///
/// Removing edge `i` drops node `i` and keeps node `i + 1`, so edge `i - 1`
/// now runs to where edge `i` ended. A spike tip is a node whose incoming
/// and outgoing edges run back along each other. Dropping it leaves a single
/// edge from its predecessor to its successor, which lies along the longer
/// of the two and keeps that edge's data.
///
/// Returns the kept nodes and edge data and the original indices of the
/// removed edges in removal order.
pub(crate) fn simplify_ring(
    points: &[Point3],
    edge_data: &[EdgeData],
    forced: Option<usize>,
    options: &InsetOptions,
) -> (Vec<Point3>, Vec<EdgeData>, Vec<usize>) {
    let mut nodes = points.to_vec();
    let mut edges: Vec<usize> = (0..points.len()).collect();
    let mut removed = Vec::new();

    if let Some(i) = forced.filter(|&i| i < nodes.len()) {
        nodes.remove(i);
        removed.push(edges.remove(i));
    }

    loop {
        let m = nodes.len();
        if m == 0 {
            break;
        }
        let zero_length =
            (0..m).find(|&k| points_coincident_2d(&nodes[k], &nodes[(k + 1) % m], options.coincidence_tolerance()));
        if let Some(k) = zero_length {
            nodes.remove(k);
            removed.push(edges.remove(k));
            continue;
        }
        if m < 3 {
            break;
        }

        let Some(k) = (0..m).find(|&k| is_spike(&nodes[(k + m - 1) % m], &nodes[k], &nodes[(k + 1) % m], options))
        else {
            break;
        };
        // Keep the tip off index 0 so its predecessor does not wrap.
        let k = if k == 0 {
            nodes.rotate_left(1);
            edges.rotate_left(1);
            m - 1
        } else {
            k
        };
        let prev = k - 1;
        let incoming = flat(&(nodes[k] - nodes[prev])).norm();
        let outgoing = flat(&(nodes[(k + 1) % m] - nodes[k])).norm();
        nodes.remove(k);
        let shorter = if incoming >= outgoing { k } else { prev };
        removed.push(edges.remove(shorter));
    }

    let data = edges.iter().map(|&i| edge_data[i]).collect();
    (nodes, data, removed)
}

/// Returns `true` if the boundary doubles back on itself at `at`.
fn is_spike(prev: &Point3, at: &Point3, next: &Point3, options: &InsetOptions) -> bool {
    let a = flat(&(at - prev));
    let b = flat(&(next - at));
    if a.dot(&b) >= 0.0 {
        return false;
    }
    let longest = a.norm().max(b.norm());
    let offset = cross_z(&a, &b).abs() / longest;
    offset <= options.coincidence_tolerance() || PI - angle_between(&a, &b) <= options.straight_angle_tolerance()
}

fn flat(v: &Vector3) -> Vector3 {
    Vector3::new(v.x, v.y, 0.0)
}

/// Builds the reduced plate after an edge collapse.
///
/// Every surviving edge's residual stepback is its setback scaled by
/// `1 - fraction`. Edges that reach zero length at the same fraction as the
/// collapsing edge are removed with it, as are edges left lying back along
/// a neighbour.
pub(crate) fn collapse_edge(
    skeleton: &Skeleton,
    edge_data: &[EdgeData],
    event: EdgeCollapse,
    options: &InsetOptions,
) -> (FloorPlate, Vec<Removed>) {
    let t = event.fraction;
    let points = skeleton.positions_at(t);
    let residual: Vec<EdgeData> = edge_data
        .iter()
        .zip(&skeleton.setbacks)
        .map(|(d, s)| d.with_stepback(s * (1.0 - t)))
        .collect();
    let (nodes, data, removed) = simplify_ring(&points, &residual, Some(event.edge), options);
    let removed = removed
        .into_iter()
        .map(|i| Removed {
            data: edge_data[i],
            distance: t * skeleton.setbacks[i],
        })
        .collect();
    (FloorPlate::from_parts(Polygon::new(nodes), data), removed)
}

/// Cuts the plate in two where a reflex vertex meets an edge.
///
/// The first loop runs from the poking vertex forward to the start of the
/// poked edge and closes along that edge. The second starts at the poking
/// vertex, follows the poked edge to its end and continues forward back to
/// the vertex. Both share the poking vertex, which lies on the poked edge
/// at this fraction. Each piece is simplified; an edge that vanishes from
/// either piece is reported once.
pub(crate) fn split_at_poke(
    skeleton: &Skeleton,
    edge_data: &[EdgeData],
    event: VertexPoke,
    options: &InsetOptions,
) -> (FloorPlate, FloorPlate, Vec<Removed>) {
    let n = skeleton.len();
    let t = event.fraction;

    let mut first = Vec::new();
    let mut i = event.vertex;
    loop {
        first.push(i);
        if i == event.edge {
            break;
        }
        i = (i + 1) % n;
    }

    let mut second_nodes = vec![event.vertex];
    let mut second_edges = vec![event.edge];
    let mut i = (event.edge + 1) % n;
    while i != event.vertex {
        second_nodes.push(i);
        second_edges.push(i);
        i = (i + 1) % n;
    }

    let (first_plate, mut gone) = piece(skeleton, edge_data, t, &first, &first, options);
    let (second_plate, second_gone) = piece(skeleton, edge_data, t, &second_nodes, &second_edges, options);
    gone.extend(second_gone);
    gone.sort_unstable();
    gone.dedup();

    let removed = gone
        .into_iter()
        .map(|i| Removed {
            data: edge_data[i],
            distance: t * skeleton.setbacks[i],
        })
        .collect();
    (first_plate, second_plate, removed)
}

/// One side of a split: nodes and edges picked by index, with residual
/// stepbacks at fraction `t`. Returns the simplified plate and the removed
/// edge indices.
fn piece(
    skeleton: &Skeleton,
    edge_data: &[EdgeData],
    t: f64,
    node_ids: &[usize],
    edge_ids: &[usize],
    options: &InsetOptions,
) -> (FloorPlate, Vec<usize>) {
    let nodes: Vec<Point3> = node_ids.iter().map(|&i| skeleton.position_at(i, t)).collect();
    let data: Vec<EdgeData> = edge_ids
        .iter()
        .map(|&i| edge_data[i].with_stepback(skeleton.setbacks[i] * (1.0 - t)))
        .collect();
    let (nodes, data, removed) = simplify_ring(&nodes, &data, None, options);
    let removed = removed.into_iter().map(|k| edge_ids[k]).collect();
    (FloorPlate::from_parts(Polygon::new(nodes), data), removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn points(coords: &[(f64, f64)]) -> Vec<Point3> {
        coords.iter().map(|&(x, y)| Point3::new(x, y, 0.0)).collect()
    }

    fn data(n: usize, stepback: f64) -> Vec<EdgeData> {
        (0..n).map(|i| EdgeData::new(i, 7, stepback)).collect()
    }

    fn ids(data: &[EdgeData]) -> Vec<usize> {
        data.iter().map(|d| d.segment_id).collect()
    }

    #[test]
    fn zero_length_edges_are_pruned() {
        let pts = points(&[(0.0, 0.0), (0.0, 5.0), (0.0, 5.0), (5.0, 5.0), (5.0, 0.0)]);
        let (nodes, kept, removed) = simplify_ring(&pts, &data(5, 1.0), None, &InsetOptions::default());
        assert_eq!(removed, vec![1]);
        assert_eq!(nodes.len(), 4);
        assert_eq!(ids(&kept), vec![0, 2, 3, 4]);
    }

    #[test]
    fn spike_tip_is_removed_and_longer_edge_kept() {
        // A rectangle with a zero-width tail running out along its bottom.
        let pts = points(&[(0.5, 3.5), (0.5, 9.5), (3.5, 9.5), (3.5, 3.5), (9.5, 3.5)]);
        let (nodes, kept, removed) = simplify_ring(&pts, &data(5, 1.0), None, &InsetOptions::default());
        assert_eq!(removed, vec![3]);
        assert_eq!(nodes.len(), 4);
        assert_eq!(ids(&kept), vec![0, 1, 2, 4]);
        assert_abs_diff_eq!(Polygon::new(nodes).area(), 18.0, epsilon = 1e-12);
    }

    #[test]
    fn equal_spike_collapses_to_its_base() {
        let pts = points(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (8.0, 4.0), (4.0, 4.0), (4.0, 0.0)]);
        let (nodes, kept, removed) = simplify_ring(&pts, &data(6, 1.0), None, &InsetOptions::default());
        assert_eq!(removed, vec![3, 2]);
        assert_eq!(ids(&kept), vec![0, 1, 4, 5]);
        assert_abs_diff_eq!(Polygon::new(nodes).area(), 16.0, epsilon = 1e-12);
    }

    #[test]
    fn spike_at_first_node_is_removed() {
        let pts = points(&[(9.5, 3.5), (0.5, 3.5), (0.5, 9.5), (3.5, 9.5), (3.5, 3.5)]);
        let (nodes, kept, removed) = simplify_ring(&pts, &data(5, 1.0), None, &InsetOptions::default());
        assert_eq!(removed, vec![4]);
        assert_eq!(nodes.len(), 4);
        let mut kept = ids(&kept);
        kept.sort_unstable();
        assert_eq!(kept, vec![0, 1, 2, 3]);
        assert_abs_diff_eq!(Polygon::new(nodes).area(), 18.0, epsilon = 1e-12);
    }

    #[test]
    fn right_angles_and_straight_runs_are_kept() {
        let pts = points(&[(0.0, 0.0), (0.0, 5.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        let (nodes, _, removed) = simplify_ring(&pts, &data(5, 1.0), None, &InsetOptions::default());
        assert!(removed.is_empty());
        assert_eq!(nodes.len(), 5);
    }

    #[test]
    fn collapse_drops_edge_and_rescales() {
        let pts = points(&[(0.0, 0.0), (0.0, 9.0), (1.0, 10.0), (10.0, 10.0), (10.0, 0.0)]);
        let options = InsetOptions::default();
        let skeleton = Skeleton::build(&pts, &[2.0; 5], &options);
        let event = EdgeCollapse { edge: 1, fraction: 0.5 };
        let (plate, removed) = collapse_edge(&skeleton, &data(5, 2.0), event, &options);
        assert_eq!(plate.polygon().len(), 4);
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].data.segment_id, 1);
        assert_abs_diff_eq!(removed[0].distance, 1.0);
        for d in plate.edge_data() {
            assert_abs_diff_eq!(d.stepback, 1.0);
            assert_eq!(d.edge_type, 7);
        }
    }

    #[test]
    fn collapse_of_thinned_arm_leaves_no_tail() {
        // L-shape; the horizontal arm closes at t = 4 / 6.5.
        let pts = points(&[(0.0, 0.0), (0.0, 10.0), (4.0, 10.0), (4.0, 4.0), (10.0, 4.0), (10.0, 0.0)]);
        let setbacks = [0.5, 0.5, 0.5, 0.5, 0.5, 6.0];
        let options = InsetOptions::default();
        let skeleton = Skeleton::build(&pts, &setbacks, &options);
        let edge_data: Vec<EdgeData> = setbacks.iter().enumerate().map(|(i, &s)| EdgeData::new(i, 7, s)).collect();
        let t = 4.0 / 6.5;
        let (plate, removed) = collapse_edge(&skeleton, &edge_data, EdgeCollapse { edge: 4, fraction: t }, &options);

        let mut gone: Vec<usize> = removed.iter().map(|r| r.data.segment_id).collect();
        gone.sort_unstable();
        assert_eq!(gone, vec![3, 4]);
        assert_eq!(plate.polygon().len(), 4);
        assert_eq!(ids(plate.edge_data()), vec![0, 1, 2, 5]);
        assert_abs_diff_eq!(plate.edge_data()[3].stepback, 6.0 * (1.0 - t), epsilon = 1e-12);
        for node in plate.polygon().nodes() {
            assert!(node.x < 4.0, "node {node:?} left on the vanished arm");
        }
    }

    #[test]
    fn poke_split_partitions_edges() {
        let pts = points(&[
            (0.0, 0.0),
            (0.0, 10.0),
            (8.0, 10.0),
            (10.0, 4.0),
            (12.0, 10.0),
            (20.0, 10.0),
            (20.0, 0.0),
        ]);
        let options = InsetOptions::default();
        let skeleton = Skeleton::build(&pts, &[2.0; 7], &options);
        let event = VertexPoke {
            vertex: 3,
            edge: 6,
            fraction: 0.25,
        };
        let (first, second, removed) = split_at_poke(&skeleton, &data(7, 2.0), event, &options);
        assert!(removed.is_empty());
        assert_eq!(ids(first.edge_data()), vec![3, 4, 5, 6]);
        assert_eq!(ids(second.edge_data()), vec![6, 0, 1, 2]);
        assert_eq!(first.polygon().nodes()[0], second.polygon().nodes()[0]);
        assert_abs_diff_eq!(first.edge_data()[0].stepback, 1.5);
    }

    #[test]
    fn split_across_closed_crossbar_drops_its_edges() {
        // H-shape; the crossbar closes at t = 2 / 3 and vertex 3 lands on
        // the end of the crossbar's lower edge.
        let pts = points(&[
            (0.0, 0.0),
            (0.0, 10.0),
            (4.0, 10.0),
            (4.0, 6.0),
            (6.0, 6.0),
            (6.0, 10.0),
            (10.0, 10.0),
            (10.0, 0.0),
            (6.0, 0.0),
            (6.0, 4.0),
            (4.0, 4.0),
            (4.0, 0.0),
        ]);
        let options = InsetOptions::default();
        let skeleton = Skeleton::build(&pts, &[1.5; 12], &options);
        let event = VertexPoke {
            vertex: 3,
            edge: 9,
            fraction: 2.0 / 3.0,
        };
        let (first, second, removed) = split_at_poke(&skeleton, &data(12, 1.5), event, &options);

        let gone: Vec<usize> = removed.iter().map(|r| r.data.segment_id).collect();
        assert_eq!(gone, vec![3, 9]);
        assert_abs_diff_eq!(removed[0].distance, 1.0, epsilon = 1e-12);
        for (plate, lo, hi) in [(&first, 7.0, 9.0), (&second, 1.0, 3.0)] {
            assert_abs_diff_eq!(plate.area(), 16.0, epsilon = 1e-9);
            assert!(!plate.edge_data().iter().any(|d| d.segment_id == 3 || d.segment_id == 9));
            for node in plate.polygon().nodes() {
                assert!(node.x > lo - 1e-9 && node.x < hi + 1e-9, "node {node:?}");
            }
        }
    }
}
