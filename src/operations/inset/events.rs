use super::skeleton::{Skeleton, VertexTurn};
use crate::math::vector_2d::{scalar_projection, unit_inward_normal};
use crate::math::TOLERANCE;

/// Slack on the poked edge's extent when checking where a poke lands.
const EXTENT_TOLERANCE: f64 = 1e-9;

/// Edge `edge` shrinks to zero length at `fraction` of the setback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct EdgeCollapse {
    pub edge: usize,
    pub fraction: f64,
}

/// Reflex vertex `vertex` reaches edge `edge` at `fraction` of the setback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct VertexPoke {
    pub vertex: usize,
    pub edge: usize,
    pub fraction: f64,
}

/// Finds the earliest positive edge collapse.
///
/// The endpoint skeleton vectors are projected onto the edge (forward from
/// the start, backward from the end) to get the closing rate. The meeting
/// point of the two rays is then projected onto the edge normal, and that
/// inset distance over the edge's own setback is the collapse fraction.
/// Ties keep the lowest edge index.
pub(crate) fn first_edge_collapse(skeleton: &Skeleton) -> Option<EdgeCollapse> {
    let n = skeleton.len();
    let mut best: Option<EdgeCollapse> = None;
    for i in 0..n {
        let edge = skeleton.edge_vector(i);
        let length = edge.norm();
        let forward = scalar_projection(&skeleton.vectors[i], &edge);
        let backward = scalar_projection(&skeleton.vectors[(i + 1) % n], &(-edge));
        let closing_rate = forward + backward;
        if closing_rate.abs() < TOLERANCE {
            continue;
        }
        let meeting = skeleton.vectors[i] * (length / closing_rate);
        let inset = scalar_projection(&meeting, &unit_inward_normal(&edge));
        let fraction = inset / skeleton.setbacks[i];
        tracing::trace!(edge = i, fraction, "edge collapse candidate");
        if fraction > 0.0 && best.map_or(true, |b| fraction < b.fraction) {
            best = Some(EdgeCollapse { edge: i, fraction });
        }
    }
    best
}

/// Finds the earliest reflex-vertex poke through a non-adjacent edge.
///
/// Edges touching the vertex and the edges next to those (`p - 2 ..= p + 1`)
/// are never candidates. A candidate edge must face the vertex, the vertex
/// must be moving against the edge's inward normal, and at the computed
/// fraction the vertex must land within the moved edge.
pub(crate) fn first_vertex_poke(skeleton: &Skeleton) -> Option<VertexPoke> {
    let n = skeleton.len();
    let mut best: Option<VertexPoke> = None;
    for p in 0..n {
        if skeleton.turns[p] != VertexTurn::Concave {
            continue;
        }
        let poker = skeleton.vectors[p];
        for e in 0..n {
            if is_adjacent(p, e, n) {
                continue;
            }
            let normal = unit_inward_normal(&skeleton.edge_vector(e));
            let poker_speed = poker.dot(&normal);
            if poker_speed >= -TOLERANCE {
                continue;
            }
            let distance = (skeleton.origins[p] - skeleton.origins[e]).dot(&normal);
            if distance <= 0.0 {
                continue;
            }
            let edge_speed = skeleton.vectors[e].dot(&normal).abs();
            if edge_speed < TOLERANCE {
                continue;
            }
            let setback = skeleton.setbacks[e];
            let speed_ratio = poker_speed.abs() / edge_speed;
            let fraction = distance / (speed_ratio * setback + setback);
            if fraction <= 0.0 || best.is_some_and(|b| fraction >= b.fraction) {
                continue;
            }
            if !lands_on_edge(skeleton, p, e, fraction) {
                tracing::trace!(vertex = p, edge = e, fraction, "poke misses edge extent");
                continue;
            }
            tracing::trace!(vertex = p, edge = e, fraction, "vertex poke candidate");
            best = Some(VertexPoke {
                vertex: p,
                edge: e,
                fraction,
            });
        }
    }
    best
}

/// Edge `e` is one of the four edges around vertex `p`.
fn is_adjacent(p: usize, e: usize, n: usize) -> bool {
    (0..4).any(|k| (p + n + n - 2 + k) % n == e)
}

/// Whether vertex `p` at fraction `t` projects inside moved edge `e`.
fn lands_on_edge(skeleton: &Skeleton, p: usize, e: usize, t: f64) -> bool {
    let n = skeleton.len();
    let a = skeleton.position_at(e, t);
    let b = skeleton.position_at((e + 1) % n, t);
    let q = skeleton.position_at(p, t);
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq < TOLERANCE * TOLERANCE {
        return false;
    }
    let aq = q - a;
    let param = (aq.x * ab.x + aq.y * ab.y) / len_sq;
    (-EXTENT_TOLERANCE..=1.0 + EXTENT_TOLERANCE).contains(&param)
}
