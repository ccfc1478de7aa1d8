mod events;
mod resolve;
mod skeleton;

use crate::error::{OperationError, Result};
use crate::geometry::{FloorPlate, Polygon};
use crate::math::{COINCIDENCE_TOLERANCE, SETBACK_EPSILON, TOLERANCE};

use events::{first_edge_collapse, first_vertex_poke};
use resolve::{collapse_edge, simplify_ring, split_at_poke, Removed};
use skeleton::Skeleton;

/// Numeric knobs for the inset engine.
#[derive(Debug, Clone, Copy)]
pub struct InsetOptions {
    setback_epsilon: f64,
    coincidence_tolerance: f64,
    straight_angle_tolerance: f64,
}

impl Default for InsetOptions {
    fn default() -> Self {
        Self {
            setback_epsilon: SETBACK_EPSILON,
            coincidence_tolerance: COINCIDENCE_TOLERANCE,
            straight_angle_tolerance: 1e-9,
        }
    }
}

impl InsetOptions {
    /// Sets the value that replaces setbacks `<= 0`.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if `epsilon` is not a positive
    /// finite number.
    pub fn with_setback_epsilon(mut self, epsilon: f64) -> Result<Self> {
        if epsilon <= 0.0 || !epsilon.is_finite() {
            return Err(OperationError::InvalidInput("setback epsilon must be positive and finite".to_owned()).into());
        }
        self.setback_epsilon = epsilon;
        Ok(self)
    }

    /// Sets the distance under which two nodes are the same location.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if `tolerance` is negative or
    /// not finite.
    pub fn with_coincidence_tolerance(mut self, tolerance: f64) -> Result<Self> {
        if tolerance < 0.0 || !tolerance.is_finite() {
            return Err(OperationError::InvalidInput("coincidence tolerance must be finite and not negative".to_owned()).into());
        }
        self.coincidence_tolerance = tolerance;
        Ok(self)
    }

    /// Sets the turn angle (radians) under which a vertex is a straight run.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if `radians` is negative or
    /// not finite.
    pub fn with_straight_angle_tolerance(mut self, radians: f64) -> Result<Self> {
        if radians < 0.0 || !radians.is_finite() {
            return Err(OperationError::InvalidInput("straight angle tolerance must be finite and not negative".to_owned()).into());
        }
        self.straight_angle_tolerance = radians;
        Ok(self)
    }

    #[must_use]
    pub fn setback_epsilon(&self) -> f64 {
        self.setback_epsilon
    }

    #[must_use]
    pub fn coincidence_tolerance(&self) -> f64 {
        self.coincidence_tolerance
    }

    #[must_use]
    pub fn straight_angle_tolerance(&self) -> f64 {
        self.straight_angle_tolerance
    }
}

/// An edge that disappeared during the inset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroppedEdge {
    pub segment_id: usize,
    pub edge_type: u32,
    /// Inset distance travelled by the edge within its ring when it vanished.
    pub distance: f64,
    pub ring_index: usize,
}

/// One decision taken by the engine, in processing order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InsetEvent {
    /// A plate reached its full setback without further events.
    Terminal {
        ring_index: usize,
        branch_index: usize,
        node_count: usize,
    },
    /// An edge shrank to zero length before the full setback.
    EdgeCollapse {
        ring_index: usize,
        branch_index: usize,
        edge: usize,
        segment_id: usize,
        fraction: f64,
    },
    /// A reflex vertex reached a non-adjacent edge before the full setback.
    VertexPoke {
        ring_index: usize,
        branch_index: usize,
        vertex: usize,
        edge: usize,
        fraction: f64,
    },
    /// A plate had too few distinct nodes or no area.
    Degenerate { ring_index: usize, branch_index: usize },
    /// A branch went deeper than the input vertex count and was dropped.
    DepthLimit { ring_index: usize, branch_index: usize },
}

/// Terminal floor plates plus the audit trail of one inset run.
#[derive(Debug, Clone, Default)]
pub struct InsetResult {
    pub floor_plates: Vec<FloorPlate>,
    pub dropped_edges: Vec<DroppedEdge>,
    pub events: Vec<InsetEvent>,
}

impl InsetResult {
    /// Sum of the areas of all terminal plates.
    #[must_use]
    pub fn total_area(&self) -> f64 {
        self.floor_plates.iter().map(FloorPlate::area).sum()
    }

    /// Returns `true` if the inset produced no plate.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.floor_plates.is_empty()
    }
}

/// Shrinks a floor plate inward, each edge by its own stepback.
///
/// # Algorithm
///
/// 1. Every vertex gets a skeleton vector: where it moves when all edges
///    have travelled their full setback.
/// 2. Before committing, the plate is scanned for the earliest edge
///    collapse and the earliest reflex-vertex poke, both as a fraction of
///    the full setback.
/// 3. With no event at or before fraction 1, the fully moved polygon is a
///    terminal plate. Otherwise the plate is moved to the event, reduced
///    (collapse) or cut in two (poke), and the remainder is queued with
///    every residual stepback scaled by `1 - fraction`.
///
/// Input plates may wind either way; counter-clockwise plates are re-wound
/// first. The caller's plate is never modified.
#[derive(Debug)]
pub struct PerEdgeInset {
    plate: FloorPlate,
    options: InsetOptions,
}

impl PerEdgeInset {
    /// Creates a new inset operation with default options.
    #[must_use]
    pub fn new(plate: FloorPlate) -> Self {
        Self {
            plate,
            options: InsetOptions::default(),
        }
    }

    /// Replaces the numeric options.
    #[must_use]
    pub fn with_options(mut self, options: InsetOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs the inset from ring 0, branch 0.
    #[must_use]
    pub fn execute(&self) -> InsetResult {
        compute_inset(&self.plate, 0, 0, &self.options)
    }
}

/// A plate waiting to be processed.
struct Pending {
    plate: FloorPlate,
    ring_index: usize,
    branch_index: usize,
}

/// Computes the terminal plates for `plate`, labelling the first ring
/// `ring_index` and the starting branch `branch_index`.
///
/// Degenerate input yields an empty result rather than an error.
#[must_use]
pub fn compute_inset(plate: &FloorPlate, ring_index: usize, branch_index: usize, options: &InsetOptions) -> InsetResult {
    let root = if plate.polygon().signed_area() > 0.0 {
        tracing::debug!("re-winding counter-clockwise plate");
        plate.reversed()
    } else {
        plate.clone()
    };
    let max_ring = ring_index + root.polygon().len();
    let mut next_branch = branch_index + 1;

    let mut result = InsetResult::default();
    let mut stack = vec![Pending {
        plate: root,
        ring_index,
        branch_index,
    }];

    while let Some(Pending {
        plate,
        ring_index,
        branch_index,
    }) = stack.pop()
    {
        if ring_index > max_ring {
            tracing::warn!(ring_index, branch_index, "inset depth limit reached; dropping branch");
            result.events.push(InsetEvent::DepthLimit {
                ring_index,
                branch_index,
            });
            continue;
        }

        let (polygon, all_data) = plate.into_parts();
        let (nodes, edge_data, pruned) = simplify_ring(polygon.nodes(), &all_data, None, options);
        if !pruned.is_empty() {
            tracing::debug!(ring_index, branch_index, count = pruned.len(), "pruned zero-length edges and spikes");
        }
        let removed: Vec<Removed> = pruned
            .into_iter()
            .map(|i| Removed {
                data: all_data[i],
                distance: 0.0,
            })
            .collect();
        record_dropped(&mut result, &removed, ring_index);

        let polygon = Polygon::new(nodes);
        if polygon.len() < 3 || polygon.is_degenerate(options.coincidence_tolerance()) {
            tracing::debug!(ring_index, branch_index, "degenerate plate; no result");
            result.events.push(InsetEvent::Degenerate {
                ring_index,
                branch_index,
            });
            continue;
        }

        let stepbacks: Vec<f64> = edge_data.iter().map(|d| d.stepback).collect();
        let skeleton = Skeleton::build(polygon.nodes(), &stepbacks, options);
        let collapse = first_edge_collapse(&skeleton);
        let poke = first_vertex_poke(&skeleton);
        let poke_at = poke.map_or(f64::INFINITY, |p| p.fraction);

        // On a tie the collapse goes first; the reduced ring is simplified
        // before the poke would be looked for again.
        match (collapse, poke) {
            (Some(c), _) if c.fraction <= 1.0 && c.fraction <= poke_at + TOLERANCE => {
                tracing::debug!(ring_index, branch_index, edge = c.edge, fraction = c.fraction, "edge collapse");
                result.events.push(InsetEvent::EdgeCollapse {
                    ring_index,
                    branch_index,
                    edge: c.edge,
                    segment_id: edge_data[c.edge].segment_id,
                    fraction: c.fraction,
                });
                let (child, removed) = collapse_edge(&skeleton, &edge_data, c, options);
                record_dropped(&mut result, &removed, ring_index);
                stack.push(Pending {
                    plate: child,
                    ring_index: ring_index + 1,
                    branch_index,
                });
            }
            (_, Some(p)) if p.fraction <= 1.0 => {
                tracing::debug!(
                    ring_index,
                    branch_index,
                    vertex = p.vertex,
                    edge = p.edge,
                    fraction = p.fraction,
                    "vertex poke"
                );
                result.events.push(InsetEvent::VertexPoke {
                    ring_index,
                    branch_index,
                    vertex: p.vertex,
                    edge: p.edge,
                    fraction: p.fraction,
                });
                let (first, second, removed) = split_at_poke(&skeleton, &edge_data, p, options);
                record_dropped(&mut result, &removed, ring_index);
                let first_branch = next_branch;
                let second_branch = next_branch + 1;
                next_branch += 2;
                for (piece, piece_branch) in [(second, second_branch), (first, first_branch)] {
                    if piece.polygon().is_degenerate(options.coincidence_tolerance()) {
                        tracing::debug!(ring_index, branch_index = piece_branch, "zero-area split piece dropped");
                        result.events.push(InsetEvent::Degenerate {
                            ring_index: ring_index + 1,
                            branch_index: piece_branch,
                        });
                        continue;
                    }
                    stack.push(Pending {
                        plate: piece,
                        ring_index: ring_index + 1,
                        branch_index: piece_branch,
                    });
                }
            }
            _ => {
                let nodes = skeleton.positions_at(1.0);
                tracing::debug!(ring_index, branch_index, nodes = nodes.len(), "terminal plate");
                result.events.push(InsetEvent::Terminal {
                    ring_index,
                    branch_index,
                    node_count: nodes.len(),
                });
                result
                    .floor_plates
                    .push(FloorPlate::from_parts(Polygon::new(nodes), edge_data));
            }
        }
    }

    result
}

fn record_dropped(result: &mut InsetResult, removed: &[Removed], ring_index: usize) {
    result.dropped_edges.extend(removed.iter().map(|r| DroppedEdge {
        segment_id: r.data.segment_id,
        edge_type: r.data.edge_type,
        distance: r.distance,
        ring_index,
    }));
}
