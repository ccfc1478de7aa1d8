use super::Polygon;
use crate::error::{OperationError, Result};

/// Provenance of one floor plate edge.
///
/// `segment_id` follows an edge through every collapse and split, so a
/// consumer can trace which input edge a surviving edge came from.
/// `edge_type` is a caller-defined code the kernel never interprets.
/// `stepback` is the setback still to be applied to this edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeData {
    pub segment_id: usize,
    pub edge_type: u32,
    pub stepback: f64,
}

impl EdgeData {
    /// Creates a new edge record.
    #[must_use]
    pub fn new(segment_id: usize, edge_type: u32, stepback: f64) -> Self {
        Self {
            segment_id,
            edge_type,
            stepback,
        }
    }

    /// The same record with a different stepback.
    #[must_use]
    pub fn with_stepback(self, stepback: f64) -> Self {
        Self { stepback, ..self }
    }
}

/// A polygon with one [`EdgeData`] per edge: entry `i` belongs to the edge
/// from node `i` to node `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorPlate {
    polygon: Polygon,
    edge_data: Vec<EdgeData>,
}

impl FloorPlate {
    /// Pairs a polygon with its edge data.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::EdgeDataMismatch` if the edge data count
    /// differs from the polygon's edge count.
    pub fn new(polygon: Polygon, edge_data: Vec<EdgeData>) -> Result<Self> {
        if polygon.len() != edge_data.len() {
            return Err(OperationError::EdgeDataMismatch {
                what: "edge data",
                expected: polygon.len(),
                found: edge_data.len(),
            }
            .into());
        }
        Ok(Self { polygon, edge_data })
    }

    /// Builds a floor plate from one setback per edge. Segment ids are the
    /// edge indices and every edge type is `0`.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::EdgeDataMismatch` if `setbacks` does not
    /// have one entry per edge.
    pub fn from_setbacks(polygon: Polygon, setbacks: &[f64]) -> Result<Self> {
        let edge_data = setbacks
            .iter()
            .enumerate()
            .map(|(i, &s)| EdgeData::new(i, 0, s))
            .collect();
        Self::new(polygon, edge_data)
    }

    /// Internal constructor for plates whose cardinality is known to match.
    pub(crate) fn from_parts(polygon: Polygon, edge_data: Vec<EdgeData>) -> Self {
        debug_assert_eq!(polygon.len(), edge_data.len());
        Self { polygon, edge_data }
    }

    #[must_use]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    #[must_use]
    pub fn edge_data(&self) -> &[EdgeData] {
        &self.edge_data
    }

    /// The `stepback` of every edge, in edge order.
    #[must_use]
    pub fn stepbacks(&self) -> Vec<f64> {
        self.edge_data.iter().map(|d| d.stepback).collect()
    }

    /// Unsigned area of the polygon.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.polygon.area()
    }

    /// Replaces every stepback, keeping ids and types.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::EdgeDataMismatch` on a length mismatch.
    pub fn with_stepbacks(&self, stepbacks: &[f64]) -> Result<Self> {
        if stepbacks.len() != self.edge_data.len() {
            return Err(OperationError::EdgeDataMismatch {
                what: "stepbacks",
                expected: self.edge_data.len(),
                found: stepbacks.len(),
            }
            .into());
        }
        let edge_data = self
            .edge_data
            .iter()
            .zip(stepbacks)
            .map(|(d, &s)| d.with_stepback(s))
            .collect();
        Ok(Self::from_parts(self.polygon.clone(), edge_data))
    }

    /// Reverses the winding, re-indexing edge data so every record stays
    /// with the same geometric edge.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let polygon = self.polygon.reversed_winding();
        let edge_data = self.edge_data.iter().rev().copied().collect();
        Self::from_parts(polygon, edge_data)
    }

    /// Splits the plate into its polygon and edge data.
    #[must_use]
    pub fn into_parts(self) -> (Polygon, Vec<EdgeData>) {
        (self.polygon, self.edge_data)
    }
}
