use crate::error::{OperationError, Result};
use crate::geometry::FloorPlate;
use crate::math::vector_2d::is_within_tolerance;
use crate::operations::inset::{compute_inset, InsetOptions, InsetResult};

/// How an area search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// The requested setbacks already reach the target; nothing was scaled.
    Unscaled,
    /// A multiplier was found whose area is within tolerance of the target.
    Converged,
    /// The iteration cap was hit. The outcome holds the last non-empty
    /// evaluation, or the unscaled one if every evaluation overshot.
    IterationCap,
}

/// Numeric knobs for [`AreaTargetSearch`].
#[derive(Debug, Clone, Copy)]
pub struct AreaSearchOptions {
    relative_tolerance: f64,
    max_iterations: usize,
    growth_factor: f64,
    initial_multiplier: f64,
}

impl Default for AreaSearchOptions {
    fn default() -> Self {
        Self {
            relative_tolerance: 1e-4,
            max_iterations: 30,
            growth_factor: 1.5,
            initial_multiplier: 1.0,
        }
    }
}

impl AreaSearchOptions {
    /// Creates validated search options.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the tolerance or initial
    /// multiplier is not positive, `max_iterations` is zero, or the growth
    /// factor is not greater than one.
    pub fn new(
        relative_tolerance: f64,
        max_iterations: usize,
        growth_factor: f64,
        initial_multiplier: f64,
    ) -> Result<Self> {
        if relative_tolerance <= 0.0 || !relative_tolerance.is_finite() {
            return Err(OperationError::InvalidInput("relative tolerance must be positive".to_owned()).into());
        }
        if max_iterations == 0 {
            return Err(OperationError::InvalidInput("max iterations must be at least 1".to_owned()).into());
        }
        if growth_factor <= 1.0 || !growth_factor.is_finite() {
            return Err(OperationError::InvalidInput("growth factor must be greater than 1".to_owned()).into());
        }
        if initial_multiplier <= 0.0 || !initial_multiplier.is_finite() {
            return Err(OperationError::InvalidInput("initial multiplier must be positive".to_owned()).into());
        }
        Ok(Self {
            relative_tolerance,
            max_iterations,
            growth_factor,
            initial_multiplier,
        })
    }

    #[must_use]
    pub fn relative_tolerance(&self) -> f64 {
        self.relative_tolerance
    }

    #[must_use]
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    #[must_use]
    pub fn growth_factor(&self) -> f64 {
        self.growth_factor
    }

    #[must_use]
    pub fn initial_multiplier(&self) -> f64 {
        self.initial_multiplier
    }
}

/// Result of an area search.
#[derive(Debug, Clone)]
pub struct AreaSearchOutcome {
    /// Inset result at `multiplier`.
    pub result: InsetResult,
    /// Extra setback added to every variable edge.
    pub multiplier: f64,
    /// Number of engine runs after the unscaled one.
    pub iterations: usize,
    pub status: SearchStatus,
}

impl AreaSearchOutcome {
    /// Total area of the terminal plates in `result`.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.result.total_area()
    }
}

/// Finds the extra setback on variable edges that brings the inset area
/// down to a target.
///
/// # Algorithm
///
/// The plate is first inset with its requested setbacks. If that area is
/// already at or below the target there is nothing to do, since more setback
/// can only shrink the area. Otherwise a multiplier `m` is added to the
/// requested setback of every variable edge, starting from the initial
/// multiplier and growing geometrically until the area falls below the
/// target or the inset comes back empty (an overshoot). The bracket is then
/// bisected until the area is within the relative tolerance.
///
/// Fixed edges keep their requested setback, and a variable edge never
/// drops below its own.
#[derive(Debug)]
pub struct AreaTargetSearch {
    plate: FloorPlate,
    target_area: f64,
    variable_edges: Vec<bool>,
    options: AreaSearchOptions,
    inset_options: InsetOptions,
}

impl AreaTargetSearch {
    /// Creates a new area search.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::EdgeDataMismatch` if `variable_edges` does
    /// not have one entry per edge, or `OperationError::InvalidInput` if
    /// `target_area` is negative or not finite.
    pub fn new(plate: FloorPlate, target_area: f64, variable_edges: Vec<bool>) -> Result<Self> {
        if variable_edges.len() != plate.edge_data().len() {
            return Err(OperationError::EdgeDataMismatch {
                what: "variable edge mask",
                expected: plate.edge_data().len(),
                found: variable_edges.len(),
            }
            .into());
        }
        if !target_area.is_finite() || target_area < 0.0 {
            return Err(OperationError::InvalidInput(format!("target area must be a non-negative number, got {target_area}")).into());
        }
        Ok(Self {
            plate,
            target_area,
            variable_edges,
            options: AreaSearchOptions::default(),
            inset_options: InsetOptions::default(),
        })
    }

    /// Replaces the search options.
    #[must_use]
    pub fn with_options(mut self, options: AreaSearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the options passed to every inset run.
    #[must_use]
    pub fn with_inset_options(mut self, inset_options: InsetOptions) -> Self {
        self.inset_options = inset_options;
        self
    }

    /// Runs the search.
    #[must_use]
    pub fn execute(&self) -> AreaSearchOutcome {
        let target = self.target_area;
        let tolerance = self.options.relative_tolerance;

        let base = self.evaluate(0.0);
        let base_area = base.total_area();
        if base_area <= target || is_within_tolerance(base_area, target, tolerance) {
            tracing::debug!(base_area, target, "requested setbacks already meet target");
            return AreaSearchOutcome {
                result: base,
                multiplier: 0.0,
                iterations: 0,
                status: SearchStatus::Unscaled,
            };
        }

        let mut low = 0.0;
        let mut high: Option<f64> = None;
        let mut multiplier = self.options.initial_multiplier;
        let mut last_success: Option<(InsetResult, f64)> = None;

        for iteration in 1..=self.options.max_iterations {
            let result = self.evaluate(multiplier);
            let area = result.total_area();
            tracing::trace!(iteration, multiplier, area, "area search step");

            if result.is_empty() {
                high = Some(multiplier);
            } else if is_within_tolerance(area, target, tolerance) {
                tracing::debug!(iteration, multiplier, area, "area search converged");
                return AreaSearchOutcome {
                    result,
                    multiplier,
                    iterations: iteration,
                    status: SearchStatus::Converged,
                };
            } else {
                if area > target {
                    low = multiplier;
                } else {
                    high = Some(multiplier);
                }
                last_success = Some((result, multiplier));
            }

            multiplier = match high {
                Some(high) => (low + high) / 2.0,
                None => multiplier * self.options.growth_factor,
            };
        }

        tracing::warn!(
            max_iterations = self.options.max_iterations,
            target,
            "area search hit iteration cap"
        );
        let (result, multiplier) = last_success.unwrap_or((base, 0.0));
        AreaSearchOutcome {
            result,
            multiplier,
            iterations: self.options.max_iterations,
            status: SearchStatus::IterationCap,
        }
    }

    /// Insets a copy of the plate with `multiplier` added to every variable
    /// edge's requested setback.
    fn evaluate(&self, multiplier: f64) -> InsetResult {
        let edge_data = self
            .plate
            .edge_data()
            .iter()
            .zip(&self.variable_edges)
            .map(|(d, &variable)| {
                if variable {
                    d.with_stepback((d.stepback + multiplier).max(d.stepback))
                } else {
                    *d
                }
            })
            .collect();
        let scaled = FloorPlate::from_parts(self.plate.polygon().clone(), edge_data);
        compute_inset(&scaled, 0, 0, &self.inset_options)
    }
}
