use thiserror::Error;

/// Top-level error type for the setback kernel.
#[derive(Debug, Error)]
pub enum SetbackError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to kernel operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{what} has {found} entries but the polygon has {expected} edges")]
    EdgeDataMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`SetbackError`].
pub type Result<T> = std::result::Result<T, SetbackError>;
