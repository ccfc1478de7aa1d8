pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;

pub use error::{Result, SetbackError};
pub use geometry::{Edge, EdgeData, FloorPlate, Polygon};
pub use operations::area_search::{AreaSearchOptions, AreaSearchOutcome, AreaTargetSearch, SearchStatus};
pub use operations::inset::{DroppedEdge, InsetEvent, InsetOptions, InsetResult, PerEdgeInset};
pub use operations::obb::{LineSplit, OrientedBoundingBox2D, Uv};
