pub mod edge;
pub mod floor_plate;
pub mod polygon;

pub use edge::Edge;
pub use floor_plate::{EdgeData, FloorPlate};
pub use polygon::Polygon;
