pub mod area_search;
pub mod creation;
pub mod inset;
pub mod obb;
