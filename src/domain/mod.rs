//! Domain types: regions, bounding boxes, and block groups.

pub mod blocks;
pub mod region;

pub use blocks::BlockGroups;
pub use region::{BoundingBox, Region, RegionType};
