//! Grid indexing, line rasterization and perceptual-field construction.
//!
//! The grid is a pure coordinate system between continuous world coordinates
//! and integer cell indices; per-tick occupancy evidence is produced as cell
//! sets, never stored here.

pub mod grid;
pub mod perception;
pub mod point_types;
pub mod raster;

pub use grid::{Grid, neighbors8};
pub use perception::{PerceptualField, perceptual_field};
pub use point_types::{GridPoint, WorldPoint};
pub use raster::cells_on_line;
