//! Data models shared by the grid and canvas layers.

mod annotation;
mod focus;
mod tile;

pub use annotation::{DrawMode, DrawingState, Oval, Pen};
pub use focus::{BoundaryExceeded, Direction, GridDirection, TilePos};
pub use tile::Tile;
