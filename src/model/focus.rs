//! Focus coordinates, movement directions and the boundary status.

use std::fmt;

use thiserror::Error;

/// A tile coordinate inside one grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct TilePos {
    pub row: usize,
    pub col: usize,
}

impl TilePos {
    pub const ORIGIN: TilePos = TilePos { row: 0, col: 0 };

    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Cardinal movement between tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Row and column offset of one step in this direction.
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// The matching grid-level move, if this direction can cross grids.
    ///
    /// Grids are stacked vertically, so only `Up` and `Down` have one.
    pub fn grid_direction(&self) -> Option<GridDirection> {
        match self {
            Direction::Up => Some(GridDirection::Up),
            Direction::Down => Some(GridDirection::Down),
            Direction::Left | Direction::Right => None,
        }
    }
}

/// Movement between grids in a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridDirection {
    /// Toward index 0
    Up,
    /// Toward the last grid
    Down,
}

/// A focus move that would leave the current bounds.
///
/// This is a routine status rather than a failure: the grid collection uses it
/// to decide when to cross into a neighboring grid.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryExceeded {
    /// No tile at the attempted coordinate
    #[error("No tile at ({attempted_row}, {attempted_col}), focus stays at {current}")]
    Tile {
        current: TilePos,
        attempted_row: isize,
        attempted_col: isize,
    },

    /// No grid at the attempted index
    #[error("Grid {attempted} does not exist, focus stays on grid {current}")]
    Grid { current: usize, attempted: isize },

    /// The collection is empty, so nothing has focus
    #[error("No grid has focus")]
    NoFocus,
}

impl BoundaryExceeded {
    pub(crate) fn tile(current: TilePos, attempted_row: isize, attempted_col: isize) -> Self {
        Self::Tile {
            current,
            attempted_row,
            attempted_col,
        }
    }
}
