//! Row/column configuration for newly built grids.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_GRID_COLS, DEFAULT_GRID_ROWS, MAX_GRID_DIMENSION};
use crate::imaging::ImagingError;

/// How many tiles an image is split into.
///
/// A layout is fixed for the lifetime of a grid. Changing the session layout
/// only affects grids opened or reloaded afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGridLayout")]
pub struct GridLayout {
    rows: usize,
    cols: usize,
}

#[derive(Deserialize)]
struct RawGridLayout {
    rows: usize,
    cols: usize,
}

impl TryFrom<RawGridLayout> for GridLayout {
    type Error = ImagingError;

    fn try_from(raw: RawGridLayout) -> Result<Self, Self::Error> {
        Self::new(raw.rows, raw.cols)
    }
}

impl GridLayout {
    /// A single unsplit tile.
    pub const SINGLE: GridLayout = GridLayout { rows: 1, cols: 1 };

    /// Validate and create a layout. Both counts must be in `1..=MAX_GRID_DIMENSION`.
    pub fn new(rows: usize, cols: usize) -> Result<Self, ImagingError> {
        let valid = 1..=MAX_GRID_DIMENSION;
        if !valid.contains(&rows) || !valid.contains(&cols) {
            return Err(ImagingError::InvalidGridSize { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of tiles.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Whether images are kept whole instead of being split.
    pub fn is_single(&self) -> bool {
        self.rows == 1 && self.cols == 1
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            rows: DEFAULT_GRID_ROWS,
            cols: DEFAULT_GRID_COLS,
        }
    }
}
