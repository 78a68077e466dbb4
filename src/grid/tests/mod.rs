//! Multi-grid navigation tests.
//!
//! These cover focus crossing between grids, the serpentine walk over a whole
//! collection, and the collection's insert/remove/reload bookkeeping.

mod collection_tests;

use std::path::PathBuf;

use super::{GridCollection, GridLayout, ImageGrid};
use crate::imaging::MemoryCodec;
use crate::model::TilePos;
use crate::test_image;

pub(super) fn layout(rows: usize, cols: usize) -> GridLayout {
    GridLayout::new(rows, cols).unwrap()
}

/// A grid over a gradient raster, not yet part of any collection.
pub(super) fn grid(name: &str, rows: usize, cols: usize) -> ImageGrid {
    ImageGrid::from_image(
        test_image::gradient(40, 30),
        PathBuf::from("/survey").join(name),
        None,
        layout(rows, cols),
    )
    .unwrap()
}

/// A collection of grids with the given layouts, named g0.png, g1.png, ...
pub(super) fn collection(layouts: &[(usize, usize)]) -> GridCollection {
    let mut grids = GridCollection::new();
    for (i, &(rows, cols)) in layouts.iter().enumerate() {
        grids.push(grid(&format!("g{}.png", i), rows, cols));
    }
    grids
}

/// Current (grid index, tile) focus.
pub(super) fn focus(grids: &GridCollection) -> (usize, TilePos) {
    let index = grids.focused_index().unwrap();
    (index, grids.grid(index).unwrap().focus())
}

/// Every highlighted tile across the collection.
pub(super) fn highlighted(grids: &GridCollection) -> Vec<(usize, TilePos)> {
    grids
        .grids()
        .iter()
        .enumerate()
        .flat_map(|(i, g)| {
            g.tiles()
                .iter()
                .filter(|t| t.is_highlighted())
                .map(move |t| (i, t.origin()))
        })
        .collect()
}

pub(super) fn codec_with(paths: &[(&str, u32, u32)]) -> MemoryCodec {
    let codec = MemoryCodec::new();
    for &(path, width, height) in paths {
        codec.insert(path, test_image::gradient(width, height));
    }
    codec
}
