//! Deterministic partition of an image into a rows×cols grid of tiles, and the
//! inverse composition.
//!
//! Tile boundaries are whole pixels. Every tile but the last in its row (or
//! column) is `length / segments` pixels wide (tall); the last one absorbs the
//! remainder, so the tiles cover the source exactly with no gap or overlap.

use std::borrow::Borrow;

use image::RgbaImage;
use image::imageops;

use super::ImagingError;

/// Tiles in row-major order: `grid[row][col]`.
pub type TileGrid = Vec<Vec<RgbaImage>>;

/// Start offset and size of segment `index` when `length` pixels are divided
/// into `segments` parts.
pub fn tile_bounds(length: u32, segments: usize, index: usize) -> (u32, u32) {
    let segments = segments.max(1) as u32;
    let index = index as u32;
    let segment = length / segments;
    let start = index * segment;
    let end = if index + 1 >= segments {
        length
    } else {
        start + segment
    };
    (start, end - start)
}

/// Split `image` into `rows` × `cols` tiles.
///
/// A 1×1 layout returns the image itself as the only tile. Fails with
/// [`ImagingError::InvalidGridSize`] when either count is zero, or larger than
/// the pixel extent it divides (which would produce empty tiles).
pub fn split(image: &RgbaImage, rows: usize, cols: usize) -> Result<TileGrid, ImagingError> {
    if rows == 0 || cols == 0 {
        return Err(ImagingError::InvalidGridSize { rows, cols });
    }

    if rows == 1 && cols == 1 {
        return Ok(vec![vec![image.clone()]]);
    }

    let (width, height) = image.dimensions();
    if rows as u64 > u64::from(height) || cols as u64 > u64::from(width) {
        return Err(ImagingError::InvalidGridSize { rows, cols });
    }

    let grid: TileGrid = (0..rows)
        .map(|row| {
            let (y, tile_height) = tile_bounds(height, rows, row);
            (0..cols)
                .map(|col| {
                    let (x, tile_width) = tile_bounds(width, cols, col);
                    imageops::crop_imm(image, x, y, tile_width, tile_height).to_image()
                })
                .collect()
        })
        .collect();

    log::trace!(
        "Split {}x{} image into {}x{} tiles",
        width,
        height,
        rows,
        cols
    );

    Ok(grid)
}

/// Compose a tile grid back into one image.
///
/// Each row is concatenated horizontally, then the rows vertically. All tiles in
/// a row must share a height and all rows must add up to the same width,
/// otherwise [`ImagingError::DimensionMismatch`] is returned. Accepts owned tiles
/// or references so a grid can compose without copying its tiles first.
pub fn recompose<T: Borrow<RgbaImage>>(tiles: &[Vec<T>]) -> Result<RgbaImage, ImagingError> {
    if tiles.is_empty() || tiles.iter().any(|row| row.is_empty()) {
        return Err(ImagingError::dimension_mismatch("tile grid has an empty row"));
    }

    if let [row] = tiles {
        if let [only] = row.as_slice() {
            return Ok(Borrow::<RgbaImage>::borrow(only).clone());
        }
    }

    let mut total_width = None;
    let mut total_height = 0u32;

    for (r, row) in tiles.iter().enumerate() {
        let row_height = Borrow::<RgbaImage>::borrow(&row[0]).height();
        let mut row_width = 0u32;
        for (c, tile) in row.iter().map(Borrow::<RgbaImage>::borrow).enumerate() {
            if tile.height() != row_height {
                return Err(ImagingError::dimension_mismatch(format!(
                    "tile ({}, {}) is {} px tall, row {} is {} px",
                    r,
                    c,
                    tile.height(),
                    r,
                    row_height
                )));
            }
            row_width += tile.width();
        }

        match total_width {
            None => total_width = Some(row_width),
            Some(width) if width != row_width => {
                return Err(ImagingError::dimension_mismatch(format!(
                    "row {} is {} px wide, expected {} px",
                    r, row_width, width
                )));
            }
            Some(_) => {}
        }
        total_height += row_height;
    }

    let total_width = total_width.unwrap_or(0);
    let mut merged = RgbaImage::new(total_width, total_height);

    let mut y = 0i64;
    for row in tiles {
        let mut x = 0i64;
        for tile in row.iter().map(Borrow::<RgbaImage>::borrow) {
            imageops::replace(&mut merged, tile, x, y);
            x += i64::from(tile.width());
        }
        y += i64::from(Borrow::<RgbaImage>::borrow(&row[0]).height());
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_image;

    #[test]
    fn test_tile_bounds_last_segment_absorbs_remainder() {
        assert_eq!(tile_bounds(10, 3, 0), (0, 3));
        assert_eq!(tile_bounds(10, 3, 1), (3, 3));
        assert_eq!(tile_bounds(10, 3, 2), (6, 4));
        assert_eq!(tile_bounds(800, 2, 1), (400, 400));
    }

    #[test]
    fn test_split_tiles_cover_source_exactly() {
        let cases = [(800, 600, 2, 2), (801, 601, 3, 3), (7, 5, 1, 4), (9, 13, 5, 1), (64, 64, 20, 20)];

        for (width, height, rows, cols) in cases {
            let img = test_image::gradient(width, height);
            let grid = split(&img, rows, cols).unwrap();

            assert_eq!(grid.len(), rows);
            for row in &grid {
                assert_eq!(row.len(), cols);
                let row_width: u32 = row.iter().map(|t| t.width()).sum();
                assert_eq!(row_width, width, "{}x{} split {}x{}", width, height, rows, cols);
            }
            for col in 0..cols {
                let col_height: u32 = grid.iter().map(|row| row[col].height()).sum();
                assert_eq!(col_height, height);
            }

            let merged = recompose(&grid).unwrap();
            assert_eq!(merged, img, "{}x{} split {}x{}", width, height, rows, cols);
        }
    }

    #[test]
    fn test_split_tile_contents_come_from_the_right_place() {
        let img = test_image::gradient(10, 10);
        let grid = split(&img, 2, 3).unwrap();

        // Tile (1, 2) starts at x = 6, y = 5
        assert_eq!(grid[1][2].get_pixel(0, 0), img.get_pixel(6, 5));
        assert_eq!(grid[1][2].dimensions(), (4, 5));
    }

    #[test]
    fn test_split_single_cell_is_passthrough() {
        let img = test_image::gradient(31, 17);
        let grid = split(&img, 1, 1).unwrap();
        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0][0], img);
    }

    #[test]
    fn test_split_rejects_zero_rows_or_cols() {
        let img = test_image::gradient(10, 10);
        assert!(matches!(
            split(&img, 0, 2),
            Err(ImagingError::InvalidGridSize { rows: 0, cols: 2 })
        ));
        assert!(matches!(
            split(&img, 2, 0),
            Err(ImagingError::InvalidGridSize { .. })
        ));
    }

    #[test]
    fn test_split_rejects_more_cells_than_pixels() {
        let img = test_image::gradient(3, 3);
        assert!(matches!(
            split(&img, 4, 1),
            Err(ImagingError::InvalidGridSize { .. })
        ));
    }

    #[test]
    fn test_recompose_rejects_ragged_row_heights() {
        let tiles = vec![vec![
            test_image::solid(4, 4, [0, 0, 0, 255]),
            test_image::solid(4, 5, [0, 0, 0, 255]),
        ]];
        assert!(matches!(
            recompose(&tiles),
            Err(ImagingError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_recompose_rejects_rows_of_different_width() {
        let tiles = vec![
            vec![test_image::solid(4, 4, [0, 0, 0, 255])],
            vec![test_image::solid(5, 4, [0, 0, 0, 255])],
        ];
        assert!(matches!(
            recompose(&tiles),
            Err(ImagingError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_recompose_rejects_empty_grid() {
        assert!(recompose::<RgbaImage>(&[]).is_err());
        assert!(recompose::<RgbaImage>(&[vec![]]).is_err());
    }
}
