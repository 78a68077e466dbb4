//! Synthetic rasters for tests.
//!
//! Each generator is deterministic so tests can compare pixels exactly after
//! splitting, recomposing or flattening.

use image::{Rgba, RgbaImage};

/// Image where every pixel encodes its own coordinates.
///
/// Red carries `x`, green carries `y` (both modulo 256) and blue mixes the two,
/// so a misplaced tile or a one-pixel seam shows up as a pixel mismatch.
pub fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x % 256) as u8,
            (y % 256) as u8,
            ((x * 7 + y * 13) % 256) as u8,
            255,
        ])
    })
}

/// Image filled with one color.
pub fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(color))
}

/// Two-color checkerboard with square cells of `cell` pixels.
pub fn checkerboard(width: u32, height: u32, cell: u32) -> RgbaImage {
    let cell = cell.max(1);
    RgbaImage::from_fn(width, height, |x, y| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            Rgba([20, 20, 20, 255])
        } else {
            Rgba([235, 235, 235, 255])
        }
    })
}
