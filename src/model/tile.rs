//! A single cell of a split image.

use image::RgbaImage;

use super::TilePos;

/// One tile of a grid. Owned exclusively by its [`ImageGrid`](crate::grid::ImageGrid).
#[derive(Debug, Clone)]
pub struct Tile {
    image: RgbaImage,
    origin: TilePos,
    highlighted: bool,
}

impl Tile {
    pub fn new(image: RgbaImage, origin: TilePos) -> Self {
        Self {
            image,
            origin,
            highlighted: false,
        }
    }

    /// The tile raster.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Coordinate of this tile in its grid.
    pub fn origin(&self) -> TilePos {
        self.origin
    }

    /// Whether this tile is the visible focus.
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub(crate) fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    /// Swap in a new raster of the same size, returning the old one.
    pub(crate) fn replace_image(&mut self, image: RgbaImage) -> RgbaImage {
        std::mem::replace(&mut self.image, image)
    }
}
