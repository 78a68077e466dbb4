//! Raster primitives: decode/encode behind a codec seam, and grid splitting.
//!
//! The rest of the crate treats images as opaque `RgbaImage` rasters. Anything
//! that touches the filesystem goes through [`ImageCodec`] so navigation and
//! annotation logic can run against an in-memory store.

mod codec;
mod error;
mod splitter;

pub use codec::{FileCodec, ImageCodec, MemoryCodec, is_image_path};
pub use error::ImagingError;
pub use splitter::{TileGrid, recompose, split, tile_bounds};
