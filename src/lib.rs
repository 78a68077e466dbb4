//! Transect - tiled review and annotation of aerial survey images
//!
//! Images are split into grids of tiles that are visited one at a time, in
//! serpentine order or by direction, across every opened image. The focused
//! tile can be annotated with ovals that are flattened into the raster, the
//! annotated image is written back as `<stem>_Inked<suffix>`, and animals
//! counted in each image are tracked per file name.

pub mod canvas;
pub mod config;
pub mod constants;
pub mod counts;
pub mod grid;
pub mod imaging;
pub mod ink;
pub mod model;
pub mod session;

#[cfg(test)]
mod test_image;

pub use canvas::AnnotationCanvas;
pub use config::{AppConfig, ConfigError, FlattenPolicy, LogLevel, init_logging};
pub use counts::{CountError, CountTracker};
pub use grid::{FocusChanged, GridCollection, GridLayout, ImageGrid};
pub use imaging::{FileCodec, ImageCodec, ImagingError, MemoryCodec};
pub use model::{BoundaryExceeded, Direction, DrawMode, GridDirection, Pen, TilePos};
pub use session::{OpenReport, Session, SessionError};
