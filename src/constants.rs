//! Global constants for the transect core

/// Default number of tile rows for newly opened images
pub const DEFAULT_GRID_ROWS: usize = 2;

/// Default number of tile columns for newly opened images
pub const DEFAULT_GRID_COLS: usize = 2;

/// Largest row or column count accepted for a grid layout
pub const MAX_GRID_DIMENSION: usize = 20;

/// Suffix appended to a file stem for annotated ("inked") output
pub const INK_SUFFIX: &str = "_Inked";

/// Default annotation pen color (RGBA)
pub const DEFAULT_PEN_COLOR: [u8; 4] = [50, 150, 230, 255];

/// Default annotation pen width in image pixels
pub const DEFAULT_PEN_WIDTH: f32 = 50.0;

/// File name of the JSON count dump
pub const COUNTS_FILE_NAME: &str = "counts.json";

/// File name of the plain-text count summary written beside the JSON dump
pub const SUMMARY_FILE_NAME: &str = "count summary.txt";

/// Separator between totals and the per-image listing in the summary
pub const SUMMARY_SEPARATOR: &str = "-------------------------";

/// Image extensions the batch opener accepts
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tiff", "tif", "webp"];
