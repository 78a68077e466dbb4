//! Error types for raster operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while decoding, splitting, composing or encoding images.
#[derive(Error, Debug)]
pub enum ImagingError {
    /// Grid dimensions outside the accepted range
    #[error("Invalid grid size: {rows}x{cols}")]
    InvalidGridSize {
        /// Requested row count
        rows: usize,
        /// Requested column count
        cols: usize,
    },

    /// Tiles (or a replacement raster) do not fit together
    #[error("Dimension mismatch: {message}")]
    DimensionMismatch {
        /// Description of the mismatch
        message: String,
    },

    /// The decoder produced no image for a path
    #[error("Failed to decode {path:?}: {source}")]
    Decode {
        /// Path that failed to decode
        path: PathBuf,
        /// Underlying decoder error
        #[source]
        source: image::ImageError,
    },

    /// The encoder could not write an image
    #[error("Failed to encode {path:?}: {source}")]
    Encode {
        /// Output path
        path: PathBuf,
        /// Underlying encoder error
        #[source]
        source: image::ImageError,
    },

    /// No image exists for a path (in-memory stores)
    #[error("Image not found: {path:?}")]
    NotFound {
        /// Missing path
        path: PathBuf,
    },

    /// The path suffix does not name a supported image format
    #[error("Unsupported image format: {path:?}")]
    UnsupportedFormat {
        /// Offending path
        path: PathBuf,
    },

    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImagingError {
    /// Create a dimension mismatch error with a message.
    pub fn dimension_mismatch(message: impl Into<String>) -> Self {
        Self::DimensionMismatch {
            message: message.into(),
        }
    }

    /// Whether this error means the source image could not be read at all.
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. } | Self::NotFound { .. } | Self::UnsupportedFormat { .. }
        )
    }
}
