//! Error types for the count tracker.

use thiserror::Error;

/// Errors from recording, loading or writing animal counts.
#[derive(Error, Debug)]
pub enum CountError {
    /// More repeats than animals seen
    #[error("Cannot mark {repeats} of {count} animals as repeats")]
    InvalidCount { count: u32, repeats: u32 },

    /// Merging would exceed the largest representable count
    #[error("Too many {species} to add {count} more")]
    CountOverflow { species: String, count: u32 },

    /// Species has no entry for the image
    #[error("No {species} counted in {image:?}")]
    UnknownSpecies { image: String, species: String },

    /// Malformed count file
    #[error("Invalid count file: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error reading or writing count files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
