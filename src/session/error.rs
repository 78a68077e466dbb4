//! Error types for session operations.

use thiserror::Error;

use crate::counts::CountError;
use crate::imaging::ImagingError;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Imaging(#[from] ImagingError),

    #[error(transparent)]
    Count(#[from] CountError),

    /// The operation needs a focused image and none is open
    #[error("No image has focus")]
    NoFocus,
}
