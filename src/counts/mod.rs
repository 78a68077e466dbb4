//! Per-image animal counts, keyed by the focused image's file name.

mod data;
mod error;
mod tracker;

pub use data::{CountLedger, GameCountData, ImageCounts};
pub use error::CountError;
pub use tracker::CountTracker;
