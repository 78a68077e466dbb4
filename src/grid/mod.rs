//! Two-level focus navigation: tiles inside a grid, grids inside a collection.

mod collection;
mod events;
mod image_grid;
mod layout;

#[cfg(test)]
mod tests;

pub use collection::GridCollection;
pub use events::{FocusChanged, FocusObserver, FocusObservers};
pub use image_grid::ImageGrid;
pub use layout::GridLayout;
