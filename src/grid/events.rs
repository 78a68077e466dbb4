//! Focus-change notification.

use std::fmt;
use std::path::PathBuf;

use image::RgbaImage;

use crate::model::TilePos;

/// Raised after every operation that moves focus to a (possibly different) tile.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusChanged {
    /// Index of the focused grid in the collection
    pub grid_index: usize,
    /// Focused tile inside that grid
    pub position: TilePos,
    /// File name of the grid's base path (count-tracker key)
    pub image_key: String,
    /// Base path of the focused grid
    pub base_path: PathBuf,
    /// Raster of the newly focused tile
    pub image: RgbaImage,
}

/// Receives focus changes synchronously, before the triggering call returns.
pub trait FocusObserver {
    fn on_focus_changed(&mut self, event: &FocusChanged);
}

impl<F> FocusObserver for F
where
    F: FnMut(&FocusChanged),
{
    fn on_focus_changed(&mut self, event: &FocusChanged) {
        self(event)
    }
}

/// Registered observers, notified in registration order.
#[derive(Default)]
pub struct FocusObservers {
    observers: Vec<Box<dyn FocusObserver>>,
}

impl FocusObservers {
    pub fn subscribe(&mut self, observer: impl FocusObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn notify(&mut self, event: &FocusChanged) {
        for observer in &mut self.observers {
            observer.on_focus_changed(event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for FocusObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusObservers")
            .field("count", &self.observers.len())
            .finish()
    }
}
