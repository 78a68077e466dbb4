//! Ordered list of grids with exactly one focused grid.
//!
//! Focus is two-level: the collection remembers which grid is focused and every
//! grid remembers its own focused tile. Only the focused tile of the focused grid
//! is highlighted. Moving past the edge of a grid crosses into its neighbor:
//! vertical moves keep the column, serpentine moves enter at the first or last
//! cell of the serpentine walk. Horizontal moves never cross.

use std::path::PathBuf;

use image::RgbaImage;

use super::{FocusChanged, FocusObserver, FocusObservers, GridLayout, ImageGrid};
use crate::imaging::{ImageCodec, ImagingError};
use crate::model::{BoundaryExceeded, Direction, GridDirection, Tile, TilePos};

/// The opened images of a session, top to bottom.
///
/// The focused index is `None` exactly when the collection is empty. Every
/// operation that moves focus notifies the subscribed observers before it
/// returns, and also hands the same [`FocusChanged`] back to the caller.
#[derive(Debug, Default)]
pub struct GridCollection {
    grids: Vec<ImageGrid>,
    focused: Option<usize>,
    observers: FocusObservers,
}

impl GridCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for focus changes.
    pub fn subscribe(&mut self, observer: impl FocusObserver + 'static) {
        self.observers.subscribe(observer);
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    pub fn grids(&self) -> &[ImageGrid] {
        &self.grids
    }

    pub fn grid(&self, index: usize) -> Option<&ImageGrid> {
        self.grids.get(index)
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    pub fn focused_grid(&self) -> Option<&ImageGrid> {
        self.focused.map(|index| &self.grids[index])
    }

    pub fn focused_tile(&self) -> Option<&Tile> {
        self.focused_grid().map(ImageGrid::focused_tile)
    }

    pub(crate) fn focused_grid_mut(&mut self) -> Option<&mut ImageGrid> {
        self.focused.map(|index| &mut self.grids[index])
    }

    pub(crate) fn grid_mut(&mut self, index: usize) -> Option<&mut ImageGrid> {
        self.grids.get_mut(index)
    }

    /// Insert a grid at `index`, appending when `index` is past the end.
    ///
    /// Focus stays on the grid it was on. The first grid inserted into an empty
    /// collection becomes focused (at its own (0, 0)) without raising an event.
    /// Returns the index the grid ended up at.
    pub fn insert(&mut self, index: usize, grid: ImageGrid) -> usize {
        let index = index.min(self.grids.len());
        log::debug!("Inserting grid {:?} at {}", grid.image_path(), index);
        self.grids.insert(index, grid);

        match self.focused {
            None => {
                self.focused = Some(index);
                self.grids[index].refocus();
            }
            Some(focused) if index <= focused => self.focused = Some(focused + 1),
            Some(_) => {}
        }

        index
    }

    /// Append a grid at the end.
    pub fn push(&mut self, grid: ImageGrid) -> usize {
        self.insert(self.grids.len(), grid)
    }

    /// Decode `image_path`, split it with `layout` and insert the grid at `index`.
    ///
    /// `base_path` overrides the path used when saving. Nothing is inserted if
    /// decoding or splitting fails.
    pub fn open(
        &mut self,
        codec: &dyn ImageCodec,
        index: usize,
        image_path: impl Into<PathBuf>,
        base_path: Option<PathBuf>,
        layout: GridLayout,
    ) -> Result<usize, ImagingError> {
        let grid = ImageGrid::open(codec, image_path, base_path, layout)?;
        Ok(self.insert(index, grid))
    }

    /// Insert a grid and move focus to it.
    pub fn insert_and_focus(&mut self, index: usize, grid: ImageGrid) -> Option<FocusChanged> {
        let index = self.insert(index, grid);
        self.focus_grid(index).ok()
    }

    /// Remove the grid at `index`.
    ///
    /// Removing the focused grid moves focus one grid toward index 0 (or to the
    /// new first grid) and raises an event. Removing the last grid leaves nothing
    /// focused. Out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<FocusChanged> {
        if index >= self.grids.len() {
            log::warn!("Cannot remove grid {}: only {} open", index, self.grids.len());
            return None;
        }

        let removed = self.grids.remove(index);
        log::debug!("Removed grid {:?}", removed.image_path());

        let focused = self.focused?;
        if self.grids.is_empty() {
            self.focused = None;
            return None;
        }

        if index < focused {
            self.focused = Some(focused - 1);
            None
        } else if index > focused {
            None
        } else {
            let next = focused.saturating_sub(1);
            self.focused = Some(next);
            self.grids[next].refocus();
            self.emit()
        }
    }

    pub fn remove_focused(&mut self) -> Option<FocusChanged> {
        let index = self.focused?;
        self.remove(index)
    }

    /// Move focus to the neighboring grid, keeping that grid's remembered tile.
    pub fn move_grid_focus(
        &mut self,
        direction: GridDirection,
    ) -> Result<FocusChanged, BoundaryExceeded> {
        let index = self.focused.ok_or(BoundaryExceeded::NoFocus)?;
        let target = self.neighbor(index, direction)?;

        self.grids[index].clear_highlight();
        self.focused = Some(target);
        self.grids[target].refocus();

        self.emit().ok_or(BoundaryExceeded::NoFocus)
    }

    /// Move focus one tile in `direction`.
    ///
    /// Up and Down cross into the neighboring grid at the same column, entering
    /// at its last or first row. Left and Right stay inside the focused grid.
    /// Returns `None` when focus did not move.
    pub fn move_item_focus(&mut self, direction: Direction) -> Option<FocusChanged> {
        let index = self.focused?;

        let current = match self.grids[index].move_focus(direction) {
            Ok(_) => return self.emit(),
            Err(BoundaryExceeded::Tile { current, .. }) => current,
            Err(_) => return None,
        };

        let grid_direction = direction.grid_direction()?;
        let target = self.neighbor(index, grid_direction).ok()?;
        let row = match grid_direction {
            GridDirection::Down => 0,
            GridDirection::Up => self.grids[target].rows() - 1,
        };

        // Grids opened under different layouts may be narrower
        let entry = self.grids[target].clamp(TilePos::new(row, current.col));
        self.cross_to(index, target, entry)
    }

    /// Advance focus in serpentine order, continuing at (0, 0) of the next grid.
    pub fn move_focus_next(&mut self) -> Option<FocusChanged> {
        let index = self.focused?;
        if self.grids[index].move_focus_next().is_ok() {
            return self.emit();
        }

        let target = self.neighbor(index, GridDirection::Down).ok()?;
        self.cross_to(index, target, TilePos::ORIGIN)
    }

    /// Step focus back in serpentine order, continuing at the last serpentine
    /// cell of the previous grid.
    pub fn move_focus_previous(&mut self) -> Option<FocusChanged> {
        let index = self.focused?;
        if self.grids[index].move_focus_previous().is_ok() {
            return self.emit();
        }

        let target = self.neighbor(index, GridDirection::Up).ok()?;
        let entry = self.grids[target].serpentine_last();
        self.cross_to(index, target, entry)
    }

    /// Focus a tile of any grid directly, e.g. after a click.
    pub fn set_focus(
        &mut self,
        index: usize,
        pos: TilePos,
    ) -> Result<FocusChanged, BoundaryExceeded> {
        let current = self.focused.ok_or(BoundaryExceeded::NoFocus)?;
        if index >= self.grids.len() {
            return Err(BoundaryExceeded::Grid {
                current,
                attempted: index as isize,
            });
        }

        self.grids[index].set_focus(pos)?;
        if index != current {
            self.grids[current].clear_highlight();
        }
        self.focused = Some(index);

        self.emit().ok_or(BoundaryExceeded::NoFocus)
    }

    /// Focus tile (0, 0) of the grid at `index`.
    pub fn focus_grid(&mut self, index: usize) -> Result<FocusChanged, BoundaryExceeded> {
        self.set_focus(index, TilePos::ORIGIN)
    }

    pub fn focus_first(&mut self) -> Option<FocusChanged> {
        if self.grids.is_empty() {
            return None;
        }
        self.focus_grid(0).ok()
    }

    pub fn focus_last(&mut self) -> Option<FocusChanged> {
        let last = self.grids.len().checked_sub(1)?;
        self.focus_grid(last).ok()
    }

    /// Re-open the grid at `index` from its base path with a new layout.
    ///
    /// The previous focus coordinate is kept, clamped into the new layout. The
    /// grid is replaced only once the new one is built, so a failure leaves the
    /// collection untouched. An event is raised if the reloaded grid is focused.
    pub fn reload(
        &mut self,
        codec: &dyn ImageCodec,
        index: usize,
        layout: GridLayout,
    ) -> Result<Option<FocusChanged>, ImagingError> {
        let Some(old) = self.grids.get(index) else {
            log::warn!("Cannot reload grid {}: only {} open", index, self.grids.len());
            return Ok(None);
        };

        let position = old.focus();
        let mut grid = ImageGrid::open(codec, old.base_path().to_path_buf(), None, layout)?;

        let position = grid.clamp(position);
        let is_focused = self.focused == Some(index);
        if grid.set_focus(position).is_ok() && !is_focused {
            grid.clear_highlight();
        }

        log::debug!(
            "Reloaded grid {:?} as {}x{}",
            grid.base_path(),
            layout.rows(),
            layout.cols()
        );
        self.grids[index] = grid;

        Ok(if is_focused { self.emit() } else { None })
    }

    /// Re-open the focused grid with a new layout.
    pub fn reload_focused(
        &mut self,
        codec: &dyn ImageCodec,
        layout: GridLayout,
    ) -> Result<Option<FocusChanged>, ImagingError> {
        match self.focused {
            Some(index) => self.reload(codec, index, layout),
            None => Ok(None),
        }
    }

    /// Swap the raster of the focused tile, returning the previous one.
    ///
    /// `Ok(None)` when nothing is focused. The replacement must match the
    /// tile's size.
    pub fn replace_focused_tile(
        &mut self,
        image: RgbaImage,
    ) -> Result<Option<RgbaImage>, ImagingError> {
        let Some(grid) = self.focused_grid_mut() else {
            return Ok(None);
        };
        let pos = grid.focus();
        grid.replace_tile_image(pos, image).map(Some)
    }

    fn neighbor(&self, index: usize, direction: GridDirection) -> Result<usize, BoundaryExceeded> {
        let target = match direction {
            GridDirection::Up => index as isize - 1,
            GridDirection::Down => index as isize + 1,
        };

        if target < 0 || target as usize >= self.grids.len() {
            return Err(BoundaryExceeded::Grid {
                current: index,
                attempted: target,
            });
        }
        Ok(target as usize)
    }

    fn cross_to(&mut self, from: usize, to: usize, entry: TilePos) -> Option<FocusChanged> {
        self.grids[to].set_focus(entry).ok()?;
        self.grids[from].clear_highlight();
        self.focused = Some(to);
        log::trace!("Focus crossed from grid {} to grid {}", from, to);
        self.emit()
    }

    fn emit(&mut self) -> Option<FocusChanged> {
        let index = self.focused?;
        let grid = &self.grids[index];
        let event = FocusChanged {
            grid_index: index,
            position: grid.focus(),
            image_key: grid.image_key(),
            base_path: grid.base_path().to_path_buf(),
            image: grid.focused_tile().image().clone(),
        };

        log::debug!(
            "Focus on grid {} ({}) tile {}",
            index,
            event.image_key,
            event.position
        );
        self.observers.notify(&event);
        Some(event)
    }
}
