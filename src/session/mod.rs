//! Wiring of grids, annotation canvas and count tracker.
//!
//! A [`Session`] is the headless counterpart of the counting window: it opens
//! batches of images, routes navigation through the grid collection, keeps the
//! canvas showing the focused tile and the tracker keyed to the focused image.
//!
//! Every focus change follows the same sequence. Pending annotations are
//! flattened into the tile being left (unless the policy discards them), then
//! the move runs. Once focus has moved the tracker is told the new image name,
//! the canvas gets the new tile, and its pending list is emptied.

mod error;


use std::path::{Path, PathBuf};

use image::RgbaImage;

pub use error::SessionError;

use crate::canvas::AnnotationCanvas;
use crate::config::{AppConfig, FlattenPolicy};
use crate::constants::COUNTS_FILE_NAME;
use crate::counts::{CountTracker, GameCountData};
use crate::grid::{FocusChanged, FocusObserver, GridCollection, GridLayout};
use crate::imaging::{ImageCodec, ImagingError, is_image_path};
use crate::ink;
use crate::model::{Direction, DrawMode, GridDirection, Oval, Pen, TilePos};

/// Outcome of opening a batch of files.
#[derive(Debug, Default)]
pub struct OpenReport {
    /// Images that became grids, in batch order
    pub opened: Vec<PathBuf>,
    /// Originals skipped in favor of their inked version
    pub superseded: Vec<PathBuf>,
    /// Files that could not be opened
    pub failed: Vec<(PathBuf, SessionError)>,
}

/// Opened images plus the tools working on the focused one.
pub struct Session<C: ImageCodec> {
    codec: C,
    config: AppConfig,
    grids: GridCollection,
    canvas: AnnotationCanvas,
    tracker: CountTracker,
    draw_mode: DrawMode,
}

impl<C: ImageCodec> Session<C> {
    pub fn new(codec: C, config: AppConfig) -> Self {
        let canvas = AnnotationCanvas::new(config.annotation);
        Self {
            codec,
            config,
            grids: GridCollection::new(),
            canvas,
            tracker: CountTracker::new(),
            draw_mode: DrawMode::default(),
        }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn grids(&self) -> &GridCollection {
        &self.grids
    }

    pub fn canvas(&self) -> &AnnotationCanvas {
        &self.canvas
    }

    pub fn tracker(&self) -> &CountTracker {
        &self.tracker
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    /// Grid index and tile that currently have focus.
    pub fn focus(&self) -> Option<(usize, TilePos)> {
        let index = self.grids.focused_index()?;
        let grid = self.grids.grid(index)?;
        Some((index, grid.focus()))
    }

    /// Register an observer for focus changes. Observers run inside the focus
    /// move, before the session updates its canvas and tracker.
    pub fn subscribe(&mut self, observer: impl FocusObserver + 'static) {
        self.grids.subscribe(observer);
    }

    /// Layout for images opened or reloaded from now on.
    pub fn set_layout(&mut self, layout: GridLayout) {
        log::debug!("Grid layout set to {}x{}", layout.rows(), layout.cols());
        self.config.grid = layout;
    }

    pub fn set_flatten_policy(&mut self, policy: FlattenPolicy) {
        self.config.preferences.flatten_policy = policy;
    }

    pub fn set_pen(&mut self, pen: Pen) {
        self.config.annotation = pen;
        self.canvas.set_pen(pen);
    }

    /// Open a batch of files.
    ///
    /// The first `.json` path is loaded as the count file. Image paths go
    /// through the ink policy and are appended as grids with the current
    /// layout; failures are reported and skipped. If anything opened, focus
    /// moves to the first new grid.
    pub fn open_files(&mut self, paths: &[PathBuf]) -> OpenReport {
        let mut report = OpenReport::default();

        let (count_files, rest): (Vec<PathBuf>, Vec<PathBuf>) =
            paths.iter().cloned().partition(|path| is_json_path(path));

        if let Some(path) = count_files.first() {
            if let Err(err) = self.tracker.load(path) {
                log::warn!("Could not load counts from {:?}: {}", path, err);
                report.failed.push((path.clone(), err.into()));
            }
        }

        let (images, unsupported): (Vec<PathBuf>, Vec<PathBuf>) =
            rest.into_iter().partition(|path| is_image_path(path));
        for path in unsupported {
            log::warn!("Skipping {:?}: not an image", path);
            let err = ImagingError::UnsupportedFormat { path: path.clone() };
            report.failed.push((path, err.into()));
        }

        let plan = ink::plan_open(&images);
        report.superseded = plan.superseded;

        let mut first_new = None;
        for request in plan.requests {
            let index = self.grids.len();
            match self.grids.open(
                &self.codec,
                index,
                request.image_path.clone(),
                request.base_path,
                self.config.grid,
            ) {
                Ok(index) => {
                    first_new.get_or_insert(index);
                    report.opened.push(request.image_path);
                }
                Err(err) => {
                    log::warn!("Skipping {:?}: {}", request.image_path, err);
                    report.failed.push((request.image_path, err.into()));
                }
            }
        }

        if let Some(first) = report.opened.first() {
            log::info!("Opened {} of {} images", report.opened.len(), images.len());

            if self.tracker.counts_path().is_none() && self.config.preferences.auto_counts_file {
                let dir = first.parent().unwrap_or_else(|| Path::new(""));
                self.tracker.set_counts_path(dir.join(COUNTS_FILE_NAME));
            }
        }

        if let Some(index) = first_new {
            if let Err(err) = self.switch(|grids| grids.focus_grid(index).ok()) {
                log::error!("Could not keep annotations on the previous tile: {}", err);
            }
        }

        report
    }

    pub fn move_focus(&mut self, direction: Direction) -> Result<Option<FocusChanged>, SessionError> {
        self.switch(|grids| grids.move_item_focus(direction))
    }

    pub fn move_focus_next(&mut self) -> Result<Option<FocusChanged>, SessionError> {
        self.switch(GridCollection::move_focus_next)
    }

    pub fn move_focus_previous(&mut self) -> Result<Option<FocusChanged>, SessionError> {
        self.switch(GridCollection::move_focus_previous)
    }

    pub fn move_grid_focus(
        &mut self,
        direction: GridDirection,
    ) -> Result<Option<FocusChanged>, SessionError> {
        self.switch(|grids| grids.move_grid_focus(direction).ok())
    }

    /// Focus a tile directly. Clicking the focused tile changes nothing.
    pub fn click(&mut self, index: usize, pos: TilePos) -> Result<Option<FocusChanged>, SessionError> {
        if self.focus() == Some((index, pos)) {
            return Ok(None);
        }
        self.switch(|grids| grids.set_focus(index, pos).ok())
    }

    pub fn focus_grid(&mut self, index: usize) -> Result<Option<FocusChanged>, SessionError> {
        self.click(index, TilePos::ORIGIN)
    }

    pub fn focus_first(&mut self) -> Result<Option<FocusChanged>, SessionError> {
        self.focus_grid(0)
    }

    pub fn focus_last(&mut self) -> Result<Option<FocusChanged>, SessionError> {
        match self.grids.len().checked_sub(1) {
            Some(last) => self.focus_grid(last),
            None => Ok(None),
        }
    }

    /// Close the focused image. Pending annotations on it are dropped.
    pub fn remove_focused(&mut self) -> Option<FocusChanged> {
        self.canvas.clear_pending();
        let event = self.grids.remove_focused();

        match &event {
            Some(event) => self.show(event),
            None if self.grids.is_empty() => {
                self.canvas.take_image();
            }
            None => {}
        }
        event
    }

    /// Re-read the focused image from disk with the current layout.
    ///
    /// Unsaved tile edits and pending annotations are dropped.
    pub fn reload_focused(&mut self) -> Result<Option<FocusChanged>, SessionError> {
        let event = self.grids.reload_focused(&self.codec, self.config.grid)?;
        if let Some(event) = &event {
            self.canvas.clear_pending();
            self.show(event);
        }
        Ok(event)
    }

    /// Flatten the canvas into the focused tile, write the inked image and,
    /// when a count file is set, the counts.
    ///
    /// Returns the path of the written image.
    pub fn save(&mut self) -> Result<PathBuf, SessionError> {
        if self.grids.focused_index().is_none() {
            return Err(SessionError::NoFocus);
        }

        if let Some(flattened) = self.canvas.flattened() {
            self.grids.replace_focused_tile(flattened.clone())?;
            self.canvas.set_image(flattened);
            self.canvas.clear_pending();
        }

        let grid = self.grids.focused_grid().ok_or(SessionError::NoFocus)?;
        let path = grid.recompose_and_save(&self.codec)?;

        if self.tracker.counts_path().is_some() {
            self.tracker.dump()?;
        }

        Ok(path)
    }

    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        if mode != self.draw_mode {
            log::debug!("Draw mode: {}", mode.name());
        }
        self.draw_mode = mode;
    }

    /// Pointer pressed at `point` in tile coordinates.
    pub fn press(&mut self, point: (f32, f32)) -> bool {
        self.canvas.begin_annotation(self.draw_mode, point)
    }

    pub fn drag(&mut self, point: (f32, f32)) -> bool {
        self.canvas.update_annotation(point)
    }

    pub fn release(&mut self) -> Option<Oval> {
        self.canvas.commit_annotation()
    }

    pub fn undo(&mut self) -> Option<Oval> {
        self.canvas.undo()
    }

    /// Count animals in the focused image.
    pub fn add_count(&mut self, species: &str, count: u32, repeats: u32) -> Result<bool, SessionError> {
        self.require_focus()?;
        Ok(self.tracker.add(species, count, repeats)?)
    }

    pub fn remove_species(&mut self, species: &str) -> Result<GameCountData, SessionError> {
        self.require_focus()?;
        Ok(self.tracker.remove_species(species)?)
    }

    pub fn clear_counts(&mut self) {
        self.tracker.clear();
    }

    pub fn load_counts(&mut self, path: &Path) -> Result<(), SessionError> {
        Ok(self.tracker.load(path)?)
    }

    pub fn dump_counts(&mut self) -> Result<PathBuf, SessionError> {
        Ok(self.tracker.dump()?)
    }

    fn require_focus(&self) -> Result<(), SessionError> {
        match self.grids.focused_index() {
            Some(_) => Ok(()),
            None => Err(SessionError::NoFocus),
        }
    }

    /// Run a focus move, settling pending annotations first.
    ///
    /// The flatten policy is applied to the focused tile before `op` runs. If
    /// flattening fails nothing moves; if `op` leaves focus where it was, the
    /// tile gets its previous raster back and the annotations stay pending.
    fn switch(
        &mut self,
        op: impl FnOnce(&mut GridCollection) -> Option<FocusChanged>,
    ) -> Result<Option<FocusChanged>, SessionError> {
        let replaced = self.settle_pending()?;
        let event = op(&mut self.grids);

        match &event {
            Some(event) => self.show(event),
            None => {
                if let Some((index, pos, original)) = replaced {
                    if let Some(grid) = self.grids.grid_mut(index) {
                        grid.replace_tile_image(pos, original)?;
                    }
                }
            }
        }
        Ok(event)
    }

    /// Flatten pending annotations into the focused tile when the policy asks
    /// for it. Returns the raster that was replaced.
    fn settle_pending(&mut self) -> Result<Option<(usize, TilePos, RgbaImage)>, SessionError> {
        if !self.canvas.has_pending()
            || self.config.preferences.flatten_policy != FlattenPolicy::FlattenBeforeSwitch
        {
            return Ok(None);
        }

        let Some((index, pos)) = self.focus() else {
            return Ok(None);
        };
        let (Some(flattened), Some(grid)) = (self.canvas.flattened(), self.grids.grid_mut(index))
        else {
            return Ok(None);
        };

        let original = grid.replace_tile_image(pos, flattened)?;
        log::debug!("Kept annotations on grid {} tile {}", index, pos);
        Ok(Some((index, pos, original)))
    }

    fn show(&mut self, event: &FocusChanged) {
        self.tracker.on_focus_changed(&event.image_key);
        self.canvas.set_image(event.image.clone());
        self.canvas.clear_pending();
    }
}

fn is_json_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
