//! One opened image laid out as a grid of tiles with a focused tile.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use super::GridLayout;
use crate::imaging::{self, ImageCodec, ImagingError};
use crate::ink;
use crate::model::{BoundaryExceeded, Direction, Tile, TilePos};

/// The tiled representation of one opened image.
///
/// Tiles are stored row-major and always fill the full `rows × cols` layout.
/// The focus coordinate always names an existing tile; it starts at (0, 0).
#[derive(Debug, Clone)]
pub struct ImageGrid {
    /// File the tiles were read from
    image_path: PathBuf,
    /// File whose stem names the saved output (differs for inked images)
    base_path: PathBuf,
    layout: GridLayout,
    tiles: Vec<Tile>,
    focus: TilePos,
}

impl ImageGrid {
    /// Decode `image_path` and split it with `layout`.
    ///
    /// `base_path` overrides the path used for saving; pass `None` to save next
    /// to the opened file.
    pub fn open(
        codec: &dyn ImageCodec,
        image_path: impl Into<PathBuf>,
        base_path: Option<PathBuf>,
        layout: GridLayout,
    ) -> Result<Self, ImagingError> {
        let image_path = image_path.into();
        let image = codec.decode(&image_path)?;
        Self::from_image(image, image_path, base_path, layout)
    }

    /// Build a grid from an already decoded raster.
    pub fn from_image(
        image: RgbaImage,
        image_path: impl Into<PathBuf>,
        base_path: Option<PathBuf>,
        layout: GridLayout,
    ) -> Result<Self, ImagingError> {
        let image_path = image_path.into();
        let base_path = base_path.unwrap_or_else(|| image_path.clone());
        let tiles = build_tiles(&image, layout)?;

        log::debug!(
            "Built {}x{} grid for {:?} (base {:?})",
            layout.rows(),
            layout.cols(),
            image_path,
            base_path
        );

        Ok(Self {
            image_path,
            base_path,
            layout,
            tiles,
            focus: TilePos::ORIGIN,
        })
    }

    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// File name of the base path, used as the count-tracker key.
    pub fn image_key(&self) -> String {
        self.base_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    pub fn rows(&self) -> usize {
        self.layout.rows()
    }

    pub fn cols(&self) -> usize {
        self.layout.cols()
    }

    /// Check if a coordinate names a tile in this grid.
    pub fn contains(&self, pos: TilePos) -> bool {
        pos.row < self.rows() && pos.col < self.cols()
    }

    /// The nearest coordinate inside this grid.
    pub fn clamp(&self, pos: TilePos) -> TilePos {
        TilePos::new(pos.row.min(self.rows() - 1), pos.col.min(self.cols() - 1))
    }

    pub fn tile(&self, pos: TilePos) -> Option<&Tile> {
        if self.contains(pos) {
            self.tiles.get(self.index_of(pos))
        } else {
            None
        }
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn focus(&self) -> TilePos {
        self.focus
    }

    pub fn focused_tile(&self) -> &Tile {
        &self.tiles[self.index_of(self.focus)]
    }

    /// Focus a tile directly, e.g. after a click.
    pub fn set_focus(&mut self, pos: TilePos) -> Result<&Tile, BoundaryExceeded> {
        self.focus_signed(pos.row as isize, pos.col as isize)
    }

    /// Move focus one tile in `direction`.
    ///
    /// Leaving the grid returns [`BoundaryExceeded`] and leaves focus unchanged.
    pub fn move_focus(&mut self, direction: Direction) -> Result<&Tile, BoundaryExceeded> {
        let (dr, dc) = direction.delta();
        let row = self.focus.row as isize + dr;
        let col = self.focus.col as isize + dc;
        self.focus_signed(row, col)
    }

    /// Advance focus in serpentine order.
    ///
    /// Even rows run left to right and odd rows right to left; at the end of a
    /// row focus drops to the next row in the same column.
    pub fn move_focus_next(&mut self) -> Result<&Tile, BoundaryExceeded> {
        let TilePos { row, col } = self.focus;
        let (row, col) = (row as isize, col as isize);
        let last_col = self.cols() as isize - 1;

        let target = if row % 2 == 0 {
            if col < last_col {
                (row, col + 1)
            } else {
                (row + 1, col)
            }
        } else if col > 0 {
            (row, col - 1)
        } else {
            (row + 1, col)
        };

        self.focus_signed(target.0, target.1)
    }

    /// Step focus back in serpentine order, the mirror of [`Self::move_focus_next`].
    pub fn move_focus_previous(&mut self) -> Result<&Tile, BoundaryExceeded> {
        let TilePos { row, col } = self.focus;
        let (row, col) = (row as isize, col as isize);
        let last_col = self.cols() as isize - 1;

        let target = if row % 2 == 0 {
            if col > 0 {
                (row, col - 1)
            } else {
                (row - 1, col)
            }
        } else if col < last_col {
            (row, col + 1)
        } else {
            (row - 1, col)
        };

        self.focus_signed(target.0, target.1)
    }

    /// The last cell visited by serpentine order.
    pub fn serpentine_last(&self) -> TilePos {
        let last_row = self.rows() - 1;
        let col = if last_row % 2 == 0 { self.cols() - 1 } else { 0 };
        TilePos::new(last_row, col)
    }

    /// Remove the highlight from the focused tile (focus moved to another grid).
    pub fn clear_highlight(&mut self) {
        let index = self.index_of(self.focus);
        self.tiles[index].set_highlighted(false);
    }

    /// Highlight the focused tile again without moving focus.
    pub fn refocus(&mut self) -> &Tile {
        let index = self.index_of(self.focus);
        self.tiles[index].set_highlighted(true);
        &self.tiles[index]
    }

    /// Discard all tiles and split again, from `replacement` when given or
    /// from the base path otherwise.
    ///
    /// The focus coordinate is kept but not re-highlighted; the caller decides
    /// whether this grid should show focus.
    pub fn rebuild(
        &mut self,
        codec: &dyn ImageCodec,
        replacement: Option<RgbaImage>,
    ) -> Result<(), ImagingError> {
        let image = match replacement {
            Some(image) => image,
            None => codec.decode(&self.base_path)?,
        };
        self.tiles = build_tiles(&image, self.layout)?;
        log::debug!("Rebuilt grid {:?}", self.base_path);
        Ok(())
    }

    /// Replace the raster of one tile, e.g. with a flattened annotation result.
    ///
    /// The new raster must have the tile's size; the old one is returned.
    pub fn replace_tile_image(
        &mut self,
        pos: TilePos,
        image: RgbaImage,
    ) -> Result<RgbaImage, ImagingError> {
        let Some(current) = self.tile(pos) else {
            return Err(ImagingError::dimension_mismatch(format!(
                "no tile at {} in a {}x{} grid",
                pos,
                self.rows(),
                self.cols()
            )));
        };

        if current.image().dimensions() != image.dimensions() {
            return Err(ImagingError::dimension_mismatch(format!(
                "tile {} is {:?}, replacement is {:?}",
                pos,
                current.image().dimensions(),
                image.dimensions()
            )));
        }

        let index = self.index_of(pos);
        Ok(self.tiles[index].replace_image(image))
    }

    /// Compose all tiles back into the full image.
    pub fn recompose(&self) -> Result<RgbaImage, ImagingError> {
        if self.layout.is_single() {
            return Ok(self.tiles[0].image().clone());
        }

        let rows: Vec<Vec<&RgbaImage>> = self
            .tiles
            .chunks(self.cols())
            .map(|row| row.iter().map(Tile::image).collect())
            .collect();

        imaging::recompose(&rows)
    }

    /// Where [`Self::recompose_and_save`] writes: `<stem>_Inked<suffix>` beside the base path.
    pub fn output_path(&self) -> PathBuf {
        ink::ink_path(&self.base_path)
    }

    /// Compose the tiles and write them to [`Self::output_path`].
    pub fn recompose_and_save(&self, codec: &dyn ImageCodec) -> Result<PathBuf, ImagingError> {
        let merged = self.recompose()?;
        let path = self.output_path();
        codec.encode(&merged, &path)?;
        log::info!("Saved {:?}", path);
        Ok(path)
    }

    fn index_of(&self, pos: TilePos) -> usize {
        pos.row * self.cols() + pos.col
    }

    fn focus_signed(&mut self, row: isize, col: isize) -> Result<&Tile, BoundaryExceeded> {
        let in_bounds = row >= 0
            && col >= 0
            && (row as usize) < self.rows()
            && (col as usize) < self.cols();

        if !in_bounds {
            log::trace!(
                "Focus ({}, {}) outside {}x{} grid",
                row,
                col,
                self.rows(),
                self.cols()
            );
            return Err(BoundaryExceeded::tile(self.focus, row, col));
        }

        let old = self.index_of(self.focus);
        self.tiles[old].set_highlighted(false);

        self.focus = TilePos::new(row as usize, col as usize);
        let new = self.index_of(self.focus);
        self.tiles[new].set_highlighted(true);

        Ok(&self.tiles[new])
    }
}

fn build_tiles(image: &RgbaImage, layout: GridLayout) -> Result<Vec<Tile>, ImagingError> {
    let grid = imaging::split(image, layout.rows(), layout.cols())?;

    Ok(grid
        .into_iter()
        .enumerate()
        .flat_map(|(row, images)| {
            images
                .into_iter()
                .enumerate()
                .map(move |(col, image)| Tile::new(image, TilePos::new(row, col)))
        })
        .collect())
}
