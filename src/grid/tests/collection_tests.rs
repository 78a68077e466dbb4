//! Insert, remove, reload and observer bookkeeping.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::{codec_with, collection, focus, grid, highlighted, layout};
use crate::grid::{FocusChanged, GridCollection};
use crate::imaging::{ImageCodec, ImagingError};
use crate::model::{Direction, TilePos};
use crate::test_image;

fn keys(grids: &GridCollection) -> Vec<String> {
    grids.grids().iter().map(|g| g.image_key()).collect()
}

#[test]
fn test_first_insert_takes_focus_silently() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);

    let mut grids = GridCollection::new();
    grids.subscribe(move |e: &FocusChanged| sink.borrow_mut().push(e.grid_index));
    grids.push(grid("a.png", 2, 2));

    assert_eq!(grids.focused_index(), Some(0));
    assert_eq!(highlighted(&grids), vec![(0, TilePos::ORIGIN)]);
    assert!(log.borrow().is_empty());
}

#[test]
fn test_insert_keeps_focus_on_same_grid() {
    let mut grids = collection(&[(2, 2), (2, 2)]);
    grids.set_focus(1, TilePos::new(1, 1)).unwrap();

    let index = grids.insert(0, grid("front.png", 1, 1));
    assert_eq!(index, 0);
    assert_eq!(keys(&grids), ["front.png", "g0.png", "g1.png"]);
    assert_eq!(focus(&grids), (2, TilePos::new(1, 1)));

    // Inserting after the focused grid changes nothing
    grids.insert(3, grid("back.png", 1, 1));
    assert_eq!(focus(&grids), (2, TilePos::new(1, 1)));

    // Past-the-end indices append
    assert_eq!(grids.insert(99, grid("tail.png", 1, 1)), 4);
    assert_eq!(highlighted(&grids), vec![(2, TilePos::new(1, 1))]);
}

#[test]
fn test_insert_and_focus() {
    let mut grids = collection(&[(2, 2), (2, 2)]);
    let event = grids.insert_and_focus(1, grid("mid.png", 2, 2)).unwrap();
    assert_eq!(event.grid_index, 1);
    assert_eq!(event.image_key, "mid.png");
    assert_eq!(highlighted(&grids), vec![(1, TilePos::ORIGIN)]);
}

#[test]
fn test_remove_focused_moves_toward_index_zero() {
    let mut grids = collection(&[(2, 2), (2, 2), (2, 2)]);
    grids.set_focus(0, TilePos::new(0, 1)).unwrap();
    grids.set_focus(2, TilePos::new(1, 0)).unwrap();
    grids.set_focus(1, TilePos::ORIGIN).unwrap();

    let event = grids.remove_focused().unwrap();
    assert_eq!(event.grid_index, 0);
    assert_eq!(event.position, TilePos::new(0, 1));
    assert_eq!(keys(&grids), ["g0.png", "g2.png"]);

    // Removing index 0 while focused hands focus to the new first grid
    let event = grids.remove_focused().unwrap();
    assert_eq!(event.grid_index, 0);
    assert_eq!(event.image_key, "g2.png");
    assert_eq!(event.position, TilePos::new(1, 0));
    assert_eq!(highlighted(&grids), vec![(0, TilePos::new(1, 0))]);

    assert!(grids.remove_focused().is_none());
    assert!(grids.is_empty());
    assert_eq!(grids.focused_index(), None);
}

#[test]
fn test_remove_unfocused_adjusts_index() {
    let mut grids = collection(&[(1, 1), (1, 1), (1, 1), (1, 1)]);
    grids.focus_grid(2).unwrap();

    assert!(grids.remove(3).is_none());
    assert_eq!(grids.focused_index(), Some(2));

    assert!(grids.remove(0).is_none());
    assert_eq!(grids.focused_index(), Some(1));
    assert_eq!(grids.focused_grid().unwrap().image_key(), "g2.png");

    assert!(grids.remove(7).is_none());
    assert_eq!(grids.len(), 2);
}

#[test]
fn test_reload_restores_position_with_new_layout() {
    let codec = codec_with(&[("/survey/a.png", 60, 60), ("/survey/b.png", 60, 60)]);
    let mut grids = GridCollection::new();
    grids.open(&codec, 0, "/survey/a.png", None, layout(3, 3)).unwrap();
    grids.open(&codec, 1, "/survey/b.png", None, layout(3, 3)).unwrap();
    grids.set_focus(0, TilePos::new(1, 2)).unwrap();

    let event = grids.reload(&codec, 0, layout(2, 4)).unwrap().unwrap();
    assert_eq!(event.position, TilePos::new(1, 2));
    assert_eq!(grids.grid(0).unwrap().rows(), 2);
    assert_eq!(event.image.dimensions(), (15, 30));

    // Shrinking clamps the remembered tile
    grids.reload(&codec, 0, layout(1, 1)).unwrap();
    assert_eq!(focus(&grids), (0, TilePos::ORIGIN));

    // Reloading an unfocused grid raises nothing and keeps highlight on the focused one
    grids.set_focus(1, TilePos::new(2, 2)).unwrap();
    grids.set_focus(0, TilePos::ORIGIN).unwrap();
    assert!(grids.reload(&codec, 1, layout(2, 2)).unwrap().is_none());
    assert_eq!(grids.grid(1).unwrap().focus(), TilePos::new(1, 1));
    assert_eq!(highlighted(&grids), vec![(0, TilePos::ORIGIN)]);
}

#[test]
fn test_reload_failure_leaves_grid_in_place() {
    let codec = codec_with(&[("/survey/a.png", 10, 10)]);
    let mut grids = GridCollection::new();
    grids.open(&codec, 0, "/survey/a.png", None, layout(2, 2)).unwrap();

    // More rows than pixels
    let err = grids.reload(&codec, 0, layout(20, 20)).unwrap_err();
    assert!(matches!(err, ImagingError::InvalidGridSize { .. }));
    assert_eq!(grids.grid(0).unwrap().rows(), 2);
}

#[test]
fn test_open_failure_inserts_nothing() {
    let codec = codec_with(&[]);
    let mut grids = GridCollection::new();
    let err = grids
        .open(&codec, 0, "/survey/missing.png", None, layout(2, 2))
        .unwrap_err();
    assert!(err.is_decode_failure());
    assert!(grids.is_empty());
}

#[test]
fn test_override_base_names_saved_output() {
    let codec = codec_with(&[("/survey/x_Inked.jpg", 40, 40), ("/survey/x.jpg", 40, 40)]);
    let mut grids = GridCollection::new();
    grids
        .open(
            &codec,
            0,
            "/survey/x_Inked.jpg",
            Some(PathBuf::from("/survey/x.jpg")),
            layout(2, 2),
        )
        .unwrap();

    let marked = test_image::solid(20, 20, [255, 0, 0, 255]);
    grids.replace_focused_tile(marked.clone()).unwrap().unwrap();

    let grid = grids.focused_grid().unwrap();
    assert_eq!(grid.image_key(), "x.jpg");
    let saved = grid.recompose_and_save(&codec).unwrap();
    assert_eq!(saved, Path::new("/survey/x_Inked.jpg"));

    let written = codec.decode(&saved).unwrap();
    assert_eq!(written.get_pixel(0, 0), marked.get_pixel(0, 0));
    assert_eq!(written.get_pixel(39, 39), test_image::gradient(40, 40).get_pixel(39, 39));
}

#[test]
fn test_replace_focused_tile_checks_size() {
    let mut grids = GridCollection::new();
    assert!(grids.replace_focused_tile(test_image::solid(1, 1, [0; 4])).unwrap().is_none());

    grids.push(grid("a.png", 2, 2));
    let err = grids
        .replace_focused_tile(test_image::solid(3, 3, [0; 4]))
        .unwrap_err();
    assert!(matches!(err, ImagingError::DimensionMismatch { .. }));
}

#[test]
fn test_observers_see_events_in_order() {
    let log: Rc<RefCell<Vec<(usize, TilePos)>>> = Rc::default();
    let first = Rc::clone(&log);
    let second = Rc::clone(&log);

    let mut grids = collection(&[(2, 2), (1, 1)]);
    grids.subscribe(move |e: &FocusChanged| first.borrow_mut().push((e.grid_index, e.position)));
    grids.subscribe(move |e: &FocusChanged| second.borrow_mut().push((e.grid_index + 100, e.position)));

    grids.move_item_focus(Direction::Right).unwrap();
    let returned = grids.move_item_focus(Direction::Down).unwrap();
    assert!(grids.move_item_focus(Direction::Right).is_none());

    assert_eq!(
        *log.borrow(),
        vec![
            (0, TilePos::new(0, 1)),
            (100, TilePos::new(0, 1)),
            (0, TilePos::new(1, 1)),
            (100, TilePos::new(1, 1)),
        ]
    );
    assert_eq!(returned.position, TilePos::new(1, 1));
    assert_eq!(returned.image, *grids.focused_tile().unwrap().image());
}
