//! Annotation shapes, pen style and the draw-mode state.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PEN_COLOR, DEFAULT_PEN_WIDTH};

/// Pointer modes for the annotation canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    /// Pointer gestures pan the view
    #[default]
    Select,
    /// Pointer gestures draw ovals
    Annotate,
}

impl DrawMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            DrawMode::Select => "Select",
            DrawMode::Annotate => "Draw Oval",
        }
    }

    /// Check if pointer gestures draw in this mode.
    pub fn is_drawing_mode(&self) -> bool {
        matches!(self, DrawMode::Annotate)
    }
}

/// Stroke style for annotations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pen {
    /// RGBA stroke color
    pub color: [u8; 4],
    /// Stroke width in image pixels
    pub width: f32,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            color: DEFAULT_PEN_COLOR,
            width: DEFAULT_PEN_WIDTH,
        }
    }
}

/// An oval given by its bounding rectangle in image coordinates.
///
/// `width` and `height` keep the sign of the drag that produced them; use
/// [`Oval::normalized`] for a rectangle with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oval {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Oval {
    /// Oval spanning from an anchor corner to the opposite corner.
    pub fn from_corners(anchor: (f32, f32), corner: (f32, f32)) -> Self {
        Self {
            x: anchor.0,
            y: anchor.1,
            width: corner.0 - anchor.0,
            height: corner.1 - anchor.1,
        }
    }

    /// Bounding rectangle as `(left, top, width, height)` with non-negative size.
    pub fn normalized(&self) -> (f32, f32, f32, f32) {
        let left = self.x.min(self.x + self.width);
        let top = self.y.min(self.y + self.height);
        (left, top, self.width.abs(), self.height.abs())
    }

    /// Whether the oval encloses no area.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

/// State for an oval currently being dragged out.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DrawingState {
    /// Not currently drawing anything.
    #[default]
    Idle,
    /// Dragging an oval from its anchor corner.
    Oval {
        start_x: f32,
        start_y: f32,
        current_x: f32,
        current_y: f32,
    },
}

impl DrawingState {
    /// Check if we're currently drawing something.
    pub fn is_drawing(&self) -> bool {
        !matches!(self, DrawingState::Idle)
    }

    /// The oval described by the drag so far.
    pub fn to_oval(&self) -> Option<Oval> {
        match *self {
            DrawingState::Idle => None,
            DrawingState::Oval {
                start_x,
                start_y,
                current_x,
                current_y,
            } => Some(Oval::from_corners(
                (start_x, start_y),
                (current_x, current_y),
            )),
        }
    }
}
