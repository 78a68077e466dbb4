//! Vector oval annotations over a raster, and flattening them into it.
//!
//! The canvas holds one base image (the focused tile) plus a list of committed
//! ovals that are not yet part of the raster. [`AnnotationCanvas::flatten`] is
//! the only place where vector edits become pixels.

use image::{Rgba, RgbaImage};
use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::model::{DrawMode, DrawingState, Oval, Pen};

/// Base image plus pending oval annotations.
#[derive(Debug, Clone, Default)]
pub struct AnnotationCanvas {
    image: Option<RgbaImage>,
    pending: Vec<Oval>,
    drawing: DrawingState,
    pen: Pen,
}

impl AnnotationCanvas {
    pub fn new(pen: Pen) -> Self {
        Self {
            pen,
            ..Self::default()
        }
    }

    pub fn pen(&self) -> Pen {
        self.pen
    }

    /// Change the stroke used by later flattens.
    pub fn set_pen(&mut self, pen: Pen) {
        self.pen = pen;
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    /// Replace the base image.
    ///
    /// Pending annotations are kept; callers switching focus flatten or clear
    /// them against the old image first.
    pub fn set_image(&mut self, image: RgbaImage) {
        self.image = Some(image);
    }

    /// Drop the base image, e.g. after the last grid was closed.
    pub fn take_image(&mut self) -> Option<RgbaImage> {
        self.image.take()
    }

    pub fn pending(&self) -> &[Oval] {
        &self.pending
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// The oval currently being dragged out, if any.
    pub fn in_progress(&self) -> Option<Oval> {
        self.drawing.to_oval()
    }

    /// Start an oval anchored at `point`.
    ///
    /// Only accepted in [`DrawMode::Annotate`] and when `point` lies on the
    /// base image. Returns whether drawing started.
    pub fn begin_annotation(&mut self, mode: DrawMode, point: (f32, f32)) -> bool {
        if !mode.is_drawing_mode() {
            return false;
        }

        let Some(image) = &self.image else {
            return false;
        };

        let (x, y) = point;
        let inside = x >= 0.0 && y >= 0.0 && x < image.width() as f32 && y < image.height() as f32;
        if !inside {
            log::trace!("Ignoring annotation start at ({}, {}) outside the image", x, y);
            return false;
        }

        self.drawing = DrawingState::Oval {
            start_x: x,
            start_y: y,
            current_x: x,
            current_y: y,
        };
        true
    }

    /// Stretch the in-progress oval so it spans from its anchor to `point`.
    pub fn update_annotation(&mut self, point: (f32, f32)) -> bool {
        match &mut self.drawing {
            DrawingState::Oval {
                current_x,
                current_y,
                ..
            } => {
                *current_x = point.0;
                *current_y = point.1;
                true
            }
            DrawingState::Idle => false,
        }
    }

    /// Move the in-progress oval to the pending list.
    pub fn commit_annotation(&mut self) -> Option<Oval> {
        let oval = std::mem::take(&mut self.drawing).to_oval()?;
        self.pending.push(oval);
        log::debug!("Committed oval, {} pending", self.pending.len());
        Some(oval)
    }

    /// Remove the most recently committed oval.
    pub fn undo(&mut self) -> Option<Oval> {
        self.pending.pop()
    }

    /// Discard every pending oval, and any half-drawn one, without drawing them.
    pub fn clear_pending(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Discarding {} pending annotations", self.pending.len());
        }
        self.pending.clear();
        self.drawing = DrawingState::Idle;
    }

    /// Draw the pending ovals into the base image.
    ///
    /// The result becomes the new base image and is returned; the pending list
    /// is emptied. With nothing pending this returns an identical copy of the
    /// base. `None` when no base image is set.
    pub fn flatten(&mut self) -> Option<RgbaImage> {
        let flattened = self.flattened()?;
        self.pending.clear();
        self.image = Some(flattened.clone());
        Some(flattened)
    }

    /// What [`flatten`](Self::flatten) would produce, leaving the canvas as is.
    pub fn flattened(&self) -> Option<RgbaImage> {
        let base = self.image.as_ref()?;
        if self.pending.is_empty() {
            return Some(base.clone());
        }

        log::debug!("Flattening {} annotations", self.pending.len());
        Some(render(base, &self.pending, &self.pen).unwrap_or_else(|| base.clone()))
    }
}

/// Stroke `ovals` on a transparent layer and blend it over `base`.
///
/// Pixels without stroke coverage are copied unchanged, so translucent or fully
/// transparent regions of the base keep their exact channel values.
fn render(base: &RgbaImage, ovals: &[Oval], pen: &Pen) -> Option<RgbaImage> {
    let (width, height) = base.dimensions();
    let mut layer = Pixmap::new(width, height)?;

    let mut paint = Paint::default();
    let [r, g, b, a] = pen.color;
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;

    let stroke = Stroke {
        width: pen.width,
        ..Stroke::default()
    };

    for oval in ovals {
        if oval.is_degenerate() {
            log::trace!("Skipping zero-area oval at ({}, {})", oval.x, oval.y);
            continue;
        }

        let (left, top, w, h) = oval.normalized();
        let Some(path) = Rect::from_xywh(left, top, w, h).and_then(PathBuilder::from_oval) else {
            continue;
        };
        layer.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    let mut out = base.clone();
    for (dst, src) in out.pixels_mut().zip(layer.pixels()) {
        if src.alpha() == 0 {
            continue;
        }
        let color = src.demultiply();
        *dst = blend_over(
            [color.red(), color.green(), color.blue(), color.alpha()],
            *dst,
        );
    }
    Some(out)
}

/// Source-over composite of straight-alpha `src` onto straight-alpha `dst`.
fn blend_over(src: [u8; 4], dst: Rgba<u8>) -> Rgba<u8> {
    let src_alpha = f32::from(src[3]) / 255.0;
    let dst_alpha = f32::from(dst[3]) / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    if out_alpha <= 0.0 {
        return dst;
    }

    let channel = |s: u8, d: u8| {
        let value = (f32::from(s) * src_alpha + f32::from(d) * dst_alpha * (1.0 - src_alpha))
            / out_alpha;
        value.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
