//! The touch canvas state machine.
//!
//! [`TouchCanvas`] keeps the last touch point and the segments drawn since
//! the stroke began, and rasterizes each segment into its surface as it
//! arrives.

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::raster::{stroke_segment, INK};
use crate::bitmap::Bitmap;
use crate::geometry::Point;

/// Default stroke width in points.
pub const DEFAULT_STROKE_WIDTH: f64 = 8.0;

/// Phase of a touch event delivered to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
}

/// One drawn line segment, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// A drawing surface that turns touch events into black strokes on a
/// transparent background.
///
/// Only the first touch of every event participates. The canvas keeps the
/// last touch point of the current stroke so each `Moved` event extends the
/// stroke by one segment.
#[derive(Debug, Clone)]
pub struct TouchCanvas {
    width: f64,
    height: f64,
    scale: f64,
    stroke_width: f64,
    last_point: Option<Point>,
    surface: Option<RgbaImage>,
    segments: Vec<Segment>,
}

impl TouchCanvas {
    /// Create an empty canvas of `width` x `height` points at 1x density.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            scale: 1.0,
            stroke_width: DEFAULT_STROKE_WIDTH,
            last_point: None,
            surface: None,
            segments: Vec::new(),
        }
    }

    /// Set the pixel density of the backing surface.
    pub fn with_scale(mut self, scale: f64) -> Self {
        if scale.is_finite() && scale > 0.0 {
            self.scale = scale;
        }
        self
    }

    /// Set the stroke width in points.
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.set_stroke_width(stroke_width);
        self
    }

    /// Change the stroke width for segments drawn from now on. Non-positive
    /// or non-finite widths are ignored.
    pub fn set_stroke_width(&mut self, stroke_width: f64) {
        if stroke_width.is_finite() && stroke_width > 0.0 {
            self.stroke_width = stroke_width;
        }
    }

    #[inline]
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[inline]
    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    /// The touch point the next segment starts from, if a stroke is active.
    #[inline]
    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }

    /// Segments drawn since the last `Began`.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Dispatch a touch event by phase.
    pub fn handle(&mut self, phase: TouchPhase, touches: &[Point]) {
        match phase {
            TouchPhase::Began => self.touches_began(touches),
            TouchPhase::Moved => self.touches_moved(touches),
            TouchPhase::Ended => self.touches_ended(touches),
        }
    }

    /// Start a new drawing: clear the canvas and remember the first touch.
    pub fn touches_began(&mut self, touches: &[Point]) {
        self.clear();
        self.surface = Some(self.blank_surface());
        self.last_point = touches.first().copied();
        if self.last_point.is_none() {
            debug!("touch began without touches");
        }
    }

    /// Extend the stroke to the current touch.
    pub fn touches_moved(&mut self, touches: &[Point]) {
        let Some(&current) = touches.first() else {
            debug!("touch moved without touches");
            return;
        };
        self.draw_to(current);
        self.last_point = Some(current);
    }

    /// Finish the stroke at the current touch.
    pub fn touches_ended(&mut self, touches: &[Point]) {
        match touches.first() {
            Some(&current) => self.draw_to(current),
            None => debug!("touch ended without touches"),
        }
        self.last_point = None;
    }

    /// Drop all ink and stroke state.
    pub fn clear(&mut self) {
        self.surface = None;
        self.segments.clear();
        self.last_point = None;
    }

    /// Current contents as an RGBA bitmap tagged with the canvas density.
    ///
    /// Returns `None` until the first touch has been handled.
    pub fn snapshot(&self) -> Option<Bitmap> {
        let surface = self.surface.as_ref()?;
        Bitmap::from_rgba_image(surface.clone())
            .ok()
            .map(|bmp| bmp.with_scale(self.scale))
    }

    /// Whether any ink has been put on the canvas.
    pub fn has_ink(&self) -> bool {
        self.surface
            .as_ref()
            .is_some_and(|s| s.pixels().any(|p| p[3] != 0))
    }

    fn draw_to(&mut self, to: Point) {
        let Some(from) = self.last_point else {
            debug!(x = to.x, y = to.y, "no stroke in progress, nothing drawn");
            return;
        };

        if self.surface.is_none() {
            self.surface = Some(self.blank_surface());
        }
        let scale = self.scale;
        let width = self.stroke_width * scale;
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        stroke_segment(
            surface,
            Point::new(from.x * scale, from.y * scale),
            Point::new(to.x * scale, to.y * scale),
            width,
            INK,
        );
        self.segments.push(Segment { from, to });
    }

    fn blank_surface(&self) -> RgbaImage {
        let w = (self.width * self.scale).ceil().max(1.0) as u32;
        let h = (self.height * self.scale).ceil().max(1.0) as u32;
        RgbaImage::new(w, h)
    }
}
