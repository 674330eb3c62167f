//! Touch canvas bindings.
//!
//! Forward pointer events from a `<canvas>` element: `pointerdown` to
//! `touches_began`, `pointermove` to `touches_moved` and `pointerup` to
//! `touches_ended`, all in CSS pixels.

use crate::types::JsBitmap;
use inkframe_core::canvas::{TouchCanvas, TouchPhase};
use inkframe_core::geometry::Point;
use wasm_bindgen::prelude::*;

/// JavaScript-accessible stroke canvas.
///
/// # Example (TypeScript)
/// ```typescript
/// const canvas = new JsTouchCanvas(280, 280, window.devicePixelRatio);
/// el.onpointerdown = (e) => canvas.touches_began(e.offsetX, e.offsetY);
/// el.onpointermove = (e) => e.buttons && canvas.touches_moved(e.offsetX, e.offsetY);
/// el.onpointerup = (e) => canvas.touches_ended(e.offsetX, e.offsetY);
///
/// const drawing = canvas.snapshot(); // JsBitmap or undefined
/// ```
#[wasm_bindgen]
pub struct JsTouchCanvas {
    inner: TouchCanvas,
}

#[wasm_bindgen]
impl JsTouchCanvas {
    /// Create a canvas of `width` x `height` CSS pixels at the given density.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, scale: f64) -> JsTouchCanvas {
        JsTouchCanvas {
            inner: TouchCanvas::new(width, height).with_scale(scale),
        }
    }

    /// Set the stroke width in CSS pixels. Ignored unless positive.
    pub fn set_stroke_width(&mut self, width: f64) {
        self.inner.set_stroke_width(width);
    }

    pub fn touches_began(&mut self, x: f64, y: f64) {
        self.inner.handle(TouchPhase::Began, &[Point::new(x, y)]);
    }

    pub fn touches_moved(&mut self, x: f64, y: f64) {
        self.inner.handle(TouchPhase::Moved, &[Point::new(x, y)]);
    }

    pub fn touches_ended(&mut self, x: f64, y: f64) {
        self.inner.handle(TouchPhase::Ended, &[Point::new(x, y)]);
    }

    /// Erase everything.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Whether anything has been drawn since the last clear.
    pub fn has_ink(&self) -> bool {
        self.inner.has_ink()
    }

    /// Number of segments drawn since the last `touches_began`.
    #[wasm_bindgen(getter)]
    pub fn segment_count(&self) -> usize {
        self.inner.segments().len()
    }

    /// Drawn segments flattened to `[from_x, from_y, to_x, to_y, ...]`.
    pub fn segments(&self) -> js_sys::Float64Array {
        js_sys::Float64Array::from(&self.segment_coords()[..])
    }

    /// Current drawing, or `undefined` before the first touch.
    pub fn snapshot(&self) -> Option<JsBitmap> {
        self.inner.snapshot().map(JsBitmap::from_bitmap)
    }
}

impl JsTouchCanvas {
    pub(crate) fn as_canvas(&self) -> &TouchCanvas {
        &self.inner
    }

    fn segment_coords(&self) -> Vec<f64> {
        self.inner
            .segments()
            .iter()
            .flat_map(|s| [s.from.x, s.from.y, s.to.x, s.to.y])
            .collect()
    }
}
