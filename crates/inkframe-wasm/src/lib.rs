//! Inkframe WASM - WebAssembly bindings for Inkframe
//!
//! This crate exposes the inkframe-core canvas, preprocessing and rectangle
//! mapping to JavaScript/TypeScript front ends.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for bitmaps and samples
//! - `canvas` - Touch canvas driven by pointer events
//! - `preprocess` - Image decoding and classifier sample preparation
//! - `detect` - Detector rectangle mapping and overlay layout
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsTouchCanvas, prepare_canvas_sample, digit_label } from '@inkframe/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const canvas = new JsTouchCanvas(280, 280, window.devicePixelRatio);
//! // ... forward pointer events ...
//! const sample = prepare_canvas_sample(canvas, 28, 1);
//! if (sample) {
//!   const scores = await runModel(sample.normalized());
//!   label.textContent = digit_label(scores) ?? '';
//! }
//! ```

use wasm_bindgen::prelude::*;

mod canvas;
mod detect;
mod preprocess;
mod types;

// Re-export public types
pub use canvas::JsTouchCanvas;
pub use detect::{layout_overlays, region_label, transform_rect, JsViewRect};
pub use preprocess::{decode_image, digit_label, prepare_canvas_sample, prepare_sample};
pub use types::{JsBitmap, JsSample};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
