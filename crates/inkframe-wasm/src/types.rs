//! WASM-compatible wrapper types for bitmaps and samples.
//!
//! These types wrap the core Inkframe types and handle the conversion between
//! Rust and JavaScript data representations.

use inkframe_core::bitmap::{Bitmap, FilterType, PixelFormat};
use inkframe_core::buffer::Sample;
use wasm_bindgen::prelude::*;

/// An RGBA bitmap wrapper for JavaScript.
///
/// Pixel data uses the same layout as a canvas `ImageData`: 4 bytes per pixel,
/// straight alpha, rows top to bottom.
///
/// # Memory Management
///
/// The pixel data lives in WASM memory. `pixels()` copies it into a
/// `Uint8Array`. Call `free()` to release a large bitmap early; otherwise
/// wasm-bindgen's finalizer cleans up.
#[wasm_bindgen]
pub struct JsBitmap {
    inner: Bitmap,
}

#[wasm_bindgen]
impl JsBitmap {
    /// Create a bitmap from RGBA pixel data.
    ///
    /// # Arguments
    /// * `width` - Width in pixels
    /// * `height` - Height in pixels
    /// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
    /// * `scale` - Pixel density (`devicePixelRatio`); use 1 for plain images
    ///
    /// # Errors
    /// Returns an error if the dimensions are zero or `pixels` is too short.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>, scale: f64) -> Result<JsBitmap, JsValue> {
        Bitmap::new(width, height, PixelFormat::Rgba8, pixels)
            .map(|bmp| JsBitmap::from_bitmap(bmp.with_scale(scale)))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Pixel density
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.scale()
    }

    /// Returns RGBA pixel data as a Uint8Array, orientation applied.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.to_rgba_image().into_raw()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsBitmap {
    /// Wrap a core bitmap. Tagged bitmaps are normalized to upright RGBA.
    pub(crate) fn from_bitmap(bitmap: Bitmap) -> Self {
        let upright = inkframe_core::transform::normalize_orientation(&bitmap);
        Self { inner: upright }
    }

    pub(crate) fn as_bitmap(&self) -> &Bitmap {
        &self.inner
    }
}

/// A classifier-ready sample for JavaScript.
///
/// One byte of luminance per pixel, rows top to bottom, no padding.
#[wasm_bindgen]
pub struct JsSample {
    width: u32,
    height: u32,
    data: Vec<u8>,
    normalized: Vec<f32>,
}

#[wasm_bindgen]
impl JsSample {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Luminance bytes as a Uint8Array.
    pub fn data(&self) -> Vec<u8> {
        self.data.clone()
    }

    /// Luminance scaled to 0..1 as a Float32Array, for tensor input.
    pub fn normalized(&self) -> Vec<f32> {
        self.normalized.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsSample {
    pub(crate) fn from_sample(sample: &Sample) -> Self {
        Self {
            width: sample.width(),
            height: sample.height(),
            data: sample.as_buffer().data().to_vec(),
            normalized: sample.to_normalized(),
        }
    }
}

/// Convert a u8 filter type value to the core FilterType enum.
///
/// Values:
/// - 0 = Nearest (fastest, lowest quality)
/// - 1 = Bilinear (good balance of speed and quality)
/// - 2 = Lanczos3 (best quality, slowest)
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear, // Default
    }
}
