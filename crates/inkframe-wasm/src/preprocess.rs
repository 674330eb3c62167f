//! Decoding and sample preparation bindings.

use crate::canvas::JsTouchCanvas;
use crate::types::{filter_from_u8, JsBitmap, JsSample};
use inkframe_core::bitmap::decode_bitmap;
use inkframe_core::classify::{argmax, Prediction};
use inkframe_core::preprocess::prepare_sample as core_prepare;
use wasm_bindgen::prelude::*;

/// Decode PNG or JPEG bytes into an upright RGBA bitmap.
///
/// EXIF orientation is applied, so the result displays correctly as-is.
///
/// # Errors
///
/// Returns an error if the bytes are not a supported image.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsBitmap, JsValue> {
    decode_bitmap(bytes)
        .map(JsBitmap::from_bitmap)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Prepare a `size` x `size` grayscale sample from any bitmap.
///
/// The shorter side is scaled to `size`, the center square is kept and the
/// result is reduced to luminance on a white background.
///
/// # Arguments
///
/// * `image` - Source bitmap
/// * `size` - Model input edge length (28 for MNIST-style models)
/// * `filter` - Resampling filter: 0 = Nearest, 1 = Bilinear, 2 = Lanczos3
///
/// # Example (TypeScript)
///
/// ```typescript
/// const sample = prepare_sample(canvas.snapshot(), 28, 1);
/// const input = new ort.Tensor('float32', sample.normalized(), [1, 1, 28, 28]);
/// ```
#[wasm_bindgen]
pub fn prepare_sample(image: &JsBitmap, size: u32, filter: u8) -> Result<JsSample, JsValue> {
    core_prepare(image.as_bitmap(), size, filter_from_u8(filter))
        .map(|sample| JsSample::from_sample(&sample))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Prepare a sample straight from a touch canvas.
///
/// Returns `undefined` if nothing has been drawn yet.
#[wasm_bindgen]
pub fn prepare_canvas_sample(
    canvas: &JsTouchCanvas,
    size: u32,
    filter: u8,
) -> Result<Option<JsSample>, JsValue> {
    let Some(drawing) = canvas.as_canvas().snapshot() else {
        return Ok(None);
    };
    core_prepare(&drawing, size, filter_from_u8(filter))
        .map(|sample| Some(JsSample::from_sample(&sample)))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Label text for the best digit score, e.g. `"7: 98.76%"`.
///
/// Returns `undefined` if `scores` has no comparable value.
#[wasm_bindgen]
pub fn digit_label(scores: &[f64]) -> Option<String> {
    argmax(scores).map(|(digit, confidence)| Prediction { digit, confidence }.label_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_label() {
        assert_eq!(digit_label(&[0.1, 0.2, 0.7]).as_deref(), Some("2: 70.00%"));
        assert_eq!(digit_label(&[]), None);
    }

    #[test]
    fn test_digit_label_tie_prefers_later() {
        assert_eq!(digit_label(&[0.5, 0.5]).as_deref(), Some("1: 50.00%"));
    }
}

/// These tests use functions that return `Result<T, JsValue>` and can only
/// run on wasm32 targets. Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_decode_image_invalid() {
        assert!(decode_image(&[0, 1, 2, 3]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_prepare_sample_shape() {
        let image = JsBitmap::new(56, 40, vec![255u8; 56 * 40 * 4], 1.0).unwrap();
        let sample = prepare_sample(&image, 28, 1).unwrap();

        assert_eq!(sample.width(), 28);
        assert_eq!(sample.height(), 28);
        assert_eq!(sample.data().len(), 28 * 28);
    }

    #[wasm_bindgen_test]
    fn test_prepare_sample_zero_size_errors() {
        let image = JsBitmap::new(8, 8, vec![0u8; 8 * 8 * 4], 1.0).unwrap();
        assert!(prepare_sample(&image, 0, 1).is_err());
    }

    #[wasm_bindgen_test]
    fn test_prepare_canvas_sample() {
        let mut canvas = JsTouchCanvas::new(100.0, 100.0, 1.0);
        assert!(prepare_canvas_sample(&canvas, 28, 1).unwrap().is_none());

        canvas.touches_began(50.0, 10.0);
        canvas.touches_ended(50.0, 90.0);
        let sample = prepare_canvas_sample(&canvas, 28, 1).unwrap().unwrap();
        assert_eq!(sample.data().len(), 28 * 28);
    }
}
