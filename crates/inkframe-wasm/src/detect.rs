//! Rectangle mapping and overlay bindings.
//!
//! Detectors report rectangles in a unit square with the origin at the
//! bottom-left. These bindings map them onto a preview element whose origin
//! is the top-left, and apply the usual detection limits.

use inkframe_core::classify::{classification_text, Classification};
use inkframe_core::config::DetectionConfig;
use inkframe_core::detect::{filter_observations, overlays_for, Observation};
use inkframe_core::geometry::{transform_rect as core_transform, NormalizedRect, ViewExtents};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A rectangle in view coordinates (origin top-left).
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsViewRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Map a normalized detector rectangle onto a `view_width` x `view_height`
/// view.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const r = transform_rect(0.25, 0.25, 0.5, 0.5, 200, 100);
/// // r.x == 50, r.y == 25, r.width == 100, r.height == 50
/// ```
#[wasm_bindgen]
pub fn transform_rect(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    view_width: f64,
    view_height: f64,
) -> JsViewRect {
    let rect = core_transform(
        NormalizedRect::new(x, y, width, height),
        ViewExtents::new(view_width, view_height),
    );
    JsViewRect {
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
    }
}

/// Overlay description handed back to JavaScript.
#[derive(Debug, Serialize)]
struct OverlayJs {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    border_width: f64,
    color: String,
}

/// Filter detector output and lay out highlight overlays.
///
/// # Arguments
///
/// * `observations` - Array of `{ bounding_box: {x, y, width, height}, confidence }`
/// * `view_width`, `view_height` - Size of the preview element
/// * `min_confidence` - Drop observations below this (default 0.25)
/// * `max_observations` - Keep at most this many (default 10)
/// * `min_size` - Minimum side length in view points (default 5)
///
/// # Returns
///
/// Array of `{ x, y, width, height, border_width, color }` objects, most
/// confident first, with `color` as a CSS `rgba()` string.
///
/// # Errors
///
/// Returns an error if `observations` does not have the expected shape.
#[wasm_bindgen]
pub fn layout_overlays(
    observations: JsValue,
    view_width: f64,
    view_height: f64,
    min_confidence: Option<f32>,
    max_observations: Option<u32>,
    min_size: Option<f64>,
) -> Result<JsValue, JsValue> {
    let observations: Vec<Observation> = serde_wasm_bindgen::from_value(observations)
        .map_err(|e| JsValue::from_str(&format!("Invalid observations: {}", e)))?;

    let limits = detection_limits(min_confidence, max_observations, min_size);
    let overlays = overlay_layout(
        observations,
        ViewExtents::new(view_width, view_height),
        &limits,
    );
    serde_wasm_bindgen::to_value(&overlays).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Two-line label for region classifier results, e.g.
/// `"85% it's envelope\n12% it's notebook"`.
///
/// # Errors
///
/// Returns an error unless `results` is an array of `{ label, confidence }`.
#[wasm_bindgen]
pub fn region_label(results: JsValue) -> Result<String, JsValue> {
    let results: Vec<Classification> = serde_wasm_bindgen::from_value(results)
        .map_err(|e| JsValue::from_str(&format!("Invalid classifications: {}", e)))?;
    Ok(classification_text(&results))
}

/// Detection limits with any caller overrides applied.
fn detection_limits(
    min_confidence: Option<f32>,
    max_observations: Option<u32>,
    min_size: Option<f64>,
) -> DetectionConfig {
    let defaults = DetectionConfig::default();
    DetectionConfig {
        min_confidence: min_confidence.unwrap_or(defaults.min_confidence),
        max_observations: max_observations.map_or(defaults.max_observations, |n| n as usize),
        min_size: min_size.unwrap_or(defaults.min_size),
        ..defaults
    }
}

fn overlay_layout(
    observations: Vec<Observation>,
    view: ViewExtents,
    limits: &DetectionConfig,
) -> Vec<OverlayJs> {
    let kept = filter_observations(observations, view, limits);
    overlays_for(&kept, view)
        .into_iter()
        .map(|o| OverlayJs {
            x: o.rect.x,
            y: o.rect.y,
            width: o.rect.width,
            height: o.rect.height,
            border_width: o.border_width,
            color: css_rgba(o.color),
        })
        .collect()
}

fn css_rgba([r, g, b, a]: [u8; 4]) -> String {
    format!("rgba({}, {}, {}, {})", r, g, b, a as f64 / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_full_rect() {
        let r = transform_rect(0.0, 0.0, 1.0, 1.0, 320.0, 480.0);
        assert_eq!(
            r,
            JsViewRect {
                x: 0.0,
                y: 0.0,
                width: 320.0,
                height: 480.0
            }
        );
    }

    #[test]
    fn test_transform_flips_y() {
        let r = transform_rect(0.25, 0.25, 0.5, 0.5, 200.0, 100.0);
        assert_eq!((r.x, r.y, r.width, r.height), (50.0, 25.0, 100.0, 50.0));
    }

    #[test]
    fn test_overlay_layout() {
        let observations = vec![
            Observation::new(NormalizedRect::new(0.0, 0.0, 0.5, 0.5), Some(0.4)),
            Observation::new(NormalizedRect::new(0.5, 0.5, 0.5, 0.5), Some(0.8)),
            Observation::new(NormalizedRect::new(0.1, 0.1, 0.5, 0.5), Some(0.1)),
        ];
        let overlays = overlay_layout(
            observations,
            ViewExtents::new(100.0, 100.0),
            &detection_limits(None, None, None),
        );

        assert_eq!(overlays.len(), 2);
        assert_eq!((overlays[0].x, overlays[0].y), (50.0, 0.0));
        assert_eq!(overlays[0].border_width, 2.0);
        assert_eq!(overlays[0].color, "rgba(255, 255, 0, 1)");
    }

    #[test]
    fn test_detection_limits_defaults() {
        assert_eq!(detection_limits(None, None, None), DetectionConfig::default());
    }

    #[test]
    fn test_overlay_layout_with_custom_limits() {
        let observations = vec![
            Observation::new(NormalizedRect::new(0.0, 0.0, 0.5, 0.5), Some(0.4)),
            Observation::new(NormalizedRect::new(0.5, 0.5, 0.5, 0.5), Some(0.8)),
            Observation::new(NormalizedRect::new(0.1, 0.1, 0.5, 0.5), Some(0.1)),
            Observation::new(NormalizedRect::new(0.0, 0.0, 0.03125, 0.03125), Some(0.9)),
        ];

        // Lower threshold keeps the 0.1 box, cap of 2 keeps the best two,
        // min size of 1 lets the small box through
        let limits = detection_limits(Some(0.05), Some(2), Some(1.0));
        let overlays = overlay_layout(observations, ViewExtents::new(100.0, 100.0), &limits);

        assert_eq!(overlays.len(), 2);
        assert_eq!((overlays[0].width, overlays[0].height), (3.125, 3.125));
        assert_eq!((overlays[1].x, overlays[1].y), (50.0, 0.0));
    }
}
