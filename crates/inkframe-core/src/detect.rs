//! Rectangle detection results and the overlays drawn for them.

use serde::{Deserialize, Serialize};

use crate::bitmap::Bitmap;
use crate::config::DetectionConfig;
use crate::error::Result;
use crate::geometry::{transform_rect, NormalizedRect, ViewExtents, ViewRect};

/// Border width of a highlight overlay, in points.
pub const OVERLAY_BORDER_WIDTH: f64 = 2.0;

/// Straight RGBA yellow.
pub const OVERLAY_COLOR: [u8; 4] = [255, 255, 0, 255];

/// A model that finds rectangular regions in a frame.
pub trait Detector {
    fn detect(&mut self, frame: &Bitmap) -> Result<Vec<Observation>>;
}

impl<D: Detector + ?Sized> Detector for Box<D> {
    fn detect(&mut self, frame: &Bitmap) -> Result<Vec<Observation>> {
        (**self).detect(frame)
    }
}

/// One detected region in normalized, bottom-left-origin coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub bounding_box: NormalizedRect,
    /// Detector confidence, if the detector reports one.
    pub confidence: Option<f32>,
}

impl Observation {
    pub fn new(bounding_box: NormalizedRect, confidence: Option<f32>) -> Self {
        Self {
            bounding_box,
            confidence,
        }
    }
}

/// A highlight rectangle for the UI to draw over the preview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub rect: ViewRect,
    pub border_width: f64,
    pub color: [u8; 4],
}

impl Overlay {
    /// Yellow outline of the default border width.
    pub fn highlight(rect: ViewRect) -> Self {
        Self {
            rect,
            border_width: OVERLAY_BORDER_WIDTH,
            color: OVERLAY_COLOR,
        }
    }
}

/// Apply the detection limits to raw detector output.
///
/// Keeps observations whose confidence is at least `min_confidence` (no
/// confidence counts as passing) and whose view-space rectangle is at least
/// `min_size` on both sides, most confident first, at most
/// `max_observations` of them. Equal confidences keep detector order.
pub fn filter_observations(
    observations: Vec<Observation>,
    extents: ViewExtents,
    config: &DetectionConfig,
) -> Vec<Observation> {
    let mut kept: Vec<Observation> = observations
        .into_iter()
        .filter(|o| o.confidence.map_or(true, |c| c >= config.min_confidence))
        .filter(|o| {
            let rect = transform_rect(o.bounding_box, extents);
            rect.width >= config.min_size && rect.height >= config.min_size
        })
        .collect();

    kept.sort_by(|a, b| {
        let ca = a.confidence.unwrap_or(f32::INFINITY);
        let cb = b.confidence.unwrap_or(f32::INFINITY);
        cb.total_cmp(&ca)
    });
    kept.truncate(config.max_observations);
    kept
}

/// Overlays for a set of observations on a view of the given extents.
pub fn overlays_for(observations: &[Observation], extents: ViewExtents) -> Vec<Overlay> {
    observations
        .iter()
        .map(|o| Overlay::highlight(transform_rect(o.bounding_box, extents)))
        .collect()
}
