use tracing::{debug, warn};

use super::UiUpdate;
use crate::bitmap::{frame_to_bitmap, Bitmap, CameraFrame};
use crate::classify::{classification_text, RegionClassifier};
use crate::config::DetectionConfig;
use crate::detect::{filter_observations, overlays_for, Detector, Observation};
use crate::error::Result;
use crate::geometry::{transform_rect, ViewExtents};
use crate::transform::{crop_pixels, normalize_orientation};

/// Everything that happens to one camera frame: conversion, rectangle
/// detection, optional per-region classification and overlay layout.
///
/// Owned by the capture worker; nothing else touches it while frames flow.
pub struct FramePipeline {
    config: DetectionConfig,
    detector: Option<Box<dyn Detector + Send>>,
    region_classifier: Option<Box<dyn RegionClassifier + Send>>,
    view_extents: Option<ViewExtents>,
}

impl FramePipeline {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            config,
            detector: None,
            region_classifier: None,
            view_extents: None,
        }
    }

    pub fn with_detector(mut self, detector: Box<dyn Detector + Send>) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn with_region_classifier(mut self, classifier: Box<dyn RegionClassifier + Send>) -> Self {
        self.region_classifier = Some(classifier);
        self
    }

    /// Size of the preview view overlays are laid out in. Defaults to the
    /// upright frame size.
    pub fn with_view_extents(mut self, extents: ViewExtents) -> Self {
        self.view_extents = Some(extents);
        self
    }

    #[inline]
    pub fn has_detector(&self) -> bool {
        self.detector.is_some()
    }

    #[inline]
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Run one frame through the pipeline and return the UI updates it
    /// produces, in display order.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` for an unusable frame and the detector's
    /// error if detection fails. Region classification failures are logged
    /// and skipped.
    pub fn process(&mut self, frame: &CameraFrame) -> Result<Vec<UiUpdate>> {
        let preview = normalize_orientation(&frame_to_bitmap(frame)?);
        let (preview_w, preview_h) = preview.logical_size();
        let preview_extents = ViewExtents::new(preview_w, preview_h);
        let view = self.view_extents.unwrap_or(preview_extents);

        let Some(detector) = self.detector.as_mut() else {
            return Ok(Vec::new());
        };
        let detected = detector.detect(&preview)?;
        let total = detected.len();
        let kept = filter_observations(detected, view, &self.config);
        debug!(total, kept = kept.len(), "rectangles detected");

        let mut updates = vec![UiUpdate::ClearLabel];
        if self.config.classify_regions {
            updates.extend(self.classify_regions(&preview, preview_extents, &kept));
        }
        updates.push(UiUpdate::Overlays(overlays_for(&kept, view)));
        Ok(updates)
    }

    fn classify_regions(
        &mut self,
        preview: &Bitmap,
        extents: ViewExtents,
        observations: &[Observation],
    ) -> Vec<UiUpdate> {
        let Some(classifier) = self.region_classifier.as_mut() else {
            return Vec::new();
        };

        let mut labels = Vec::new();
        for observation in observations {
            let rect = transform_rect(observation.bounding_box, extents).scaled(preview.scale());
            let Some(region) = rect.to_pixel_rect(preview.width(), preview.height()) else {
                debug!(?rect, "detected region lies outside the frame");
                continue;
            };

            let result = crop_pixels(preview, region).and_then(|crop| classifier.classify_region(&crop));
            match result {
                Ok(results) if results.is_empty() => debug!(?region, "region classifier returned nothing"),
                Ok(results) => labels.push(UiUpdate::Label(classification_text(&results))),
                Err(e) => warn!(error = %e, ?region, "region classification failed"),
            }
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classification;
    use crate::error::Error;
    use crate::geometry::{NormalizedRect, ViewRect};

    struct FixedDetector(Vec<Observation>);

    impl Detector for FixedDetector {
        fn detect(&mut self, _frame: &Bitmap) -> Result<Vec<Observation>> {
            Ok(self.0.clone())
        }
    }

    /// Labels every region with its pixel size.
    struct SizeLabeler;

    impl RegionClassifier for SizeLabeler {
        fn classify_region(&mut self, region: &Bitmap) -> Result<Vec<Classification>> {
            let (w, h) = region.dimensions();
            Ok(vec![Classification::new(format!("{}x{}", w, h), 0.5)])
        }
    }

    struct FailingLabeler;

    impl RegionClassifier for FailingLabeler {
        fn classify_region(&mut self, _region: &Bitmap) -> Result<Vec<Classification>> {
            Err(Error::InferenceFailure("no model".into()))
        }
    }

    fn frame(width: u32, height: u32) -> CameraFrame {
        CameraFrame::new(vec![255; (width * height * 4) as usize], width, height)
    }

    fn centered_box() -> Observation {
        Observation::new(NormalizedRect::new(0.25, 0.25, 0.5, 0.5), Some(0.9))
    }

    #[test]
    fn test_overlays_and_labels() {
        let mut pipeline = FramePipeline::new(DetectionConfig::default())
            .with_detector(Box::new(FixedDetector(vec![centered_box()])))
            .with_region_classifier(Box::new(SizeLabeler));

        let updates = pipeline.process(&frame(200, 100)).unwrap();

        assert_eq!(
            updates,
            vec![
                UiUpdate::ClearLabel,
                UiUpdate::Label("50% it's 100x50".to_string()),
                UiUpdate::Overlays(vec![crate::detect::Overlay::highlight(ViewRect::new(
                    50.0, 25.0, 100.0, 50.0
                ))]),
            ]
        );
    }

    #[test]
    fn test_overlays_use_view_extents() {
        let mut pipeline = FramePipeline::new(DetectionConfig::default())
            .with_detector(Box::new(FixedDetector(vec![centered_box()])))
            .with_view_extents(ViewExtents::new(400.0, 200.0));

        let updates = pipeline.process(&frame(200, 100)).unwrap();
        let Some(UiUpdate::Overlays(overlays)) = updates.last() else {
            panic!("expected overlays last, got {:?}", updates);
        };
        assert_eq!(overlays[0].rect, ViewRect::new(100.0, 50.0, 200.0, 100.0));
    }

    #[test]
    fn test_frame_orientation_applied_before_detection() {
        let mut pipeline = FramePipeline::new(DetectionConfig::default())
            .with_detector(Box::new(FixedDetector(vec![Observation::new(
                NormalizedRect::new(0.0, 0.0, 1.0, 1.0),
                None,
            )])))
            .with_region_classifier(Box::new(SizeLabeler));

        let rotated = frame(200, 100).with_orientation(crate::bitmap::Orientation::Rotate90CW);
        let updates = pipeline.process(&rotated).unwrap();

        assert!(updates.contains(&UiUpdate::Label("50% it's 100x200".to_string())));
    }

    #[test]
    fn test_region_failures_are_skipped() {
        let mut pipeline = FramePipeline::new(DetectionConfig::default())
            .with_detector(Box::new(FixedDetector(vec![centered_box()])))
            .with_region_classifier(Box::new(FailingLabeler));

        let updates = pipeline.process(&frame(200, 100)).unwrap();
        assert_eq!(updates.len(), 2);
        assert!(matches!(updates[1], UiUpdate::Overlays(ref o) if o.len() == 1));
    }

    #[test]
    fn test_region_classification_can_be_disabled() {
        let config = DetectionConfig {
            classify_regions: false,
            ..DetectionConfig::default()
        };
        let mut pipeline = FramePipeline::new(config)
            .with_detector(Box::new(FixedDetector(vec![centered_box()])))
            .with_region_classifier(Box::new(SizeLabeler));

        let updates = pipeline.process(&frame(200, 100)).unwrap();
        assert!(!updates.iter().any(|u| matches!(u, UiUpdate::Label(_))));
    }

    #[test]
    fn test_bad_frame_is_malformed_input() {
        let mut pipeline = FramePipeline::new(DetectionConfig::default())
            .with_detector(Box::new(FixedDetector(vec![])));
        let bad = CameraFrame::new(vec![0; 10], 200, 100);

        assert!(pipeline.process(&bad).unwrap_err().is_malformed_input());
    }

    #[test]
    fn test_out_of_frame_region_is_skipped() {
        let outside = Observation::new(NormalizedRect::new(1.5, 0.0, 0.5, 0.5), Some(1.0));
        let mut pipeline = FramePipeline::new(DetectionConfig::default())
            .with_detector(Box::new(FixedDetector(vec![outside])))
            .with_region_classifier(Box::new(SizeLabeler));

        let updates = pipeline.process(&frame(20, 20)).unwrap();
        assert!(!updates.iter().any(|u| matches!(u, UiUpdate::Label(_))));
    }
}
