//! Classifier seams and digit recognition.
//!
//! Models are external: a [`Classifier`] scores a prepared [`Sample`], a
//! [`RegionClassifier`] labels a cropped camera region. This module owns the
//! glue around them: arg-max selection, display text, and the
//! [`DigitRecognizer`] that runs a canvas drawing through preprocessing and a
//! digit model.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bitmap::{Bitmap, FilterType};
use crate::buffer::Sample;
use crate::canvas::TouchCanvas;
use crate::config::DigitConfig;
use crate::error::{Error, Result};
use crate::preprocess::prepare_sample;

/// A model that scores a fixed-size grayscale sample.
///
/// Returns one score per class, in class-index order.
pub trait Classifier {
    fn classify(&mut self, sample: &Sample) -> Result<Vec<f64>>;
}

/// A model that labels an arbitrary color region.
pub trait RegionClassifier {
    fn classify_region(&mut self, region: &Bitmap) -> Result<Vec<Classification>>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn classify(&mut self, sample: &Sample) -> Result<Vec<f64>> {
        (**self).classify(sample)
    }
}

impl<C: RegionClassifier + ?Sized> RegionClassifier for Box<C> {
    fn classify_region(&mut self, region: &Bitmap) -> Result<Vec<Classification>> {
        (**self).classify_region(region)
    }
}

/// A labelled confidence from a region classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

impl Classification {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    /// `"{percent}% it's {label}"`, percent truncated to an integer.
    pub fn label_text(&self) -> String {
        format!("{}% it's {}", (self.confidence * 100.0) as i32, self.label)
    }
}

/// Index and value of the highest score.
///
/// Ties go to the later index. NaN scores are never selected. Returns
/// `None` when there is no comparable score.
pub fn argmax(scores: &[f64]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, value)) if score < value => {}
            _ => best = Some((i, score)),
        }
    }
    best
}

/// Display text for the two most confident classifications, one per line.
pub fn classification_text(results: &[Classification]) -> String {
    let mut ranked: Vec<&Classification> = results.iter().collect();
    ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    ranked
        .iter()
        .take(2)
        .map(|c| c.label_text())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The recognized digit and its score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub digit: usize,
    pub confidence: f64,
}

impl Prediction {
    /// `"{digit}: {percent:.2}%"`
    pub fn label_text(&self) -> String {
        format!("{}: {:.2}%", self.digit, self.confidence * 100.0)
    }
}

/// What a prediction request produced, for display.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    Prediction(Prediction),
    /// Nothing has been drawn yet.
    NoDrawing,
    /// Preprocessing or inference failed; the message is for logs.
    Failed(String),
}

impl PredictionOutcome {
    /// Label text to show, if any.
    pub fn label_text(&self) -> Option<String> {
        match self {
            PredictionOutcome::Prediction(p) => Some(p.label_text()),
            PredictionOutcome::NoDrawing | PredictionOutcome::Failed(_) => None,
        }
    }
}

/// Runs drawings through preprocessing and a digit classifier.
pub struct DigitRecognizer<C> {
    classifier: C,
    sample_size: u32,
    filter: FilterType,
}

impl<C: Classifier> DigitRecognizer<C> {
    pub fn new(classifier: C) -> Self {
        Self::with_config(classifier, &DigitConfig::default())
    }

    pub fn with_config(classifier: C, config: &DigitConfig) -> Self {
        Self {
            classifier,
            sample_size: config.sample_size,
            filter: config.filter,
        }
    }

    #[inline]
    pub fn sample_size(&self) -> u32 {
        self.sample_size
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Classify an arbitrary bitmap.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput` if the bitmap cannot be prepared, the
    /// classifier's error if inference fails, and `InferenceFailure` if the
    /// classifier returns no usable score.
    pub fn recognize(&mut self, bitmap: &Bitmap) -> Result<Prediction> {
        let sample = prepare_sample(bitmap, self.sample_size, self.filter)?;
        let scores = self.classifier.classify(&sample)?;
        let (digit, confidence) = argmax(&scores)
            .ok_or_else(|| Error::InferenceFailure("classifier returned no scores".to_string()))?;

        debug!(digit, confidence, classes = scores.len(), "digit recognized");
        Ok(Prediction { digit, confidence })
    }

    /// Classify whatever is currently drawn on `canvas`.
    pub fn predict(&mut self, canvas: &TouchCanvas) -> PredictionOutcome {
        let Some(drawing) = canvas.snapshot() else {
            debug!("prediction requested before anything was drawn");
            return PredictionOutcome::NoDrawing;
        };

        match self.recognize(&drawing) {
            Ok(prediction) => PredictionOutcome::Prediction(prediction),
            Err(e) => {
                warn!(error = %e, "digit prediction failed");
                PredictionOutcome::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::PixelFormat;
    use crate::geometry::Point;

    /// Returns fixed scores and remembers the last sample it saw.
    struct FixedScores {
        scores: Vec<f64>,
        seen: Option<(u32, u32)>,
    }

    impl FixedScores {
        fn new(scores: Vec<f64>) -> Self {
            Self { scores, seen: None }
        }
    }

    impl Classifier for FixedScores {
        fn classify(&mut self, sample: &Sample) -> Result<Vec<f64>> {
            self.seen = Some((sample.width(), sample.height()));
            Ok(self.scores.clone())
        }
    }

    struct Broken;

    impl Classifier for Broken {
        fn classify(&mut self, _sample: &Sample) -> Result<Vec<f64>> {
            Err(Error::InferenceFailure("model not loaded".into()))
        }
    }

    fn drawn_canvas() -> TouchCanvas {
        let mut canvas = TouchCanvas::new(100.0, 100.0);
        canvas.touches_began(&[Point::new(50.0, 10.0)]);
        canvas.touches_ended(&[Point::new(50.0, 90.0)]);
        canvas
    }

    #[test]
    fn test_argmax_picks_highest() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some((1, 0.7)));
    }

    #[test]
    fn test_argmax_tie_goes_to_later_index() {
        assert_eq!(argmax(&[0.4, 0.1, 0.4]), Some((2, 0.4)));
    }

    #[test]
    fn test_argmax_empty_and_nan() {
        assert_eq!(argmax(&[]), None);
        assert_eq!(argmax(&[f64::NAN]), None);
        assert_eq!(argmax(&[f64::NAN, -3.0, f64::NAN]), Some((1, -3.0)));
    }

    #[test]
    fn test_argmax_negative_scores() {
        assert_eq!(argmax(&[-10_000.0, -20_000.0]), Some((0, -10_000.0)));
    }

    #[test]
    fn test_prediction_label_text() {
        let p = Prediction {
            digit: 7,
            confidence: 0.9876,
        };
        assert_eq!(p.label_text(), "7: 98.76%");
    }

    #[test]
    fn test_classification_text_top_two() {
        let results = vec![
            Classification::new("notebook", 0.125),
            Classification::new("envelope", 0.853),
            Classification::new("binder", 0.02),
        ];
        assert_eq!(
            classification_text(&results),
            "85% it's envelope\n12% it's notebook"
        );
    }

    #[test]
    fn test_classification_text_short_lists() {
        assert_eq!(classification_text(&[]), "");
        assert_eq!(
            classification_text(&[Classification::new("pen", 0.999)]),
            "99% it's pen"
        );
    }

    #[test]
    fn test_recognize_feeds_sample_of_model_size() {
        let mut scores = vec![0.0; 10];
        scores[3] = 0.9;
        let mut recognizer = DigitRecognizer::new(FixedScores::new(scores));

        let bmp = Bitmap::solid(60, 45, PixelFormat::Rgba8, &[0, 0, 0, 255]).unwrap();
        let prediction = recognizer.recognize(&bmp).unwrap();

        assert_eq!(prediction.digit, 3);
        assert_eq!(recognizer.classifier().seen, Some((28, 28)));
    }

    #[test]
    fn test_recognize_empty_scores_is_inference_failure() {
        let mut recognizer = DigitRecognizer::new(FixedScores::new(vec![]));
        let bmp = Bitmap::solid(28, 28, PixelFormat::Gray8, &[0]).unwrap();

        assert!(matches!(
            recognizer.recognize(&bmp),
            Err(Error::InferenceFailure(_))
        ));
    }

    #[test]
    fn test_predict_without_drawing() {
        let mut recognizer = DigitRecognizer::new(FixedScores::new(vec![1.0]));
        let canvas = TouchCanvas::new(100.0, 100.0);

        let outcome = recognizer.predict(&canvas);
        assert_eq!(outcome, PredictionOutcome::NoDrawing);
        assert_eq!(outcome.label_text(), None);
    }

    #[test]
    fn test_predict_drawing() {
        let mut recognizer = DigitRecognizer::new(FixedScores::new(vec![0.05, 0.95]));
        let outcome = recognizer.predict(&drawn_canvas());

        assert_eq!(outcome.label_text().as_deref(), Some("1: 95.00%"));
    }

    #[test]
    fn test_predict_failure_is_not_fatal() {
        let mut recognizer = DigitRecognizer::new(Broken);
        let outcome = recognizer.predict(&drawn_canvas());

        assert!(matches!(outcome, PredictionOutcome::Failed(_)));
        assert_eq!(outcome.label_text(), None);
    }

    #[test]
    fn test_custom_sample_size() {
        let config = DigitConfig {
            sample_size: 16,
            ..DigitConfig::default()
        };
        let mut recognizer = DigitRecognizer::with_config(FixedScores::new(vec![1.0]), &config);
        recognizer.predict(&drawn_canvas());

        assert_eq!(recognizer.classifier().seen, Some((16, 16)));
    }
}
