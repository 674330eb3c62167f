//! Inkframe Core - image preprocessing and frame processing library
//!
//! This crate provides the platform-independent half of two camera and
//! handwriting demos: a touch canvas that renders strokes, the chain that
//! turns a drawing into a fixed-size classifier sample, and the frame
//! pipeline that detects rectangles in camera frames, classifies them and
//! lays out highlight overlays.
//!
//! Models are not included. Plug them in through [`Classifier`],
//! [`RegionClassifier`] and [`Detector`].

pub mod bitmap;
pub mod buffer;
pub mod canvas;
pub mod capture;
pub mod classify;
pub mod config;
pub mod detect;
pub mod error;
pub mod geometry;
pub mod luminance;
pub mod preprocess;
pub mod transform;

pub use bitmap::{decode_bitmap, frame_to_bitmap, Bitmap, CameraFrame, FilterType, Orientation, PixelFormat};
pub use buffer::{extract_pixel_buffer, BufferFormat, PixelBuffer, Sample};
pub use canvas::{Segment, TouchCanvas, TouchPhase};
pub use capture::{CaptureSession, FramePipeline, FrameSender, UiUpdate};
pub use classify::{argmax, Classification, Classifier, DigitRecognizer, Prediction, PredictionOutcome, RegionClassifier};
pub use config::{ConfigError, DetectionConfig, DigitConfig, InkframeConfig};
pub use detect::{Detector, Observation, Overlay};
pub use error::{Error, MalformedInput, Result};
pub use geometry::{transform_rect, NormalizedRect, PixelRect, Point, ViewExtents, ViewRect};
pub use preprocess::prepare_sample;
