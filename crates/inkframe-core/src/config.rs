//! Runtime settings stored as TOML.
//!
//! ```toml
//! [digit]
//! sample_size = 28
//! stroke_width = 8.0
//! filter = "bilinear"
//!
//! [detection]
//! min_confidence = 0.25
//! max_observations = 10
//! min_size = 5.0
//! frame_queue_capacity = 1
//! classify_regions = true
//! ```
//!
//! Missing sections and fields fall back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bitmap::FilterType;
use crate::canvas::DEFAULT_STROKE_WIDTH;
use crate::preprocess::DEFAULT_SAMPLE_SIZE;

/// Errors reading or writing a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// All Inkframe settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InkframeConfig {
    /// Handwritten digit settings
    pub digit: DigitConfig,
    /// Camera rectangle detection settings
    pub detection: DetectionConfig,
}

/// Handwritten digit settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigitConfig {
    /// Edge length of the square model input
    pub sample_size: u32,
    /// Canvas stroke width in points
    pub stroke_width: f64,
    /// Resampling filter used when scaling drawings
    pub filter: FilterType,
}

impl Default for DigitConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            stroke_width: DEFAULT_STROKE_WIDTH,
            filter: FilterType::default(),
        }
    }
}

/// Camera rectangle detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Observations below this confidence are discarded
    pub min_confidence: f32,
    /// Upper bound on observations kept per frame
    pub max_observations: usize,
    /// Minimum side length in view points
    pub min_size: f64,
    /// Frames waiting for the worker before new ones are dropped
    pub frame_queue_capacity: usize,
    /// Crop detected regions and send them to the region classifier
    pub classify_regions: bool,
    /// UI updates waiting to be drained before new ones are dropped
    pub ui_queue_capacity: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.25,
            max_observations: 10,
            min_size: 5.0,
            frame_queue_capacity: 1,
            classify_regions: true,
            ui_queue_capacity: 64,
        }
    }
}

impl InkframeConfig {
    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Render settings as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write settings to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}
