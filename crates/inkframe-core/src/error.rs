//! Error types shared across the preprocessing, inference and capture paths.
//!
//! Errors fall into three categories:
//! - **ResourceUnavailable**: a camera, model or session is missing or not ready
//! - **MalformedInput**: the caller handed us geometry or pixel data we cannot use
//! - **InferenceFailure**: a model failed or produced no usable output
//!
//! None of these are fatal. Callers convert them into a visible UI state at the
//! boundary nearest the user action.

use thiserror::Error;

/// Top-level error for Inkframe operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A camera, model or session is absent, not configured or not permitted.
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// Input geometry or pixel data is invalid.
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] MalformedInput),

    /// A model raised an error or returned nothing usable.
    #[error("Inference failed: {0}")]
    InferenceFailure(String),
}

/// Specific ways input data can be invalid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedInput {
    /// The requested region does not fit inside the source bitmap.
    #[error(
        "Region {width}x{height} at ({x}, {y}) exceeds source bounds {source_width}x{source_height}"
    )]
    OutOfBounds {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        source_width: f64,
        source_height: f64,
    },

    /// Resize ratio was zero, negative or not finite.
    #[error("Invalid resize ratio: {0} (must be positive and finite)")]
    InvalidRatio(f64),

    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel data is shorter than the dimensions and stride require.
    #[error("Invalid pixel data: expected at least {expected} bytes, got {actual}")]
    PixelDataMismatch { expected: usize, actual: usize },

    /// Row stride cannot hold a full row of pixels.
    #[error("Invalid stride: {stride} bytes per row is less than the {row_bytes} bytes a row needs")]
    InvalidStride { stride: usize, row_bytes: usize },

    /// The byte size of a `width` x `height` buffer with `stride` bytes per
    /// row does not fit in memory.
    #[error("Buffer of {width}x{height} pixels with a {stride}-byte stride is too large")]
    TooLarge { width: u32, height: u32, stride: usize },

    /// A pixel buffer does not have the shape a model expects.
    #[error(
        "Sample must be a {expected_width}x{expected_height} single-channel buffer, got {width}x{height} with {channels} channel(s)"
    )]
    SampleShape {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
        channels: usize,
    },

    /// Bytes could not be decoded as an image.
    #[error("Invalid or unsupported image format: {0}")]
    UnsupportedFormat(String),
}

/// Result alias for Inkframe operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns true if this error came from invalid input rather than a
    /// missing resource or a model failure.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Error::MalformedInput(_))
    }
}
