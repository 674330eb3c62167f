//! Dense pixel buffers handed to classifiers.
//!
//! A [`PixelBuffer`] is the hand-off format between the preprocessing
//! pipeline and a model: row-major, top-down, 8 bits per channel, with
//! explicit width, height and stride. Single-channel sources become
//! one-component buffers; everything else becomes 32-bit ARGB.
//!
//! A [`Sample`] is a one-component buffer whose shape has been checked
//! against the model's input dimensions.

use serde::{Deserialize, Serialize};

use crate::bitmap::{Bitmap, PixelFormat, RowOrder};
use crate::error::{MalformedInput, Result};
use crate::luminance::{composite_over, pixel_alpha, pixel_luminance};
use crate::transform::normalize_orientation;

/// Background that translucent single-channel pixels are flattened onto.
/// Transparent canvas areas read as white paper.
const PAPER: u8 = 255;

/// Channel layout of a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BufferFormat {
    /// One 8-bit luminance channel.
    OneComponent8,
    /// Four 8-bit channels in A, R, G, B order, straight alpha.
    Argb32,
}

impl BufferFormat {
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            BufferFormat::OneComponent8 => 1,
            BufferFormat::Argb32 => 4,
        }
    }
}

/// A row-major, top-down pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: BufferFormat,
    stride: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn format(&self) -> BufferFormat {
        self.format
    }

    /// Bytes between the start of consecutive rows.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw buffer contents.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The `y`-th row, top-down, without padding.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize * self.format.channels()]
    }

    /// Check the buffer against a model's input shape.
    ///
    /// # Errors
    ///
    /// Returns `MalformedInput::SampleShape` unless the buffer is
    /// one-component and exactly `width` x `height`.
    pub fn into_sample(self, width: u32, height: u32) -> Result<Sample> {
        if self.format != BufferFormat::OneComponent8 || self.width != width || self.height != height
        {
            return Err(MalformedInput::SampleShape {
                expected_width: width,
                expected_height: height,
                width: self.width,
                height: self.height,
                channels: self.format.channels(),
            }
            .into());
        }
        Ok(Sample { buffer: self })
    }

    /// Convert back into a displayable bitmap (`Gray8` or `Rgba8`).
    pub fn to_bitmap(&self) -> Result<Bitmap> {
        match self.format {
            BufferFormat::OneComponent8 => Bitmap::with_stride(
                self.width,
                self.height,
                PixelFormat::Gray8,
                self.stride,
                self.data.clone(),
            ),
            BufferFormat::Argb32 => {
                let mut rgba = Vec::with_capacity(self.width as usize * self.height as usize * 4);
                for y in 0..self.height {
                    for px in self.row(y).chunks_exact(4) {
                        rgba.extend_from_slice(&[px[1], px[2], px[3], px[0]]);
                    }
                }
                Bitmap::new(self.width, self.height, PixelFormat::Rgba8, rgba)
            }
        }
    }
}

/// A single-channel buffer with exactly the dimensions a model requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    buffer: PixelBuffer,
}

impl Sample {
    #[inline]
    pub fn width(&self) -> u32 {
        self.buffer.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.buffer.height
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.buffer.stride
    }

    /// Raw bytes, `stride` bytes per row.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.buffer.data
    }

    /// Luminance at (x, y), origin top-left.
    #[inline]
    pub fn value(&self, x: u32, y: u32) -> u8 {
        self.buffer.data[y as usize * self.buffer.stride + x as usize]
    }

    /// Values scaled to 0.0..=1.0, row-major without padding.
    pub fn to_normalized(&self) -> Vec<f32> {
        (0..self.height())
            .flat_map(|y| self.buffer.row(y).iter().map(|&v| v as f32 / 255.0))
            .collect()
    }

    /// The underlying buffer.
    pub fn as_buffer(&self) -> &PixelBuffer {
        &self.buffer
    }
}

/// Extract a dense, top-down pixel buffer from a bitmap.
///
/// Orientation is applied first. Bottom-up bitmaps are flipped so the first
/// buffer row is the top of the image; top-down bitmaps are copied in order.
///
/// Gray, gray+alpha and alpha-only bitmaps produce a one-component buffer
/// with translucent pixels flattened onto white. Color bitmaps produce ARGB.
pub fn extract_pixel_buffer(bitmap: &Bitmap) -> PixelBuffer {
    let upright = normalize_orientation(bitmap);
    let source = upright.format();
    let format = if source.is_single_channel() {
        BufferFormat::OneComponent8
    } else {
        BufferFormat::Argb32
    };

    let (width, height) = upright.dimensions();
    let stride = width as usize * format.channels();
    let bpp = upright.bytes_per_pixel();
    let mut data = Vec::with_capacity(stride * height as usize);

    let rows: Box<dyn Iterator<Item = u32>> = match upright.row_order() {
        RowOrder::TopDown => Box::new(0..height),
        RowOrder::BottomUp => Box::new((0..height).rev()),
    };

    for y in rows {
        for px in upright.row(y).chunks_exact(bpp) {
            let alpha = pixel_alpha(source, px);
            match format {
                BufferFormat::OneComponent8 => {
                    data.push(composite_over(pixel_luminance(source, px), alpha, PAPER));
                }
                BufferFormat::Argb32 => data.extend_from_slice(&[alpha, px[0], px[1], px[2]]),
            }
        }
    }

    PixelBuffer {
        width,
        height,
        format,
        stride,
        data,
    }
}
