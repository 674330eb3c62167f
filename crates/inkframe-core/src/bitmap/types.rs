//! Core bitmap types.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::{MalformedInput, Result};

/// Layout of a single pixel. Every format uses 8 bits per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    /// Red, green, blue.
    Rgb8,
    /// Red, green, blue, straight (non-premultiplied) alpha.
    Rgba8,
    /// Single luminance channel.
    Gray8,
    /// Luminance followed by alpha.
    GrayAlpha8,
    /// Alpha (coverage) only.
    Alpha8,
}

impl PixelFormat {
    /// Number of bytes used by one pixel.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
            PixelFormat::Gray8 => 1,
            PixelFormat::GrayAlpha8 => 2,
            PixelFormat::Alpha8 => 1,
        }
    }

    /// True for the formats that carry a single luminance/coverage plane
    /// (plus optional alpha) rather than color.
    #[inline]
    pub fn is_single_channel(self) -> bool {
        matches!(
            self,
            PixelFormat::Gray8 | PixelFormat::GrayAlpha8 | PixelFormat::Alpha8
        )
    }

    /// True if the format stores an alpha component.
    #[inline]
    pub fn has_alpha(self) -> bool {
        matches!(
            self,
            PixelFormat::Rgba8 | PixelFormat::GrayAlpha8 | PixelFormat::Alpha8
        )
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
///
/// The tag describes how stored pixels must be transformed to appear upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Upright, no transformation needed.
    #[default]
    Up = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl Orientation {
    /// Returns true if this orientation swaps width and height dimensions.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Up,
        }
    }
}

/// Order in which rows are stored in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RowOrder {
    /// First stored row is the top of the image.
    #[default]
    TopDown,
    /// First stored row is the bottom of the image (Y axis points up).
    BottomUp,
}

/// Filter type for resampling operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, blocky).
    Nearest,
    /// Bilinear interpolation (fast, smooth).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, sharpest).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Bytes needed for `height` rows `stride` apart, where the last row holds
/// only `row_bytes` and needs no trailing padding. `None` on overflow.
pub(crate) fn buffer_len(stride: usize, height: u32, row_bytes: usize) -> Option<usize> {
    stride
        .checked_mul((height as usize).saturating_sub(1))?
        .checked_add(row_bytes)
}

/// An immutable grid of 8-bit pixels.
///
/// Rows may be padded: `stride` is the number of bytes between the start of
/// consecutive rows and can exceed `width * bytes_per_pixel`. Every transform
/// in this crate returns a new `Bitmap`.
///
/// `scale` is the pixel density: logical size in points is the pixel size
/// divided by `scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    format: PixelFormat,
    stride: usize,
    orientation: Orientation,
    row_order: RowOrder,
    scale: f64,
    pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a bitmap from densely packed rows.
    pub fn new(width: u32, height: u32, format: PixelFormat, pixels: Vec<u8>) -> Result<Self> {
        let stride = width as usize * format.bytes_per_pixel();
        Self::with_stride(width, height, format, stride, pixels)
    }

    /// Create a bitmap whose rows are `stride` bytes apart.
    pub fn with_stride(
        width: u32,
        height: u32,
        format: PixelFormat,
        stride: usize,
        pixels: Vec<u8>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MalformedInput::InvalidDimensions { width, height }.into());
        }

        let too_large = MalformedInput::TooLarge {
            width,
            height,
            stride,
        };
        let row_bytes = (width as usize)
            .checked_mul(format.bytes_per_pixel())
            .ok_or_else(|| too_large.clone())?;
        if stride < row_bytes {
            return Err(MalformedInput::InvalidStride { stride, row_bytes }.into());
        }

        let expected = buffer_len(stride, height, row_bytes).ok_or(too_large)?;
        if pixels.len() < expected {
            return Err(MalformedInput::PixelDataMismatch {
                expected,
                actual: pixels.len(),
            }
            .into());
        }

        Ok(Self {
            width,
            height,
            format,
            stride,
            orientation: Orientation::Up,
            row_order: RowOrder::TopDown,
            scale: 1.0,
            pixels,
        })
    }

    /// Create a bitmap filled with a single pixel value.
    ///
    /// `value` must have exactly `format.bytes_per_pixel()` components.
    pub fn solid(width: u32, height: u32, format: PixelFormat, value: &[u8]) -> Result<Self> {
        if value.len() != format.bytes_per_pixel() {
            return Err(MalformedInput::PixelDataMismatch {
                expected: format.bytes_per_pixel(),
                actual: value.len(),
            }
            .into());
        }
        let count = width as usize * height as usize;
        Self::new(width, height, format, value.repeat(count))
    }

    /// Tag the bitmap with an orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Tag the bitmap with a row order.
    pub fn with_row_order(mut self, row_order: RowOrder) -> Self {
        self.row_order = row_order;
        self
    }

    /// Set the pixel density. Non-positive or non-finite values fall back to 1.0.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        self
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// (width, height) in pixels.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes between the start of consecutive rows.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[inline]
    pub fn row_order(&self) -> RowOrder {
        self.row_order
    }

    /// Pixel density (pixels per logical point).
    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Bytes used by one pixel.
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Logical size in points once the orientation is applied.
    pub fn logical_size(&self) -> (f64, f64) {
        let (w, h) = if self.orientation.swaps_dimensions() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        };
        (w as f64 / self.scale, h as f64 / self.scale)
    }

    /// Raw storage, including any row padding.
    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    /// The `y`-th stored row without padding.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.pixels[start..start + self.width as usize * self.bytes_per_pixel()]
    }

    /// Iterate stored rows without padding, in storage order.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.height).map(move |y| self.row(y))
    }

    /// Components of the stored pixel at (x, y).
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let bpp = self.bytes_per_pixel();
        let start = y as usize * self.stride + x as usize * bpp;
        &self.pixels[start..start + bpp]
    }

    /// Pixel data with row padding removed.
    pub fn to_dense(&self) -> Vec<u8> {
        let row_bytes = self.width as usize * self.bytes_per_pixel();
        if self.stride == row_bytes {
            return self.pixels[..row_bytes * self.height as usize].to_vec();
        }
        let mut dense = Vec::with_capacity(row_bytes * self.height as usize);
        for row in self.rows() {
            dense.extend_from_slice(row);
        }
        dense
    }

    /// Rebuild a bitmap from dense pixel data, keeping this bitmap's tags.
    pub(crate) fn derive(
        &self,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
    ) -> Result<Self> {
        Ok(Self::new(width, height, format, pixels)?
            .with_orientation(self.orientation)
            .with_row_order(self.row_order)
            .with_scale(self.scale))
    }

    /// True if every pixel is fully transparent (formats with alpha) or the
    /// bitmap holds no visible content.
    pub fn is_blank(&self) -> bool {
        if !self.format.has_alpha() {
            return false;
        }
        let bpp = self.bytes_per_pixel();
        self.rows()
            .all(|row| row.chunks_exact(bpp).all(|px| px[bpp - 1] == 0))
    }

    /// Convert to an RGBA image, expanding gray and alpha-only formats.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for row in self.rows() {
            match self.format {
                PixelFormat::Rgba8 => out.extend_from_slice(row),
                PixelFormat::Rgb8 => {
                    for px in row.chunks_exact(3) {
                        out.extend_from_slice(&[px[0], px[1], px[2], 255]);
                    }
                }
                PixelFormat::Gray8 => {
                    for &v in row {
                        out.extend_from_slice(&[v, v, v, 255]);
                    }
                }
                PixelFormat::GrayAlpha8 => {
                    for px in row.chunks_exact(2) {
                        out.extend_from_slice(&[px[0], px[0], px[0], px[1]]);
                    }
                }
                PixelFormat::Alpha8 => {
                    for &a in row {
                        out.extend_from_slice(&[0, 0, 0, a]);
                    }
                }
            }
        }
        // Dimensions and length match by construction.
        RgbaImage::from_raw(self.width, self.height, out)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    /// Create an upright RGBA bitmap from an image crate buffer.
    pub fn from_rgba_image(img: RgbaImage) -> Result<Self> {
        let (width, height) = img.dimensions();
        Self::new(width, height, PixelFormat::Rgba8, img.into_raw())
    }
}
