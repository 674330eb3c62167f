//! Luminance and coverage of individual pixels using ITU-R BT.709 coefficients.
//!
//! Shared by the grayscale converter and the pixel-buffer extractor.

use crate::bitmap::PixelFormat;

/// ITU-R BT.709 coefficient for red channel in luminance calculation.
pub const LUMINANCE_R: f32 = 0.2126;

/// ITU-R BT.709 coefficient for green channel in luminance calculation.
pub const LUMINANCE_G: f32 = 0.7152;

/// ITU-R BT.709 coefficient for blue channel in luminance calculation.
pub const LUMINANCE_B: f32 = 0.0722;

/// Calculate luminance from u8 RGB values (0 to 255).
#[inline]
pub fn calculate_luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    let lum = LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32;
    lum.clamp(0.0, 255.0).round() as u8
}

/// Luminance of one pixel, ignoring alpha.
///
/// Alpha-only pixels have no color and read as black ink.
#[inline]
pub fn pixel_luminance(format: PixelFormat, px: &[u8]) -> u8 {
    match format {
        PixelFormat::Rgb8 | PixelFormat::Rgba8 => calculate_luminance_u8(px[0], px[1], px[2]),
        PixelFormat::Gray8 | PixelFormat::GrayAlpha8 => px[0],
        PixelFormat::Alpha8 => 0,
    }
}

/// Alpha (coverage) of one pixel. Formats without alpha are fully opaque.
#[inline]
pub fn pixel_alpha(format: PixelFormat, px: &[u8]) -> u8 {
    match format {
        PixelFormat::Rgba8 => px[3],
        PixelFormat::GrayAlpha8 => px[1],
        PixelFormat::Alpha8 => px[0],
        PixelFormat::Rgb8 | PixelFormat::Gray8 => 255,
    }
}

/// Composite a value with straight `alpha` over an opaque `background`.
#[inline]
pub fn composite_over(value: u8, alpha: u8, background: u8) -> u8 {
    let a = alpha as u32;
    ((value as u32 * a + background as u32 * (255 - a) + 127) / 255) as u8
}
