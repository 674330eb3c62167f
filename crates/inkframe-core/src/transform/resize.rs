//! Uniform-ratio resizing.
//!
//! Resizing works in logical points, the way drawing into a fresh 1x
//! graphics context does: the output is rendered upright at a pixel density
//! of 1.0, so its pixel dimensions equal the input's logical dimensions
//! times the ratio.

use image::{imageops, ImageBuffer, Luma, LumaA, Pixel, Rgb, Rgba};
use tracing::debug;

use super::normalize_orientation;
use crate::bitmap::{Bitmap, FilterType, PixelFormat};
use crate::error::{MalformedInput, Result};

/// Resize a bitmap by a single uniform scale factor.
///
/// Output dimensions are `round(logical_dimension * ratio)`, never less than
/// one pixel. The result is upright and has a pixel density of 1.0.
///
/// # Errors
///
/// Returns `MalformedInput::InvalidRatio` if `ratio` is zero, negative or
/// not finite, or if a scaled side does not fit in a `u32`. Returns
/// `MalformedInput::TooLarge` if the output buffer would not fit in memory.
pub fn resize_by_ratio(bitmap: &Bitmap, ratio: f64, filter: FilterType) -> Result<Bitmap> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(MalformedInput::InvalidRatio(ratio).into());
    }

    let (logical_w, logical_h) = bitmap.logical_size();
    let (width, height) =
        scaled_dimensions(logical_w, logical_h, ratio, bitmap.bytes_per_pixel())?;

    resize_to(bitmap, width, height, filter)
}

/// Ratio that brings the shorter logical side of `bitmap` to `target`.
pub fn shorter_side_ratio(bitmap: &Bitmap, target: u32) -> f64 {
    let (w, h) = bitmap.logical_size();
    target as f64 / w.min(h)
}

/// Resize to exact pixel dimensions after normalizing orientation.
fn resize_to(bitmap: &Bitmap, width: u32, height: u32, filter: FilterType) -> Result<Bitmap> {
    let upright = normalize_orientation(bitmap);

    // Fast path: same pixel dimensions at 1x, just drop the density tag
    if upright.dimensions() == (width, height) {
        return Ok(upright.with_scale(1.0));
    }

    debug!(
        from_width = upright.width(),
        from_height = upright.height(),
        width,
        height,
        ?filter,
        "resizing bitmap"
    );

    let pixels = match upright.format() {
        PixelFormat::Rgb8 => resample::<Rgb<u8>>(&upright, width, height, filter)?,
        PixelFormat::Rgba8 => resample::<Rgba<u8>>(&upright, width, height, filter)?,
        PixelFormat::Gray8 | PixelFormat::Alpha8 => {
            resample::<Luma<u8>>(&upright, width, height, filter)?
        }
        PixelFormat::GrayAlpha8 => resample::<LumaA<u8>>(&upright, width, height, filter)?,
    };

    Ok(upright.derive(width, height, upright.format(), pixels)?.with_scale(1.0))
}

/// Resample dense pixel data with the image crate's filters.
fn resample<P>(bitmap: &Bitmap, width: u32, height: u32, filter: FilterType) -> Result<Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let dense = bitmap.to_dense();
    let actual = dense.len();
    let source = ImageBuffer::<P, Vec<u8>>::from_raw(bitmap.width(), bitmap.height(), dense)
        .ok_or(MalformedInput::PixelDataMismatch {
            expected: bitmap.width() as usize
                * bitmap.height() as usize
                * bitmap.bytes_per_pixel(),
            actual,
        })?;

    Ok(imageops::resize(&source, width, height, filter.to_image_filter()).into_raw())
}

/// Scale logical dimensions, keeping at least one pixel on each side.
///
/// Fails if a side does not fit in a `u32` or the output buffer would not
/// fit in memory.
fn scaled_dimensions(width: f64, height: f64, ratio: f64, bpp: usize) -> Result<(u32, u32)> {
    let w = (width * ratio).round().max(1.0);
    let h = (height * ratio).round().max(1.0);
    if w > u32::MAX as f64 || h > u32::MAX as f64 {
        return Err(MalformedInput::InvalidRatio(ratio).into());
    }

    let (w, h) = (w as u32, h as u32);
    let stride = (w as usize).saturating_mul(bpp);
    let fits = stride
        .checked_mul(h as usize)
        .is_some_and(|len| len <= isize::MAX as usize);
    if !fits {
        return Err(MalformedInput::TooLarge {
            width: w,
            height: h,
            stride,
        }
        .into());
    }
    Ok((w, h))
}
