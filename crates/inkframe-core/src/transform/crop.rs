//! Cropping in logical points and in pixels.
//!
//! Crop regions are given in logical points with a top-left origin and are
//! converted to pixels using the bitmap's pixel density before extraction.
//! Cropping happens in upright space: tagged bitmaps are normalized first.
//!
//! # Example
//!
//! ```ignore
//! // 56x40 bitmap resized so the shorter side is 28, then the middle square
//! let square = center_crop(&resized, 28, 28)?;
//! ```

use super::normalize_orientation;
use crate::bitmap::Bitmap;
use crate::error::{MalformedInput, Result};
use crate::geometry::{snap, PixelRect, ViewRect};

/// Extract a `width` x `height` (logical points) region centered in `bitmap`.
///
/// The offset is `((W - width) / 2, (H - height) / 2)` rounded down, where
/// `W`/`H` are the logical dimensions.
///
/// # Errors
///
/// Returns `MalformedInput::OutOfBounds` if the target is larger than the
/// source in either dimension, and `MalformedInput::InvalidDimensions` for a
/// zero-sized target.
pub fn center_crop(bitmap: &Bitmap, width: u32, height: u32) -> Result<Bitmap> {
    if width == 0 || height == 0 {
        return Err(MalformedInput::InvalidDimensions { width, height }.into());
    }

    let upright = normalize_orientation(bitmap);
    let (src_w, src_h) = upright.logical_size();
    let (w, h) = (width as f64, height as f64);

    if w > snap(src_w) || h > snap(src_h) {
        return Err(out_of_bounds(0.0, 0.0, w, h, src_w, src_h));
    }

    let x = ((src_w - w) / 2.0).floor().max(0.0);
    let y = ((src_h - h) / 2.0).floor().max(0.0);

    crop_rect(&upright, ViewRect::new(x, y, w, h))
}

/// Extract a region given in logical points (top-left origin).
///
/// The region is scaled by the bitmap's pixel density and rounded outward
/// to whole pixels. The result keeps the source density.
///
/// # Errors
///
/// Returns `MalformedInput::OutOfBounds` if any part of the region lies
/// outside the bitmap.
pub fn crop_rect(bitmap: &Bitmap, rect: ViewRect) -> Result<Bitmap> {
    let upright = normalize_orientation(bitmap);
    let (src_w, src_h) = upright.logical_size();

    let pixels = rect.scaled(upright.scale());
    let (px_w, px_h) = upright.dimensions();

    let inside = rect.width > 0.0
        && rect.height > 0.0
        && snap(pixels.x) >= 0.0
        && snap(pixels.y) >= 0.0
        && snap(pixels.max_x()) <= px_w as f64
        && snap(pixels.max_y()) <= px_h as f64;

    let region = pixels
        .to_pixel_rect(px_w, px_h)
        .filter(|_| inside)
        .ok_or_else(|| out_of_bounds(rect.x, rect.y, rect.width, rect.height, src_w, src_h))?;

    crop_pixels(&upright, region)
}

/// Extract an exact pixel region. Orientation and density tags are kept.
///
/// # Errors
///
/// Returns `MalformedInput::OutOfBounds` if the region is empty or does not
/// fit inside the bitmap.
pub fn crop_pixels(bitmap: &Bitmap, region: PixelRect) -> Result<Bitmap> {
    let (src_w, src_h) = bitmap.dimensions();
    if !region.fits_within(src_w, src_h) {
        return Err(out_of_bounds(
            region.x as f64,
            region.y as f64,
            region.width as f64,
            region.height as f64,
            src_w as f64,
            src_h as f64,
        ));
    }

    // Fast path: full region
    if region == PixelRect::new(0, 0, src_w, src_h) {
        return Ok(bitmap.clone());
    }

    let bpp = bitmap.bytes_per_pixel();
    let row_bytes = region.width as usize * bpp;
    let mut output = Vec::with_capacity(row_bytes * region.height as usize);

    // Copy pixel data row by row
    for y in region.y..region.y + region.height {
        let start = region.x as usize * bpp;
        output.extend_from_slice(&bitmap.row(y)[start..start + row_bytes]);
    }

    bitmap.derive(region.width, region.height, bitmap.format(), output)
}

fn out_of_bounds(x: f64, y: f64, width: f64, height: f64, sw: f64, sh: f64) -> crate::Error {
    MalformedInput::OutOfBounds {
        x,
        y,
        width,
        height,
        source_width: sw,
        source_height: sh,
    }
    .into()
}


// ============================================================================
// Property-Based Tests
// ============================================================================
