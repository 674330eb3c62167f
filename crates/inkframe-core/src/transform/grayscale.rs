//! Grayscale conversion that keeps stroke coverage.
//!
//! Conversion runs in three steps:
//! 1. [`luminance_plane`]: one 8-bit luminance channel, no alpha
//! 2. [`alpha_mask`]: one 8-bit alpha channel from the same source
//! 3. [`apply_mask`]: interleave the two into a grayscale+alpha bitmap
//!
//! Keeping alpha separate from luminance preserves anti-aliased stroke edges
//! that would otherwise be flattened into the gray values.

use crate::bitmap::{Bitmap, PixelFormat};
use crate::error::{MalformedInput, Result};
use crate::luminance::{pixel_alpha, pixel_luminance};

/// Convert any bitmap to grayscale+alpha.
///
/// Color is reduced to BT.709 luminance; the original alpha (or full opacity
/// for formats without alpha) is kept. Orientation and density tags carry
/// over unchanged.
pub fn to_grayscale(bitmap: &Bitmap) -> Result<Bitmap> {
    if bitmap.format() == PixelFormat::GrayAlpha8 {
        return Ok(bitmap.clone());
    }
    let gray = luminance_plane(bitmap)?;
    let mask = alpha_mask(bitmap)?;
    apply_mask(&gray, &mask)
}

/// Luminance of every pixel as a `Gray8` bitmap, alpha ignored.
pub fn luminance_plane(bitmap: &Bitmap) -> Result<Bitmap> {
    map_plane(bitmap, PixelFormat::Gray8, pixel_luminance)
}

/// Alpha of every pixel as an `Alpha8` bitmap.
pub fn alpha_mask(bitmap: &Bitmap) -> Result<Bitmap> {
    map_plane(bitmap, PixelFormat::Alpha8, pixel_alpha)
}

/// Combine a luminance plane with an alpha mask of the same size.
///
/// # Errors
///
/// Returns `MalformedInput::PixelDataMismatch` if the two bitmaps differ in
/// size, or `MalformedInput::UnsupportedFormat` if they are not `Gray8` and
/// `Alpha8` respectively.
pub fn apply_mask(gray: &Bitmap, mask: &Bitmap) -> Result<Bitmap> {
    if gray.format() != PixelFormat::Gray8 || mask.format() != PixelFormat::Alpha8 {
        return Err(MalformedInput::UnsupportedFormat(format!(
            "cannot mask {:?} with {:?}",
            gray.format(),
            mask.format()
        ))
        .into());
    }

    if gray.dimensions() != mask.dimensions() {
        return Err(MalformedInput::PixelDataMismatch {
            expected: gray.width() as usize * gray.height() as usize,
            actual: mask.width() as usize * mask.height() as usize,
        }
        .into());
    }

    let mut output = Vec::with_capacity(gray.width() as usize * gray.height() as usize * 2);
    for (lum_row, alpha_row) in gray.rows().zip(mask.rows()) {
        for (&lum, &alpha) in lum_row.iter().zip(alpha_row) {
            output.push(lum);
            output.push(alpha);
        }
    }

    gray.derive(gray.width(), gray.height(), PixelFormat::GrayAlpha8, output)
}

/// Reduce every pixel to one byte.
fn map_plane(bitmap: &Bitmap, format: PixelFormat, f: fn(PixelFormat, &[u8]) -> u8) -> Result<Bitmap> {
    let source = bitmap.format();
    let bpp = bitmap.bytes_per_pixel();
    let mut plane = Vec::with_capacity(bitmap.width() as usize * bitmap.height() as usize);

    for row in bitmap.rows() {
        plane.extend(row.chunks_exact(bpp).map(|px| f(source, px)));
    }

    bitmap.derive(bitmap.width(), bitmap.height(), format, plane)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::Orientation;
    use crate::error::Error;

    #[test]
    fn test_opaque_color_becomes_luminance() {
        let pixels = vec![
            255, 0, 0, // red
            0, 255, 0, // green
            0, 0, 255, // blue
            128, 128, 128, // gray
        ];
        let bmp = Bitmap::new(2, 2, PixelFormat::Rgb8, pixels).unwrap();
        let gray = to_grayscale(&bmp).unwrap();

        assert_eq!(gray.format(), PixelFormat::GrayAlpha8);
        let expected = [54u8, 182, 18, 128];
        for (i, px) in gray.to_dense().chunks_exact(2).enumerate() {
            assert!((px[0] as i32 - expected[i] as i32).abs() <= 1);
            assert_eq!(px[1], 255, "opaque source keeps full alpha");
        }
    }

    #[test]
    fn test_stroke_alpha_is_kept() {
        // Black ink with anti-aliased edge on a transparent background
        let pixels = vec![0, 0, 0, 255, 0, 0, 0, 96, 0, 0, 0, 0];
        let bmp = Bitmap::new(3, 1, PixelFormat::Rgba8, pixels).unwrap();
        let gray = to_grayscale(&bmp).unwrap();

        assert_eq!(gray.to_dense(), vec![0, 255, 0, 96, 0, 0]);
    }

    #[test]
    fn test_luminance_plane_has_no_alpha() {
        let bmp = Bitmap::new(1, 1, PixelFormat::Rgba8, vec![255, 255, 255, 10]).unwrap();
        let plane = luminance_plane(&bmp).unwrap();

        assert_eq!(plane.format(), PixelFormat::Gray8);
        assert_eq!(plane.as_raw(), &[255]);
    }

    #[test]
    fn test_alpha_mask_of_opaque_source() {
        let bmp = Bitmap::solid(3, 2, PixelFormat::Gray8, &[40]).unwrap();
        let mask = alpha_mask(&bmp).unwrap();

        assert_eq!(mask.format(), PixelFormat::Alpha8);
        assert!(mask.as_raw().iter().all(|&a| a == 255));
    }

    #[test]
    fn test_apply_mask_rejects_mismatched_sizes() {
        let gray = Bitmap::solid(2, 2, PixelFormat::Gray8, &[0]).unwrap();
        let mask = Bitmap::solid(3, 2, PixelFormat::Alpha8, &[0]).unwrap();
        assert!(matches!(
            apply_mask(&gray, &mask),
            Err(Error::MalformedInput(MalformedInput::PixelDataMismatch { .. }))
        ));
    }

    #[test]
    fn test_apply_mask_rejects_wrong_formats() {
        let gray = Bitmap::solid(2, 2, PixelFormat::Gray8, &[0]).unwrap();
        assert!(apply_mask(&gray, &gray).is_err());
    }

    #[test]
    fn test_gray_alpha_passes_through() {
        let bmp = Bitmap::new(1, 1, PixelFormat::GrayAlpha8, vec![12, 34]).unwrap();
        assert_eq!(to_grayscale(&bmp).unwrap(), bmp);
    }

    #[test]
    fn test_tags_carry_over() {
        let bmp = Bitmap::solid(2, 2, PixelFormat::Rgb8, &[1, 2, 3])
            .unwrap()
            .with_scale(3.0)
            .with_orientation(Orientation::Rotate180);
        let gray = to_grayscale(&bmp).unwrap();

        assert_eq!(gray.scale(), 3.0);
        assert_eq!(gray.orientation(), Orientation::Rotate180);
    }

    #[test]
    fn test_padded_source() {
        let pixels = vec![10, 20, 0xFF, 30, 40];
        let bmp = Bitmap::with_stride(2, 2, PixelFormat::Gray8, 3, pixels).unwrap();
        let gray = to_grayscale(&bmp).unwrap();

        assert_eq!(gray.to_dense(), vec![10, 255, 20, 255, 30, 255, 40, 255]);
    }
}
