//! The full preprocessing chain from an arbitrary bitmap to a classifier
//! sample.
//!
//! 1. Uniform resize so the shorter side equals the sample size
//! 2. Center crop to a square of the sample size
//! 3. Grayscale conversion keeping coverage
//! 4. Pixel-buffer extraction and shape check
//!
//! The aspect ratio is never distorted: the longer side is cropped instead.

use tracing::debug;

use crate::bitmap::{Bitmap, FilterType};
use crate::buffer::{extract_pixel_buffer, Sample};
use crate::error::Result;
use crate::transform::{center_crop, resize_by_ratio, shorter_side_ratio, to_grayscale};

/// Default model input edge length.
pub const DEFAULT_SAMPLE_SIZE: u32 = 28;

/// Turn `bitmap` into a `size` x `size` single-channel sample.
///
/// # Errors
///
/// Returns `MalformedInput` if the bitmap cannot be scaled or cropped to the
/// requested size (for example a zero `size`).
pub fn prepare_sample(bitmap: &Bitmap, size: u32, filter: FilterType) -> Result<Sample> {
    let ratio = shorter_side_ratio(bitmap, size);
    let resized = resize_by_ratio(bitmap, ratio, filter)?;
    debug!(
        source = ?bitmap.dimensions(),
        resized = ?resized.dimensions(),
        ratio,
        "resized for sampling"
    );

    let cropped = center_crop(&resized, size, size)?;
    let gray = to_grayscale(&cropped)?;
    extract_pixel_buffer(&gray).into_sample(size, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::{Orientation, PixelFormat};
    use crate::canvas::TouchCanvas;
    use crate::geometry::Point;

    #[test]
    fn test_landscape_image_becomes_square_sample() {
        let bmp = Bitmap::solid(56, 40, PixelFormat::Rgba8, &[255, 255, 255, 255]).unwrap();
        let sample = prepare_sample(&bmp, DEFAULT_SAMPLE_SIZE, FilterType::Bilinear).unwrap();

        assert_eq!((sample.width(), sample.height()), (28, 28));
        assert_eq!(sample.stride(), 28);
        assert!(sample.data().iter().all(|&v| v >= 254));
    }

    #[test]
    fn test_small_image_is_upscaled() {
        let bmp = Bitmap::solid(7, 10, PixelFormat::Gray8, &[0]).unwrap();
        let sample = prepare_sample(&bmp, 28, FilterType::Nearest).unwrap();

        assert_eq!((sample.width(), sample.height()), (28, 28));
        assert!(sample.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_rotated_image_is_upright() {
        // Left half black, right half white; rotated 180 the dark half is right
        let mut pixels = Vec::new();
        for _ in 0..28 {
            pixels.extend(std::iter::repeat(0u8).take(14));
            pixels.extend(std::iter::repeat(255u8).take(14));
        }
        let bmp = Bitmap::new(28, 28, PixelFormat::Gray8, pixels)
            .unwrap()
            .with_orientation(Orientation::Rotate180);
        let sample = prepare_sample(&bmp, 28, FilterType::Nearest).unwrap();

        assert_eq!(sample.value(0, 0), 255);
        assert_eq!(sample.value(27, 0), 0);
    }

    #[test]
    fn test_canvas_drawing_reads_dark_on_white() {
        let mut canvas = TouchCanvas::new(56.0, 56.0).with_scale(2.0);
        canvas.touches_began(&[Point::new(28.0, 4.0)]);
        canvas.touches_ended(&[Point::new(28.0, 52.0)]);
        let snapshot = canvas.snapshot().unwrap();

        let sample = prepare_sample(&snapshot, 28, FilterType::Bilinear).unwrap();

        // Vertical stroke through the middle, white paper elsewhere
        assert!(sample.value(14, 14) < 64, "stroke {}", sample.value(14, 14));
        assert_eq!(sample.value(1, 14), 255);
    }

    #[test]
    fn test_zero_size_rejected() {
        let bmp = Bitmap::solid(4, 4, PixelFormat::Gray8, &[0]).unwrap();
        assert!(prepare_sample(&bmp, 0, FilterType::Bilinear).is_err());
    }
}
