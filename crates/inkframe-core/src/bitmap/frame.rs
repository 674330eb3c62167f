//! Camera frames as delivered by a capture source.
//!
//! Frames arrive as 32-bit little-endian buffers with premultiplied alpha in
//! the first (most significant) position, which puts bytes in memory as
//! B, G, R, A. Rows are usually padded to a hardware alignment.

use std::time::Instant;

use super::types::buffer_len;
use super::{Bitmap, Orientation, PixelFormat};
use crate::error::{MalformedInput, Result};

/// Bytes per pixel of a BGRA frame.
const FRAME_BPP: usize = 4;

/// A raw frame from a capture source.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    /// Premultiplied BGRA pixel data, `bytes_per_row` bytes per row.
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Bytes between consecutive rows
    pub bytes_per_row: usize,
    /// How the sensor image must be rotated to appear upright
    pub orientation: Orientation,
    /// Timestamp when the frame was captured
    pub timestamp: Instant,
}

impl CameraFrame {
    /// Create a frame with dense rows and upright orientation.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            bytes_per_row: width as usize * FRAME_BPP,
            orientation: Orientation::Up,
            timestamp: Instant::now(),
        }
    }

    /// Set the row stride for padded buffers.
    pub fn with_bytes_per_row(mut self, bytes_per_row: usize) -> Self {
        self.bytes_per_row = bytes_per_row;
        self
    }

    /// Set the sensor orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Get frame dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Convert a hardware frame into a displayable RGBA bitmap.
///
/// Drops row padding, swaps BGRA to RGBA and un-premultiplies alpha. The
/// frame's orientation is carried over as the bitmap's orientation tag.
pub fn frame_to_bitmap(frame: &CameraFrame) -> Result<Bitmap> {
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return Err(MalformedInput::InvalidDimensions { width, height }.into());
    }

    let too_large = MalformedInput::TooLarge {
        width,
        height,
        stride: frame.bytes_per_row,
    };
    let row_bytes = (width as usize)
        .checked_mul(FRAME_BPP)
        .ok_or_else(|| too_large.clone())?;
    if frame.bytes_per_row < row_bytes {
        return Err(MalformedInput::InvalidStride {
            stride: frame.bytes_per_row,
            row_bytes,
        }
        .into());
    }

    let expected = buffer_len(frame.bytes_per_row, height, row_bytes).ok_or(too_large)?;
    if frame.data.len() < expected {
        return Err(MalformedInput::PixelDataMismatch {
            expected,
            actual: frame.data.len(),
        }
        .into());
    }

    let mut rgba = Vec::with_capacity(row_bytes * height as usize);
    for y in 0..height as usize {
        let start = y * frame.bytes_per_row;
        for px in frame.data[start..start + row_bytes].chunks_exact(FRAME_BPP) {
            let a = px[3];
            rgba.extend_from_slice(&[
                unpremultiply(px[2], a),
                unpremultiply(px[1], a),
                unpremultiply(px[0], a),
                a,
            ]);
        }
    }

    Ok(Bitmap::new(width, height, PixelFormat::Rgba8, rgba)?.with_orientation(frame.orientation))
}

/// Undo alpha premultiplication for one 8-bit component.
#[inline]
fn unpremultiply(value: u8, alpha: u8) -> u8 {
    match alpha {
        0 => 0,
        255 => value,
        a => ((value as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_bgra_to_rgba() {
        // One opaque pixel: B=10, G=20, R=30
        let frame = CameraFrame::new(vec![10, 20, 30, 255], 1, 1);
        let bmp = frame_to_bitmap(&frame).unwrap();

        assert_eq!(bmp.format(), PixelFormat::Rgba8);
        assert_eq!(bmp.pixel(0, 0), &[30, 20, 10, 255]);
    }

    #[test]
    fn test_padding_is_dropped() {
        // 1x2 frame, rows padded to 8 bytes
        let data = vec![
            1, 2, 3, 255, 0xAA, 0xAA, 0xAA, 0xAA, //
            4, 5, 6, 255,
        ];
        let frame = CameraFrame::new(data, 1, 2).with_bytes_per_row(8);
        let bmp = frame_to_bitmap(&frame).unwrap();

        assert_eq!(bmp.to_dense(), vec![3, 2, 1, 255, 6, 5, 4, 255]);
    }

    #[test]
    fn test_premultiplied_alpha_is_undone() {
        // Half-transparent pixel with premultiplied red 100 -> straight ~200
        let frame = CameraFrame::new(vec![0, 0, 100, 128], 1, 1);
        let bmp = frame_to_bitmap(&frame).unwrap();

        let px = bmp.pixel(0, 0);
        assert!((px[0] as i32 - 199).abs() <= 1, "got {}", px[0]);
        assert_eq!(px[3], 128);
    }

    #[test]
    fn test_transparent_pixels_are_black() {
        assert_eq!(unpremultiply(80, 0), 0);
        assert_eq!(unpremultiply(80, 255), 80);
    }

    #[test]
    fn test_orientation_is_carried() {
        let frame = CameraFrame::new(vec![0; 8], 2, 1).with_orientation(Orientation::Rotate90CW);
        let bmp = frame_to_bitmap(&frame).unwrap();
        assert_eq!(bmp.orientation(), Orientation::Rotate90CW);
    }

    #[test]
    fn test_short_frame_is_rejected() {
        let frame = CameraFrame::new(vec![0; 7], 2, 1);
        assert!(matches!(
            frame_to_bitmap(&frame),
            Err(Error::MalformedInput(MalformedInput::PixelDataMismatch { .. }))
        ));
    }

    #[test]
    fn test_overflowing_stride_is_rejected() {
        let frame = CameraFrame::new(vec![0; 8], 1, 3).with_bytes_per_row(usize::MAX / 2 + 1);
        assert!(matches!(
            frame_to_bitmap(&frame),
            Err(Error::MalformedInput(MalformedInput::TooLarge { .. }))
        ));
    }

    #[test]
    fn test_narrow_stride_is_rejected() {
        let frame = CameraFrame::new(vec![0; 16], 2, 2).with_bytes_per_row(4);
        assert!(frame_to_bitmap(&frame).is_err());
    }
}
