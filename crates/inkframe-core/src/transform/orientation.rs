//! Orientation normalization.
//!
//! Rewrites pixel data so that it is stored upright and clears the
//! orientation tag. Works on every pixel format by moving whole pixels.

use crate::bitmap::{Bitmap, Orientation};

/// Return an upright copy of `bitmap` with its orientation tag cleared.
///
/// Bitmaps already tagged `Orientation::Up` are returned unchanged.
pub fn normalize_orientation(bitmap: &Bitmap) -> Bitmap {
    let orientation = bitmap.orientation();
    if orientation == Orientation::Up {
        return bitmap.clone();
    }

    let (src_w, src_h) = bitmap.dimensions();
    let (dst_w, dst_h) = if orientation.swaps_dimensions() {
        (src_h, src_w)
    } else {
        (src_w, src_h)
    };

    let bpp = bitmap.bytes_per_pixel();
    let mut output = Vec::with_capacity(dst_w as usize * dst_h as usize * bpp);

    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let (sx, sy) = source_coords(orientation, dx, dy, src_w, src_h);
            output.extend_from_slice(bitmap.pixel(sx, sy));
        }
    }

    match bitmap.derive(dst_w, dst_h, bitmap.format(), output) {
        Ok(upright) => upright.with_orientation(Orientation::Up),
        // Dimensions are non-zero and the buffer is dense, so derive cannot fail.
        Err(_) => bitmap.clone(),
    }
}

/// Map an upright destination pixel back to the stored source pixel.
#[inline]
fn source_coords(orientation: Orientation, dx: u32, dy: u32, src_w: u32, src_h: u32) -> (u32, u32) {
    match orientation {
        Orientation::Up => (dx, dy),
        Orientation::FlipHorizontal => (src_w - 1 - dx, dy),
        Orientation::Rotate180 => (src_w - 1 - dx, src_h - 1 - dy),
        Orientation::FlipVertical => (dx, src_h - 1 - dy),
        Orientation::Transpose => (dy, dx),
        Orientation::Rotate90CW => (dy, src_h - 1 - dx),
        Orientation::Transverse => (src_w - 1 - dy, src_h - 1 - dx),
        Orientation::Rotate270CW => (src_w - 1 - dy, dx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::PixelFormat;

    /// 3x2 gray bitmap:
    /// ```text
    /// 1 2 3
    /// 4 5 6
    /// ```
    fn sample() -> Bitmap {
        Bitmap::new(3, 2, PixelFormat::Gray8, vec![1, 2, 3, 4, 5, 6]).unwrap()
    }

    fn upright(orientation: Orientation) -> Bitmap {
        normalize_orientation(&sample().with_orientation(orientation))
    }

    #[test]
    fn test_up_is_identity() {
        let bmp = sample();
        assert_eq!(normalize_orientation(&bmp), bmp);
    }

    #[test]
    fn test_flip_horizontal() {
        let out = upright(Orientation::FlipHorizontal);
        assert_eq!(out.dimensions(), (3, 2));
        assert_eq!(out.to_dense(), vec![3, 2, 1, 6, 5, 4]);
        assert_eq!(out.orientation(), Orientation::Up);
    }

    #[test]
    fn test_rotate_180() {
        assert_eq!(upright(Orientation::Rotate180).to_dense(), vec![6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_flip_vertical() {
        assert_eq!(upright(Orientation::FlipVertical).to_dense(), vec![4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn test_rotate_90_cw() {
        // Stored image rotated clockwise:
        // 4 1
        // 5 2
        // 6 3
        let out = upright(Orientation::Rotate90CW);
        assert_eq!(out.dimensions(), (2, 3));
        assert_eq!(out.to_dense(), vec![4, 1, 5, 2, 6, 3]);
    }

    #[test]
    fn test_rotate_270_cw() {
        // 3 6
        // 2 5
        // 1 4
        let out = upright(Orientation::Rotate270CW);
        assert_eq!(out.dimensions(), (2, 3));
        assert_eq!(out.to_dense(), vec![3, 6, 2, 5, 1, 4]);
    }

    #[test]
    fn test_transpose() {
        // 1 4
        // 2 5
        // 3 6
        assert_eq!(upright(Orientation::Transpose).to_dense(), vec![1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn test_transverse() {
        // 6 3
        // 5 2
        // 4 1
        assert_eq!(upright(Orientation::Transverse).to_dense(), vec![6, 3, 5, 2, 4, 1]);
    }

    #[test]
    fn test_multi_byte_pixels_move_together() {
        let bmp = Bitmap::new(2, 1, PixelFormat::Rgb8, vec![255, 0, 0, 0, 255, 0])
            .unwrap()
            .with_orientation(Orientation::FlipHorizontal);
        let out = normalize_orientation(&bmp);
        assert_eq!(out.pixel(0, 0), &[0, 255, 0]);
        assert_eq!(out.pixel(1, 0), &[255, 0, 0]);
    }

    #[test]
    fn test_scale_is_preserved() {
        let bmp = sample().with_scale(2.0).with_orientation(Orientation::Rotate90CW);
        assert_eq!(normalize_orientation(&bmp).scale(), 2.0);
    }
}
