//! Decoding encoded images into orientation-tagged bitmaps.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::ImageReader;
use tracing::debug;

use super::{Bitmap, Orientation};
use crate::error::{MalformedInput, Result};

/// Decode PNG or JPEG bytes into an RGBA bitmap.
///
/// The EXIF orientation is read and stored as the bitmap's orientation tag
/// but not applied; pixels stay in sensor order until
/// [`normalize_orientation`](crate::transform::normalize_orientation) runs.
///
/// # Errors
///
/// Returns `MalformedInput::UnsupportedFormat` if the bytes are not a
/// decodable image.
pub fn decode_bitmap(bytes: &[u8]) -> Result<Bitmap> {
    let orientation = get_orientation(bytes);

    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| MalformedInput::UnsupportedFormat(e.to_string()))?
        .decode()
        .map_err(|e| MalformedInput::UnsupportedFormat(e.to_string()))?;

    debug!(
        width = img.width(),
        height = img.height(),
        ?orientation,
        "decoded bitmap"
    );

    Ok(Bitmap::from_rgba_image(img.into_rgba8())?.with_orientation(orientation))
}

/// Read the EXIF orientation from encoded image bytes.
///
/// Returns `Orientation::Up` if there is no EXIF data or no orientation field.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::PixelFormat;
    use crate::error::Error;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn encode_png(img: &RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(2, 1, Rgba([10, 20, 30, 40]));

        let bmp = decode_bitmap(&encode_png(&img)).unwrap();

        assert_eq!(bmp.dimensions(), (3, 2));
        assert_eq!(bmp.format(), PixelFormat::Rgba8);
        assert_eq!(bmp.pixel(2, 1), &[10, 20, 30, 40]);
        assert_eq!(bmp.orientation(), Orientation::Up);
    }

    #[test]
    fn test_decode_invalid_bytes() {
        let result = decode_bitmap(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(
            result,
            Err(Error::MalformedInput(MalformedInput::UnsupportedFormat(_)))
        ));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(decode_bitmap(&[]).is_err());
    }

    #[test]
    fn test_orientation_without_exif() {
        let img = RgbaImage::new(1, 1);
        assert_eq!(get_orientation(&encode_png(&img)), Orientation::Up);
        assert_eq!(get_orientation(&[0x00, 0x01]), Orientation::Up);
    }
}
