//! Bitmaps and the ways they enter the pipeline.
//!
//! This module provides:
//! - [`Bitmap`], an immutable pixel grid with stride, orientation, row order
//!   and pixel-density tags
//! - Decoding PNG/JPEG bytes into orientation-tagged bitmaps
//! - Converting hardware camera frames (premultiplied BGRA) into bitmaps
//!
//! # Examples
//!
//! ```ignore
//! use inkframe_core::bitmap::decode_bitmap;
//!
//! let bytes = std::fs::read("digit.png").unwrap();
//! let bitmap = decode_bitmap(&bytes).unwrap();
//! println!("Decoded {}x{} bitmap", bitmap.width(), bitmap.height());
//! ```

mod decode;
mod frame;
mod types;

pub use decode::{decode_bitmap, get_orientation};
pub use frame::{frame_to_bitmap, CameraFrame};
pub use types::{Bitmap, FilterType, Orientation, PixelFormat, RowOrder};
