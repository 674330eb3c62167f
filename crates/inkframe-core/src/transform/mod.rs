//! Bitmap transforms that turn a drawing or camera crop into model input.
//!
//! # Transform Order
//!
//! When preparing a classifier sample, transforms are applied in this order:
//! 1. Orientation normalization
//! 2. Uniform resize (shorter side to the target size)
//! 3. Center crop to the target square
//! 4. Grayscale conversion
//!
//! followed by pixel-buffer extraction in [`crate::buffer`].
//!
//! # Coordinate System
//!
//! - Crop regions are in logical points, origin top-left
//! - Logical points are multiplied by the bitmap's pixel density to get pixels

mod crop;
mod grayscale;
mod orientation;
mod resize;

pub use crop::{center_crop, crop_pixels, crop_rect};
pub use grayscale::{alpha_mask, apply_mask, luminance_plane, to_grayscale};
pub use orientation::normalize_orientation;
pub use resize::{resize_by_ratio, shorter_side_ratio};
