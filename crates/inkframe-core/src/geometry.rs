//! Points and rectangles in the three coordinate spaces the pipeline uses.
//!
//! # Coordinate Systems
//!
//! - **Normalized** (detector output): unit square, origin bottom-left,
//!   extents in [0, 1]
//! - **View** (overlay drawing, crop regions): points, origin top-left
//! - **Pixel**: integer pixel grid of a concrete bitmap, origin top-left

use serde::{Deserialize, Serialize};

/// A point in view space (points, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A rectangle in unit space with a bottom-left origin, as produced by a
/// rectangle detector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Pixel extents of the view a normalized rectangle is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewExtents {
    pub width: f64,
    pub height: f64,
}

impl ViewExtents {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A rectangle in view space (origin top-left).
///
/// Values are not clamped: a rectangle may extend past the view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Scale every component by `factor` (points to pixels).
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }

    /// Quantize to the smallest pixel rectangle that contains this one and
    /// clip it to a `bounds_width` x `bounds_height` grid.
    ///
    /// Returns `None` if nothing of the rectangle lies inside the grid.
    pub fn to_pixel_rect(&self, bounds_width: u32, bounds_height: u32) -> Option<PixelRect> {
        let x0 = snap(self.x).floor().max(0.0);
        let y0 = snap(self.y).floor().max(0.0);
        let x1 = snap(self.max_x()).ceil().min(bounds_width as f64);
        let y1 = snap(self.max_y()).ceil().min(bounds_height as f64);

        if !(x1 > x0 && y1 > y0) {
            return None;
        }

        Some(PixelRect {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }
}

/// An integer rectangle on a bitmap's pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True if the rectangle is non-empty and fits inside the grid.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x as u64 + self.width as u64 <= width as u64
            && self.y as u64 + self.height as u64 <= height as u64
    }
}

/// Map a detector rectangle (unit space, bottom-left origin) onto a view
/// (pixel space, top-left origin).
///
/// ```text
/// view.width  = norm.width  * extents.width
/// view.height = norm.height * extents.height
/// view.x      = norm.x * extents.width
/// view.y      = extents.height - (extents.height * norm.y) - view.height
/// ```
///
/// The map is exact; results outside the view are returned as-is.
pub fn transform_rect(rect: NormalizedRect, extents: ViewExtents) -> ViewRect {
    let width = rect.width * extents.width;
    let height = rect.height * extents.height;
    let x = rect.x * extents.width;
    let y = extents.height - (extents.height * rect.y) - height;

    ViewRect {
        x,
        y,
        width,
        height,
    }
}

/// Remove floating point noise around whole numbers before rounding.
#[inline]
pub(crate) fn snap(value: f64) -> f64 {
    let rounded = value.round();
    if (value - rounded).abs() < 1e-9 {
        rounded
    } else {
        value
    }
}
