//! Touch-driven stroke canvas.
//!
//! # Touch Phases
//!
//! - `Began`: clear the canvas and remember the first touch point
//! - `Moved`: draw a segment from the remembered point to the current one
//! - `Ended`: draw the final segment and forget the remembered point
//!
//! Coordinates are in points, origin top-left. The backing surface is
//! `size * scale` pixels; strokes are black with anti-aliased coverage in
//! the alpha channel on a transparent background.

mod raster;
mod stroke;

pub use raster::{stroke_segment, INK};
pub use stroke::{Segment, TouchCanvas, TouchPhase, DEFAULT_STROKE_WIDTH};
