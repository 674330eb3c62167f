//! Anti-aliased line rasterization onto an RGBA surface.
//!
//! A segment is drawn as a capsule: every pixel whose center lies within
//! `width / 2` of the segment is covered, which also yields round caps at
//! both ends. Coverage falls off linearly over one pixel at the edge and is
//! composited source-over onto the surface.

use image::{Rgba, RgbaImage};

use crate::geometry::Point;

/// Opaque black ink.
pub const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Draw a round-capped segment between two points given in pixels.
pub fn stroke_segment(surface: &mut RgbaImage, from: Point, to: Point, width: f64, ink: Rgba<u8>) {
    let radius = (width / 2.0).max(0.0);
    let reach = radius + 1.0;

    let (sw, sh) = surface.dimensions();
    let x0 = (from.x.min(to.x) - reach).floor().max(0.0);
    let y0 = (from.y.min(to.y) - reach).floor().max(0.0);
    let x1 = (from.x.max(to.x) + reach).ceil().min(sw as f64);
    let y1 = (from.y.max(to.y) + reach).ceil().min(sh as f64);

    if x1 <= x0 || y1 <= y0 {
        return;
    }

    for y in y0 as u32..y1 as u32 {
        for x in x0 as u32..x1 as u32 {
            let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let coverage = (radius + 0.5 - distance_to_segment(center, from, to)).clamp(0.0, 1.0);
            if coverage > 0.0 {
                blend(surface.get_pixel_mut(x, y), ink, coverage);
            }
        }
    }
}

/// Shortest distance from `p` to the segment `a`-`b`.
fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Source-over compositing with straight alpha.
fn blend(dst: &mut Rgba<u8>, ink: Rgba<u8>, coverage: f64) {
    let sa = ink[3] as f64 / 255.0 * coverage;
    let da = dst[3] as f64 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return;
    }

    for c in 0..3 {
        let value = (ink[c] as f64 * sa + dst[c] as f64 * da * (1.0 - sa)) / out_a;
        dst[c] = value.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
