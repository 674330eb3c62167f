//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use clap::Args;
use tracing::{debug, info};

use inkframe_core::canvas::{TouchCanvas, TouchPhase};
use inkframe_core::geometry::{transform_rect, NormalizedRect, Point, ViewExtents};
use inkframe_core::{decode_bitmap, prepare_sample, FilterType, InkframeConfig, Sample};

#[derive(Args)]
pub struct PrepareCommand {
    /// Input image (PNG or JPEG)
    input: PathBuf,

    /// Sample edge length (overrides the config)
    #[arg(short, long)]
    size: Option<u32>,

    /// Resampling filter: nearest, bilinear or lanczos3 (overrides the config)
    #[arg(short, long, value_parser = parse_filter)]
    filter: Option<FilterType>,

    /// Write the sample as a grayscale PNG
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl PrepareCommand {
    pub fn execute(self, config: &InkframeConfig) -> Result<()> {
        let bytes = std::fs::read(&self.input)
            .with_context(|| format!("Failed to read {}", self.input.display()))?;
        let bitmap = decode_bitmap(&bytes)
            .with_context(|| format!("Failed to decode {}", self.input.display()))?;
        info!(
            width = bitmap.width(),
            height = bitmap.height(),
            orientation = ?bitmap.orientation(),
            "decoded image"
        );

        let size = self.size.unwrap_or(config.digit.sample_size);
        let filter = self.filter.unwrap_or(config.digit.filter);
        let sample = prepare_sample(&bitmap, size, filter)?;

        emit_sample(&sample, self.output.as_deref())
    }
}

#[derive(Args)]
pub struct DrawCommand {
    /// Touch path as space-separated "x,y" points; the first begins the
    /// stroke and the last ends it
    #[arg(short, long)]
    points: String,

    /// Canvas width in points
    #[arg(long, default_value = "100")]
    width: f64,

    /// Canvas height in points
    #[arg(long, default_value = "100")]
    height: f64,

    /// Canvas pixel density
    #[arg(long, default_value = "1")]
    scale: f64,

    /// Write the prepared sample as a grayscale PNG
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl DrawCommand {
    pub fn execute(self, config: &InkframeConfig) -> Result<()> {
        let points = parse_points(&self.points)?;
        let mut canvas = TouchCanvas::new(self.width, self.height)
            .with_scale(self.scale)
            .with_stroke_width(config.digit.stroke_width);

        for (phase, point) in touch_phases(&points) {
            canvas.handle(phase, &[point]);
        }

        for segment in canvas.segments() {
            println!(
                "segment ({}, {}) -> ({}, {})",
                segment.from.x, segment.from.y, segment.to.x, segment.to.y
            );
        }

        let Some(drawing) = canvas.snapshot() else {
            bail!("nothing was drawn");
        };
        let sample = prepare_sample(&drawing, config.digit.sample_size, config.digit.filter)?;
        emit_sample(&sample, self.output.as_deref())
    }
}

#[derive(Args)]
pub struct RectCommand {
    /// Left edge in unit space
    x: f64,
    /// Bottom edge in unit space
    y: f64,
    /// Width in unit space
    width: f64,
    /// Height in unit space
    height: f64,

    /// View size as WIDTHxHEIGHT
    #[arg(long, value_parser = parse_extents)]
    view: ViewExtents,
}

impl RectCommand {
    pub fn execute(self) -> Result<()> {
        let rect = transform_rect(
            NormalizedRect::new(self.x, self.y, self.width, self.height),
            self.view,
        );
        println!("x={} y={} width={} height={}", rect.x, rect.y, rect.width, rect.height);
        Ok(())
    }
}

/// Print the sample as text, or write it as a PNG.
fn emit_sample(sample: &Sample, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let bitmap = sample.as_buffer().to_bitmap()?;
            bitmap
                .to_rgba_image()
                .save(path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}x{} sample to {:?}", sample.width(), sample.height(), path);
        }
        None => print!("{}", render_ascii(sample)),
    }
    Ok(())
}

/// One character per pixel, darker pixels drawn denser.
fn render_ascii(sample: &Sample) -> String {
    const RAMP: &[u8] = b"@%#*+=-:. ";
    let mut out = String::with_capacity((sample.width() as usize + 1) * sample.height() as usize);
    for y in 0..sample.height() {
        for x in 0..sample.width() {
            let v = sample.value(x, y) as usize;
            out.push(RAMP[v * (RAMP.len() - 1) / 255] as char);
        }
        out.push('\n');
    }
    out
}

/// Began for the first point, Ended for the last, Moved in between.
fn touch_phases(points: &[Point]) -> Vec<(TouchPhase, Point)> {
    let last = points.len().saturating_sub(1);
    points
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let phase = match i {
                0 => TouchPhase::Began,
                i if i == last => TouchPhase::Ended,
                _ => TouchPhase::Moved,
            };
            (phase, p)
        })
        .collect()
}

fn parse_points(input: &str) -> Result<Vec<Point>> {
    let points = input
        .split_whitespace()
        .map(|pair| {
            let (x, y) = pair
                .split_once(',')
                .with_context(|| format!("Expected \"x,y\", got {:?}", pair))?;
            Ok(Point::new(
                x.trim().parse().with_context(|| format!("Invalid x in {:?}", pair))?,
                y.trim().parse().with_context(|| format!("Invalid y in {:?}", pair))?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    if points.is_empty() {
        bail!("At least one point is required");
    }
    debug!(count = points.len(), "parsed touch path");
    Ok(points)
}

fn parse_extents(input: &str) -> std::result::Result<ViewExtents, String> {
    let (w, h) = input
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {:?}", input))?;
    let width: f64 = w.parse().map_err(|_| format!("invalid width {:?}", w))?;
    let height: f64 = h.parse().map_err(|_| format!("invalid height {:?}", h))?;
    Ok(ViewExtents::new(width, height))
}

fn parse_filter(input: &str) -> std::result::Result<FilterType, String> {
    match input.to_ascii_lowercase().as_str() {
        "nearest" => Ok(FilterType::Nearest),
        "bilinear" => Ok(FilterType::Bilinear),
        "lanczos3" => Ok(FilterType::Lanczos3),
        other => Err(format!("unknown filter {:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkframe_core::bitmap::{Bitmap, PixelFormat};
    use inkframe_core::buffer::extract_pixel_buffer;

    #[test]
    fn test_parse_points() {
        let points = parse_points("10,10 20,20  30.5,10").unwrap();
        assert_eq!(
            points,
            vec![
                Point::new(10.0, 10.0),
                Point::new(20.0, 20.0),
                Point::new(30.5, 10.0)
            ]
        );
    }

    #[test]
    fn test_parse_points_errors() {
        assert!(parse_points("").is_err());
        assert!(parse_points("10").is_err());
        assert!(parse_points("a,1").is_err());
    }

    #[test]
    fn test_touch_phases() {
        let points = parse_points("1,1 2,2 3,3").unwrap();
        let phases: Vec<_> = touch_phases(&points).into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            phases,
            vec![TouchPhase::Began, TouchPhase::Moved, TouchPhase::Ended]
        );
    }

    #[test]
    fn test_single_point_only_begins() {
        let points = parse_points("5,5").unwrap();
        assert_eq!(touch_phases(&points)[0].0, TouchPhase::Began);
    }

    #[test]
    fn test_parse_extents() {
        assert_eq!(parse_extents("200x100").unwrap(), ViewExtents::new(200.0, 100.0));
        assert!(parse_extents("200").is_err());
        assert!(parse_extents("ax1").is_err());
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter("Lanczos3").unwrap(), FilterType::Lanczos3);
        assert!(parse_filter("cubic").is_err());
    }

    #[test]
    fn test_render_ascii() {
        let bmp = Bitmap::new(2, 1, PixelFormat::Gray8, vec![0, 255]).unwrap();
        let sample = extract_pixel_buffer(&bmp).into_sample(2, 1).unwrap();
        assert_eq!(render_ascii(&sample), "@ \n");
    }

    #[test]
    fn test_emit_sample_png() {
        let bmp = Bitmap::solid(4, 4, PixelFormat::Gray8, &[128]).unwrap();
        let sample = extract_pixel_buffer(&bmp).into_sample(4, 4).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.png");

        emit_sample(&sample, Some(&path)).unwrap();
        let written = image::open(&path).unwrap();
        assert_eq!((written.width(), written.height()), (4, 4));
    }
}
