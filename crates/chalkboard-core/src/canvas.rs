//! Raster canvas and the drawing surface contract.

use crate::color::Rgb;
use crate::shapes::{Shape, point_to_segment_dist};
use crate::tools::DrawStyle;
use kurbo::{BezPath, PathEl, Point};
use thiserror::Error;

/// Tolerance used when flattening curves into line segments.
const FLATTEN_TOLERANCE: f64 = 0.25;

/// Bytes per RGBA8 pixel.
const BYTES_PER_PIXEL: usize = 4;

/// Largest canvas edge accepted, in pixels.
pub const MAX_CANVAS_DIMENSION: u32 = 16_384;

/// Largest canvas area accepted (256 MiB of RGBA8).
pub const MAX_CANVAS_PIXELS: u64 = 64 * 1024 * 1024;

/// Canvas and snapshot errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    #[error("Canvas dimensions must be non-zero, got {0}x{1}")]
    Empty(u32, u32),
    #[error("Canvas of {0}x{1} exceeds the supported size")]
    TooLarge(u32, u32),
    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

/// Check that a `width` x `height` RGBA8 canvas can be allocated.
pub fn check_dimensions(width: u32, height: u32) -> Result<(), CanvasError> {
    if width == 0 || height == 0 {
        return Err(CanvasError::Empty(width, height));
    }
    if width > MAX_CANVAS_DIMENSION
        || height > MAX_CANVAS_DIMENSION
        || u64::from(width) * u64::from(height) > MAX_CANVAS_PIXELS
    {
        return Err(CanvasError::TooLarge(width, height));
    }
    Ok(())
}

/// An immutable full-canvas RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Snapshot {
    /// Wrap a row-major RGBA8 buffer of `width * height` pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, CanvasError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(CanvasError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw row-major RGBA8 data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        self.pixels[i..i + BYTES_PER_PIXEL].try_into().ok()
    }
}

/// Drawing surface the tools paint on.
pub trait Canvas {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Capture the full raster.
    fn get_pixels(&self) -> Snapshot;

    /// Replace the raster with a previously captured snapshot.
    fn set_pixels(&mut self, snapshot: Snapshot);

    /// Stroke a single line segment.
    fn stroke_line(&mut self, from: Point, to: Point, style: &DrawStyle);

    /// Fill or outline a shape according to `style`.
    fn draw_shape(&mut self, shape: &Shape, style: &DrawStyle);

    /// Change dimensions, keeping existing content anchored at the origin.
    fn resize(&mut self, width: u32, height: u32);
}

/// In-memory RGBA8 canvas.
///
/// Strokes are round-capped: a pixel is painted when its centre lies within
/// half the line width of the segment. Fills use the even-odd rule sampled
/// at pixel centres. There is no anti-aliasing.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    width: u32,
    height: u32,
    background: Rgb,
    pixels: Vec<u8>,
}

impl RasterCanvas {
    /// Create a canvas filled with `background`.
    ///
    /// Dimensions are not checked; see [`check_dimensions`].
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        let pixels = background
            .to_rgba8()
            .repeat(width as usize * height as usize);
        Self {
            width,
            height,
            background,
            pixels,
        }
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    /// RGBA value at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let i = self.index(i64::from(x), i64::from(y))?;
        self.pixels[i..i + BYTES_PER_PIXEL].try_into().ok()
    }

    /// Copy a row-major RGBA8 buffer to the origin, clipped to the canvas.
    fn blit(&mut self, src: &[u8], src_width: u32, src_height: u32) {
        let cols = src_width.min(self.width) as usize * BYTES_PER_PIXEL;
        let src_stride = src_width as usize * BYTES_PER_PIXEL;
        let dst_stride = self.width as usize * BYTES_PER_PIXEL;
        for row in 0..src_height.min(self.height) as usize {
            let src_row = &src[row * src_stride..row * src_stride + cols];
            self.pixels[row * dst_stride..row * dst_stride + cols].copy_from_slice(src_row);
        }
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL)
    }

    fn put(&mut self, x: i64, y: i64, rgba: [u8; 4]) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i..i + BYTES_PER_PIXEL].copy_from_slice(&rgba);
        }
    }

    /// Paint every pixel whose centre is within `width / 2` of the segment.
    fn stamp_segment(&mut self, a: Point, b: Point, width: f64, rgba: [u8; 4]) {
        let half = width / 2.0;
        let (x0, x1) = self.clamp_span(a.x.min(b.x) - half, a.x.max(b.x) + half, self.width);
        let (y0, y1) = self.clamp_span(a.y.min(b.y) - half, a.y.max(b.y) + half, self.height);

        for y in y0..y1 {
            for x in x0..x1 {
                let centre = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if point_to_segment_dist(centre, a, b) <= half {
                    self.put(x, y, rgba);
                }
            }
        }
    }

    /// Pixel range `[start, end)` covering `lo..hi`, clipped to `0..limit`.
    fn clamp_span(&self, lo: f64, hi: f64, limit: u32) -> (i64, i64) {
        let limit = f64::from(limit);
        let start = lo.floor().clamp(0.0, limit) as i64;
        let end = hi.ceil().clamp(0.0, limit) as i64;
        (start, end)
    }

    fn stroke_path(&mut self, path: &BezPath, width: f64, rgba: [u8; 4]) {
        for subpath in flatten(path) {
            if let [only] = subpath.points.as_slice() {
                self.stamp_segment(*only, *only, width, rgba);
                continue;
            }
            for pair in subpath.points.windows(2) {
                self.stamp_segment(pair[0], pair[1], width, rgba);
            }
            if subpath.closed {
                if let (Some(first), Some(last)) = (subpath.points.first(), subpath.points.last()) {
                    self.stamp_segment(*last, *first, width, rgba);
                }
            }
        }
    }

    fn fill_path(&mut self, path: &BezPath, rgba: [u8; 4]) {
        let subpaths = flatten(path);
        let edges: Vec<(Point, Point)> = subpaths
            .iter()
            .flat_map(|subpath| {
                let n = subpath.points.len();
                (0..n).map(move |i| (subpath.points[i], subpath.points[(i + 1) % n]))
            })
            .filter(|(p, q)| p.y != q.y)
            .collect();
        if edges.is_empty() {
            return;
        }

        let min_y = edges.iter().map(|(p, q)| p.y.min(q.y)).fold(f64::INFINITY, f64::min);
        let max_y = edges.iter().map(|(p, q)| p.y.max(q.y)).fold(f64::NEG_INFINITY, f64::max);
        let (y0, y1) = self.clamp_span(min_y, max_y, self.height);

        let mut crossings = Vec::new();
        for y in y0..y1 {
            let sample = y as f64 + 0.5;
            crossings.clear();
            for (p, q) in &edges {
                if (p.y <= sample) != (q.y <= sample) {
                    crossings.push(p.x + (sample - p.y) * (q.x - p.x) / (q.y - p.y));
                }
            }
            crossings.sort_by(f64::total_cmp);

            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil().max(0.0) as i64;
                let end = ((span[1] - 0.5).ceil() as i64).min(i64::from(self.width));
                for x in start..end {
                    self.put(x, y, rgba);
                }
            }
        }
    }
}

impl Canvas for RasterCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn get_pixels(&self) -> Snapshot {
        Snapshot {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }

    fn set_pixels(&mut self, snapshot: Snapshot) {
        if snapshot.width == self.width && snapshot.height == self.height {
            self.pixels = snapshot.pixels;
        } else {
            log::debug!(
                "Restoring {}x{} snapshot onto {}x{} canvas",
                snapshot.width,
                snapshot.height,
                self.width,
                self.height
            );
            self.blit(&snapshot.pixels, snapshot.width, snapshot.height);
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, style: &DrawStyle) {
        self.stamp_segment(
            from,
            to,
            f64::from(style.line_width),
            style.stroke_color.to_rgba8(),
        );
    }

    fn draw_shape(&mut self, shape: &Shape, style: &DrawStyle) {
        let half = f64::from(style.line_width) / 2.0;
        let reach = shape.bounds().inflate(half, half);
        if reach.x1 <= 0.0
            || reach.y1 <= 0.0
            || reach.x0 >= f64::from(self.width)
            || reach.y0 >= f64::from(self.height)
        {
            return;
        }
        let path = shape.to_path();
        let rgba = style.stroke_color.to_rgba8();
        if style.filled && shape.is_closed() {
            self.fill_path(&path, rgba);
        } else {
            self.stroke_path(&path, f64::from(style.line_width), rgba);
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        if let Err(e) = check_dimensions(width, height) {
            log::warn!("Ignoring canvas resize: {}", e);
            return;
        }
        let background = self.background;
        let old = std::mem::replace(self, Self::new(width, height, background));
        self.blit(&old.pixels, old.width, old.height);
        log::debug!(
            "Canvas resized from {}x{} to {}x{}",
            old.width,
            old.height,
            width,
            height
        );
    }
}

/// A flattened subpath.
struct Polyline {
    points: Vec<Point>,
    closed: bool,
}

fn flatten(path: &BezPath) -> Vec<Polyline> {
    let mut subpaths: Vec<Polyline> = Vec::new();
    kurbo::flatten(path.iter(), FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => subpaths.push(Polyline {
            points: vec![p],
            closed: false,
        }),
        PathEl::LineTo(p) => {
            if let Some(current) = subpaths.last_mut() {
                current.points.push(p);
            }
        }
        PathEl::ClosePath => {
            if let Some(current) = subpaths.last_mut() {
                current.closed = true;
            }
        }
        _ => {}
    });
    subpaths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Rectangle;
    use crate::tools::ToolKind;
    use kurbo::Circle;

    const RED: Rgb = Rgb::new(255, 0, 0);

    fn painted(canvas: &RasterCanvas, x: u32, y: u32) -> bool {
        canvas.pixel(x, y) == Some(RED.to_rgba8())
    }

    fn count_painted(canvas: &RasterCanvas) -> usize {
        (0..canvas.height())
            .flat_map(|y| (0..canvas.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| painted(canvas, x, y))
            .count()
    }

    #[test]
    fn test_check_dimensions() {
        assert!(check_dimensions(800, 600).is_ok());
        assert_eq!(check_dimensions(0, 10), Err(CanvasError::Empty(0, 10)));
        assert_eq!(
            check_dimensions(u32::MAX, u32::MAX),
            Err(CanvasError::TooLarge(u32::MAX, u32::MAX))
        );
        assert_eq!(
            check_dimensions(16_384, 16_384),
            Err(CanvasError::TooLarge(16_384, 16_384))
        );
    }

    #[test]
    fn test_snapshot_rejects_mismatched_buffer() {
        assert_eq!(
            Snapshot::new(4, 4, vec![0; 8]),
            Err(CanvasError::BufferSize {
                expected: 64,
                actual: 8
            })
        );
        let snapshot = Snapshot::new(1, 2, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(snapshot.pixel(0, 1), Some([5, 6, 7, 8]));
    }

    #[test]
    fn test_resize_rejects_invalid_dimensions() {
        let mut canvas = RasterCanvas::new(10, 10, Rgb::WHITE);
        canvas.resize(0, 0);
        assert_eq!((canvas.width(), canvas.height()), (10, 10));
        canvas.resize(u32::MAX, u32::MAX);
        assert_eq!((canvas.width(), canvas.height()), (10, 10));
    }

    #[test]
    fn test_shape_outside_canvas_is_skipped() {
        let mut canvas = RasterCanvas::new(20, 20, Rgb::WHITE);
        let before = canvas.get_pixels();
        let shape = Shape::Circle(Circle::new(Point::new(100.0, 100.0), 5.0));
        canvas.draw_shape(&shape, &DrawStyle::for_shape(RED, true));
        assert_eq!(canvas.get_pixels(), before);

        let edge = Shape::Circle(Circle::new(Point::new(-3.0, 10.0), 5.0));
        canvas.draw_shape(&edge, &DrawStyle::for_shape(RED, true));
        assert!(painted(&canvas, 0, 10));
    }

    #[test]
    fn test_new_canvas_is_background() {
        let canvas = RasterCanvas::new(4, 3, Rgb::WHITE);
        assert_eq!(canvas.get_pixels().pixels().len(), 4 * 3 * 4);
        assert_eq!(canvas.pixel(3, 2), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn test_stroke_line_horizontal() {
        let mut canvas = RasterCanvas::new(20, 20, Rgb::WHITE);
        let style = DrawStyle::for_stroke(ToolKind::Pen, RED, Rgb::WHITE);
        canvas.stroke_line(Point::new(2.0, 10.0), Point::new(17.0, 10.0), &style);

        assert!(painted(&canvas, 10, 9));
        assert!(painted(&canvas, 10, 10));
        assert!(!painted(&canvas, 10, 8));
        assert!(!painted(&canvas, 10, 11));
        assert!(!painted(&canvas, 0, 10));
    }

    #[test]
    fn test_marker_is_wider_than_pen() {
        let mut pen = RasterCanvas::new(30, 30, Rgb::WHITE);
        let mut marker = pen.clone();
        let from = Point::new(5.0, 15.0);
        let to = Point::new(25.0, 15.0);
        pen.stroke_line(from, to, &DrawStyle::for_stroke(ToolKind::Pen, RED, Rgb::WHITE));
        marker.stroke_line(from, to, &DrawStyle::for_stroke(ToolKind::Marker, RED, Rgb::WHITE));

        assert!(count_painted(&marker) > count_painted(&pen) * 4);
    }

    #[test]
    fn test_strokes_clip_at_edges() {
        let mut canvas = RasterCanvas::new(10, 10, Rgb::WHITE);
        let style = DrawStyle::for_stroke(ToolKind::Marker, RED, Rgb::WHITE);
        canvas.stroke_line(Point::new(-50.0, -50.0), Point::new(60.0, 60.0), &style);
        assert!(painted(&canvas, 0, 0));
        assert!(painted(&canvas, 9, 9));
    }

    #[test]
    fn test_filled_rectangle() {
        let mut canvas = RasterCanvas::new(60, 40, Rgb::WHITE);
        let shape = Shape::Rectangle(Rectangle::new(Point::new(10.0, 10.0), 40.0, 20.0));
        canvas.draw_shape(&shape, &DrawStyle::for_shape(RED, true));

        assert_eq!(count_painted(&canvas), 40 * 20);
        assert!(painted(&canvas, 10, 10));
        assert!(painted(&canvas, 49, 29));
        assert!(!painted(&canvas, 50, 29));
        assert!(!painted(&canvas, 9, 10));
    }

    #[test]
    fn test_outlined_rectangle_leaves_interior() {
        let mut canvas = RasterCanvas::new(60, 40, Rgb::WHITE);
        let shape = Shape::Rectangle(Rectangle::new(Point::new(50.0, 30.0), -40.0, -20.0));
        canvas.draw_shape(&shape, &DrawStyle::for_shape(RED, false));

        assert!(painted(&canvas, 10, 20));
        assert!(painted(&canvas, 30, 10));
        assert!(painted(&canvas, 49, 20));
        assert!(!painted(&canvas, 30, 20));
    }

    #[test]
    fn test_filled_circle() {
        let mut canvas = RasterCanvas::new(40, 40, Rgb::WHITE);
        let shape = Shape::Circle(Circle::new(Point::new(20.0, 20.0), 10.0));
        canvas.draw_shape(&shape, &DrawStyle::for_shape(RED, true));

        assert!(painted(&canvas, 20, 20));
        assert!(!painted(&canvas, 1, 1));
        let area = count_painted(&canvas) as f64;
        let expected = std::f64::consts::PI * 100.0;
        assert!((area - expected).abs() < expected * 0.05);
    }

    #[test]
    fn test_fill_ignored_for_lines() {
        let mut canvas = RasterCanvas::new(20, 20, Rgb::WHITE);
        let shape = Shape::derive(ToolKind::Ruler, Point::new(0.0, 10.0), Point::new(20.0, 10.0))
            .unwrap();
        canvas.draw_shape(&shape, &DrawStyle::for_shape(RED, true));
        assert!(painted(&canvas, 10, 10));
        assert!(!painted(&canvas, 10, 5));
    }

    #[test]
    fn test_snapshot_restore() {
        let mut canvas = RasterCanvas::new(10, 10, Rgb::WHITE);
        let before = canvas.get_pixels();
        canvas.stroke_line(
            Point::new(0.0, 5.0),
            Point::new(10.0, 5.0),
            &DrawStyle::for_shape(RED, false),
        );
        assert_ne!(canvas.get_pixels(), before);

        canvas.set_pixels(before.clone());
        assert_eq!(canvas.get_pixels(), before);
    }

    #[test]
    fn test_resize_keeps_content() {
        let mut canvas = RasterCanvas::new(10, 10, Rgb::WHITE);
        canvas.stroke_line(
            Point::new(0.0, 1.0),
            Point::new(10.0, 1.0),
            &DrawStyle::for_shape(RED, false),
        );

        canvas.resize(20, 5);
        assert_eq!((canvas.width(), canvas.height()), (20, 5));
        assert!(painted(&canvas, 9, 1));
        assert!(!painted(&canvas, 15, 1));
        assert_eq!(canvas.pixel(15, 1), Some(Rgb::WHITE.to_rgba8()));

        canvas.resize(5, 5);
        assert!(painted(&canvas, 4, 1));
    }

    #[test]
    fn test_restore_snapshot_of_other_size() {
        let mut small = RasterCanvas::new(4, 4, Rgb::WHITE);
        small.stroke_line(
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            &DrawStyle::for_shape(RED, false),
        );
        let snapshot = small.get_pixels();

        let mut canvas = RasterCanvas::new(8, 8, Rgb::BLACK);
        canvas.set_pixels(snapshot);
        assert!(painted(&canvas, 3, 0));
        assert_eq!(canvas.pixel(3, 3), Some(Rgb::WHITE.to_rgba8()));
        assert_eq!(canvas.pixel(7, 7), Some(Rgb::BLACK.to_rgba8()));
    }
}
