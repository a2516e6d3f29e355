//! Shape geometry derived from a gesture's anchor and release points.

use crate::tools::ToolKind;
use kurbo::{BezPath, Circle, Line, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// Flattening tolerance used when converting curves to paths.
const PATH_TOLERANCE: f64 = 0.1;

/// An axis-aligned rectangle anchored at `origin`.
///
/// Width and height are signed: a negative width extends left of the origin,
/// a negative height extends up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Corner the rectangle was dragged from.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn new(origin: Point, width: f64, height: f64) -> Self {
        Self { origin, width, height }
    }

    /// Rectangle spanning from `anchor` to `release`.
    pub fn from_drag(anchor: Point, release: Point) -> Self {
        Self::new(anchor, release.x - anchor.x, release.y - anchor.y)
    }

    /// Square anchored at `anchor`, growing toward the quadrant of `release`.
    ///
    /// The side is the smaller of the two drag extents; each axis keeps its
    /// own direction.
    pub fn square_from_drag(anchor: Point, release: Point) -> Self {
        let dx = release.x - anchor.x;
        let dy = release.y - anchor.y;
        let side = dx.abs().min(dy.abs());
        Self::new(anchor, side.copysign(dx), side.copysign(dy))
    }

    /// Normalized kurbo rectangle (positive extents).
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + self.width,
            self.origin.y + self.height,
        )
        .abs()
    }
}

/// Isosceles triangle with a horizontal base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub apex: Point,
    pub base_start: Point,
    pub base_end: Point,
}

impl Triangle {
    /// Apex centred on the anchor row, base on the release row.
    pub fn from_drag(anchor: Point, release: Point) -> Self {
        let mid_x = (anchor.x + release.x) / 2.0;
        Self {
            apex: Point::new(mid_x, anchor.y),
            base_start: Point::new(anchor.x, release.y),
            base_end: Point::new(release.x, release.y),
        }
    }

    pub fn vertices(&self) -> [Point; 3] {
        [self.apex, self.base_start, self.base_end]
    }
}

/// Trapezoid whose top edge is inset by a quarter of its width on each side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quadrilateral {
    /// Corners in drawing order: top-left, top-right, bottom-right, bottom-left.
    pub corners: [Point; 4],
}

impl Quadrilateral {
    pub fn from_drag(anchor: Point, release: Point) -> Self {
        let left = anchor.x.min(release.x);
        let right = anchor.x.max(release.x);
        let offset = (release.x - anchor.x).abs() / 4.0;
        Self {
            corners: [
                Point::new(left + offset, anchor.y),
                Point::new(right - offset, anchor.y),
                Point::new(right, release.y),
                Point::new(left, release.y),
            ],
        }
    }
}

/// A single primitive produced by a discrete tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Line(Line),
    Rectangle(Rectangle),
    Circle(Circle),
    Triangle(Triangle),
    Quadrilateral(Quadrilateral),
}

impl Shape {
    /// Compute the primitive a discrete tool draws for a gesture.
    ///
    /// Returns `None` for continuous tools, which draw while moving instead.
    pub fn derive(tool: ToolKind, anchor: Point, release: Point) -> Option<Shape> {
        let shape = match tool {
            ToolKind::Pen | ToolKind::Marker | ToolKind::Eraser => return None,
            ToolKind::Ruler | ToolKind::Divider => Shape::Line(Line::new(anchor, release)),
            ToolKind::Rectangle => Shape::Rectangle(Rectangle::from_drag(anchor, release)),
            ToolKind::Square => Shape::Rectangle(Rectangle::square_from_drag(anchor, release)),
            ToolKind::Circle => {
                let center = anchor.midpoint(release);
                Shape::Circle(Circle::new(center, anchor.distance(release) / 2.0))
            }
            ToolKind::Triangle => Shape::Triangle(Triangle::from_drag(anchor, release)),
            ToolKind::Quadrilateral => {
                Shape::Quadrilateral(Quadrilateral::from_drag(anchor, release))
            }
        };
        Some(shape)
    }

    /// Whether the primitive encloses an area that can be filled.
    pub fn is_closed(&self) -> bool {
        !matches!(self, Shape::Line(_))
    }

    /// Path outline for rasterization.
    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Line(line) => line.to_path(PATH_TOLERANCE),
            Shape::Rectangle(rect) => rect.as_rect().to_path(PATH_TOLERANCE),
            Shape::Circle(circle) => circle.to_path(PATH_TOLERANCE),
            Shape::Triangle(triangle) => polygon(&triangle.vertices()),
            Shape::Quadrilateral(quad) => polygon(&quad.corners),
        }
    }

    /// Bounding box of the primitive.
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Line(line) => line.bounding_box(),
            Shape::Rectangle(rect) => rect.as_rect(),
            Shape::Circle(circle) => circle.bounding_box(),
            _ => self.to_path().bounding_box(),
        }
    }
}

fn polygon(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for point in rest {
            path.line_to(*point);
        }
        path.close_path();
    }
    path
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    point.distance(a + seg * t)
}
