//! Geometric primitives for word boxes.
//!
//! This module provides the box representations consumed by the line
//! resolution engine: straight boxes ([`Rect`]), oriented quadrilaterals
//! ([`Quad`]), the [`WordBox`] union of both, arbitrary closed polygons
//! ([`Polygon`]) used for mask rasterization, and the [`PageShape`] needed to
//! move between relative and absolute coordinates.

use imageproc::point::Point as ImageProcPoint;
use serde::{Deserialize, Serialize};

use crate::core::errors::{LayoutError, LayoutResult};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Converts this point to an imageproc point with integer coordinates.
    ///
    /// Coordinates are truncated toward zero.
    pub fn to_imageproc_point(&self) -> ImageProcPoint<i32> {
        ImageProcPoint::new(self.x as i32, self.y as i32)
    }

    #[inline]
    fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self::new(self.x * sx, self.y * sy)
    }
}

/// An axis-aligned box stored as `(x1, y1, x2, y2)` with `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x1: f32,
    /// Top edge.
    pub y1: f32,
    /// Right edge.
    pub x2: f32,
    /// Bottom edge.
    pub y2: f32,
}

impl Rect {
    /// Creates a rectangle from two corners, ordering the coordinates so that
    /// `x1 <= x2` and `y1 <= y2`.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Returns the bounding extent of a set of points, or `None` when there are none.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            x1: first.x,
            y1: first.y,
            x2: first.x,
            y2: first.y,
        };
        Some(points.iter().skip(1).fold(init, |acc, p| Self {
            x1: acc.x1.min(p.x),
            y1: acc.y1.min(p.y),
            x2: acc.x2.max(p.x),
            y2: acc.y2.max(p.y),
        }))
    }

    /// Width of the rectangle.
    #[inline]
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    /// Height of the rectangle.
    #[inline]
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Vertical center, `(y1 + y2) / 2`.
    #[inline]
    pub fn center_y(&self) -> f32 {
        (self.y1 + self.y2) / 2.0
    }

    /// The four corners clockwise from top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x1, self.y1),
            Point::new(self.x2, self.y1),
            Point::new(self.x2, self.y2),
            Point::new(self.x1, self.y2),
        ]
    }

    /// Smallest rectangle enclosing both rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Length of the overlap between the two vertical extents (0 when disjoint).
    pub fn vertical_overlap(&self, other: &Rect) -> f32 {
        (self.y2.min(other.y2) - self.y1.max(other.y1)).max(0.0)
    }

    /// Length of the overlap between the two horizontal extents (0 when disjoint).
    pub fn horizontal_overlap(&self, other: &Rect) -> f32 {
        (self.x2.min(other.x2) - self.x1.max(other.x1)).max(0.0)
    }

    /// Rectangle with every coordinate truncated toward zero.
    pub fn truncated(&self) -> Rect {
        Rect {
            x1: self.x1.trunc(),
            y1: self.y1.trunc(),
            x2: self.x2.trunc(),
            y2: self.y2.trunc(),
        }
    }

    fn scaled(&self, sx: f32, sy: f32) -> Rect {
        Rect {
            x1: self.x1 * sx,
            y1: self.y1 * sy,
            x2: self.x2 * sx,
            y2: self.y2 * sy,
        }
    }
}

/// An oriented quadrilateral: top-left, top-right, bottom-right, bottom-left in
/// the word's own reading direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Quad {
    /// Corner points in reading-direction order.
    pub points: [Point; 4],
    /// Optional detector confidence, carried through every transformation.
    #[serde(default)]
    pub score: Option<f32>,
}

impl Quad {
    /// Creates a quad without a confidence score.
    pub fn new(points: [Point; 4]) -> Self {
        Self {
            points,
            score: None,
        }
    }

    /// Expands a straight box into its four corners, clockwise from top-left.
    pub fn from_rect(rect: &Rect, score: Option<f32>) -> Self {
        Self {
            points: rect.corners(),
            score,
        }
    }

    /// Bounding straight box (min/max over the four points).
    pub fn bounding_rect(&self) -> Rect {
        let [p0, p1, p2, p3] = self.points;
        Rect {
            x1: p0.x.min(p1.x).min(p2.x).min(p3.x),
            y1: p0.y.min(p1.y).min(p2.y).min(p3.y),
            x2: p0.x.max(p1.x).max(p2.x).max(p3.x),
            y2: p0.y.max(p1.y).max(p2.y).max(p3.y),
        }
    }

    /// Returns a copy with every point transformed by `f`, keeping the score.
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> Self {
        Self {
            points: self.points.map(f),
            score: self.score,
        }
    }
}

/// A word box as produced by a detector: straight or oriented.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum WordBox {
    /// Axis-aligned box with an optional confidence.
    Straight {
        /// The box extent.
        rect: Rect,
        /// Optional detector confidence.
        #[serde(default)]
        score: Option<f32>,
    },
    /// Oriented quadrilateral.
    Oriented(Quad),
}

impl WordBox {
    /// Straight box without a confidence score.
    pub fn straight(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        WordBox::Straight {
            rect: Rect::new(x1, y1, x2, y2),
            score: None,
        }
    }

    /// Oriented box from four reading-ordered points.
    pub fn oriented(points: [Point; 4]) -> Self {
        WordBox::Oriented(Quad::new(points))
    }

    /// Whether this box carries an orientation.
    pub fn is_oriented(&self) -> bool {
        matches!(self, WordBox::Oriented(_))
    }

    /// Quadrilateral form; straight boxes expand clockwise from top-left.
    pub fn to_quad(&self) -> Quad {
        match self {
            WordBox::Straight { rect, score } => Quad::from_rect(rect, *score),
            WordBox::Oriented(quad) => *quad,
        }
    }

    /// Straight bounding extent of the box.
    pub fn bounding_rect(&self) -> Rect {
        match self {
            WordBox::Straight { rect, .. } => *rect,
            WordBox::Oriented(quad) => quad.bounding_rect(),
        }
    }

    /// Confidence carried by the box, if any.
    pub fn score(&self) -> Option<f32> {
        match self {
            WordBox::Straight { score, .. } => *score,
            WordBox::Oriented(quad) => quad.score,
        }
    }

    /// Scales x by `sx` and y by `sy`, keeping the variant.
    pub fn scaled(&self, sx: f32, sy: f32) -> WordBox {
        match self {
            WordBox::Straight { rect, score } => WordBox::Straight {
                rect: rect.scaled(sx, sy),
                score: *score,
            },
            WordBox::Oriented(quad) => WordBox::Oriented(quad.map_points(|p| p.scaled(sx, sy))),
        }
    }
}

impl From<Rect> for WordBox {
    fn from(rect: Rect) -> Self {
        WordBox::Straight { rect, score: None }
    }
}

impl From<Quad> for WordBox {
    fn from(quad: Quad) -> Self {
        WordBox::Oriented(quad)
    }
}

/// An arbitrary closed polygon (the last point connects back to the first).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Polygon {
    /// The points that define the polygon.
    pub points: Vec<Point>,
}

impl Polygon {
    /// Creates a new polygon from a vector of points.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Calculates the area of the polygon using the shoelace formula.
    ///
    /// Returns 0.0 if the polygon has fewer than 3 points.
    pub fn area(&self) -> f32 {
        if self.points.len() < 3 {
            return 0.0;
        }

        let mut area = 0.0;
        let n = self.points.len();
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.points[i].x * self.points[j].y;
            area -= self.points[j].x * self.points[i].y;
        }
        area.abs() / 2.0
    }

    /// Calculates the perimeter of the closed polygon.
    pub fn perimeter(&self) -> f32 {
        let mut perimeter = 0.0;
        let n = self.points.len();
        for i in 0..n {
            let j = (i + 1) % n;
            let dx = self.points[j].x - self.points[i].x;
            let dy = self.points[j].y - self.points[i].y;
            perimeter += (dx * dx + dy * dy).sqrt();
        }
        perimeter
    }

    /// Bounding extent of the polygon, or `None` when it has no points.
    pub fn bounding_rect(&self) -> Option<Rect> {
        Rect::from_points(&self.points)
    }
}

impl From<Quad> for Polygon {
    fn from(quad: Quad) -> Self {
        Self::new(quad.points.to_vec())
    }
}

impl From<Rect> for Polygon {
    fn from(rect: Rect) -> Self {
        Self::new(rect.corners().to_vec())
    }
}

/// Page dimensions in pixels, `(height, width)` order like image array shapes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageShape {
    /// Page height in pixels.
    pub height: u32,
    /// Page width in pixels.
    pub width: u32,
}

impl PageShape {
    /// Creates a page shape.
    pub fn new(height: u32, width: u32) -> Self {
        Self { height, width }
    }

    /// Reads a `(height, width)` shape from a dimension slice.
    ///
    /// Fails with [`LayoutError::InvalidShape`] unless `dims` has exactly two components.
    pub fn from_dims(name: &'static str, dims: &[usize]) -> LayoutResult<Self> {
        match dims {
            [height, width] => Ok(Self::new(*height as u32, *width as u32)),
            _ => Err(LayoutError::invalid_shape(name, dims.len())),
        }
    }

    /// `[height, width]` as a dimension array.
    pub fn dims(&self) -> [usize; 2] {
        [self.height as usize, self.width as usize]
    }
}

/// Coordinate convention of a batch of boxes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateSpace {
    /// Coordinates normalized to `[0, 1]` by the page shape.
    #[default]
    Relative,
    /// Pixel coordinates.
    Absolute,
}

/// Median of a set of values; the mean of the two middle values for even counts.
///
/// NaN values are ignored. Returns `None` when no value remains.
pub(crate) fn median(values: impl IntoIterator<Item = f32>) -> Option<f32> {
    let mut values: Vec<f32> = values.into_iter().filter(|v| !v.is_nan()).collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_new_orders_corners() {
        let rect = Rect::new(10.0, 20.0, 0.0, 5.0);
        assert_eq!(rect, Rect::new(0.0, 5.0, 10.0, 20.0));
        assert_eq!(rect.width(), 10.0);
        assert_eq!(rect.height(), 15.0);
    }

    #[test]
    fn test_straight_quad_round_trip_extent() {
        let rect = Rect::new(1.0, 2.0, 5.0, 9.0);
        let quad = Quad::from_rect(&rect, Some(0.9));
        assert_eq!(quad.points[0], Point::new(1.0, 2.0));
        assert_eq!(quad.points[1], Point::new(5.0, 2.0));
        assert_eq!(quad.points[2], Point::new(5.0, 9.0));
        assert_eq!(quad.points[3], Point::new(1.0, 9.0));
        assert_eq!(quad.bounding_rect(), rect);
        assert_eq!(quad.score, Some(0.9));
    }

    #[test]
    fn test_rect_overlaps() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 8.0, 20.0, 30.0);
        assert_eq!(a.vertical_overlap(&b), 2.0);
        assert_eq!(a.horizontal_overlap(&b), 5.0);
        let c = Rect::new(0.0, 40.0, 10.0, 50.0);
        assert_eq!(a.vertical_overlap(&c), 0.0);
        assert_eq!(a.union(&c), Rect::new(0.0, 0.0, 10.0, 50.0));
    }

    #[test]
    fn test_polygon_area_and_perimeter() {
        let polygon = Polygon::from(Rect::new(0.0, 0.0, 4.0, 3.0));
        assert_eq!(polygon.area(), 12.0);
        assert_eq!(polygon.perimeter(), 14.0);

        let degenerate = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert_eq!(degenerate.area(), 0.0);
    }

    #[test]
    fn test_page_shape_from_dims() {
        let shape = PageShape::from_dims("orig_shape", &[1024, 768]).unwrap();
        assert_eq!(shape, PageShape::new(1024, 768));
        assert_eq!(shape.dims(), [1024, 768]);

        let err = PageShape::from_dims("orig_shape", &[1024, 768, 3]).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidShape {
                name: "orig_shape",
                len: 3
            }
        ));
    }

    #[test]
    fn test_median() {
        assert_eq!(median([3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median([4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median([f32::NAN, 5.0]), Some(5.0));
        assert_eq!(median(Vec::<f32>::new()), None);
    }

    #[test]
    fn test_word_box_scaling_keeps_variant() {
        let straight = WordBox::straight(0.25, 0.5, 0.75, 1.0).scaled(100.0, 10.0);
        assert_eq!(straight.bounding_rect(), Rect::new(25.0, 5.0, 75.0, 10.0));
        assert!(!straight.is_oriented());

        let oriented = WordBox::oriented(Rect::new(0.0, 0.0, 1.0, 1.0).corners()).scaled(2.0, 3.0);
        assert!(oriented.is_oriented());
        assert_eq!(oriented.bounding_rect(), Rect::new(0.0, 0.0, 2.0, 3.0));
    }
}
