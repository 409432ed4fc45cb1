//! Rasterization of shrunken word polygons into a binary page mask.

use geo::{Coord, LineString, Polygon as GeoPolygon};
use geo_clipper::{ClipperInt, EndType, JoinType};
use image::{GrayImage, Luma};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point as ImageProcPoint;

use super::geometry::{PageShape, Point, Polygon};

/// Default shrink ratio applied to word polygons before rasterization.
pub const DEFAULT_SHRINK_RATIO: f32 = 0.4;

/// Arc tolerance of the round joins produced by the polygon offset.
const ARC_TOLERANCE: f64 = 0.25;

/// A binary page mask: every pixel is 0 or 1.
#[derive(Debug, Clone)]
pub struct MaskCanvas {
    image: GrayImage,
}

impl MaskCanvas {
    /// An empty mask covering `shape`.
    pub fn new(shape: PageShape) -> Self {
        Self {
            image: GrayImage::new(shape.width, shape.height),
        }
    }

    /// Mask width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Mask height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Whether the pixel at `(x, y)` is set. Out-of-bounds pixels are unset.
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        x < self.width() && y < self.height() && self.image.get_pixel(x, y)[0] != 0
    }

    /// Number of set pixels.
    pub fn filled_pixels(&self) -> usize {
        self.image.pixels().filter(|p| p[0] != 0).count()
    }

    /// Scales the mask to a 0/255 image suitable for morphology and contour tracing.
    pub fn to_binary_image(&self) -> GrayImage {
        let mut out = self.image.clone();
        for pixel in out.pixels_mut() {
            if pixel[0] != 0 {
                pixel[0] = 255;
            }
        }
        out
    }

    fn fill(&mut self, points: &[Point]) {
        let vertices: Vec<ImageProcPoint<i32>> = points.iter().map(Point::to_imageproc_point).collect();
        let vertices = open_ring(vertices);
        match vertices.len() {
            0 => {}
            1 | 2 => {
                // Too thin for a polygon fill; mark the covered pixels directly.
                for v in &vertices {
                    if v.x >= 0 && v.y >= 0 && (v.x as u32) < self.width() && (v.y as u32) < self.height() {
                        self.image.put_pixel(v.x as u32, v.y as u32, Luma([1]));
                    }
                }
            }
            _ => draw_polygon_mut(&mut self.image, &vertices, Luma([1])),
        }
    }
}

/// Drops consecutive duplicates and the closing vertex of a ring.
fn open_ring(mut vertices: Vec<ImageProcPoint<i32>>) -> Vec<ImageProcPoint<i32>> {
    vertices.dedup();
    while vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    vertices
}

/// Shrinks a polygon inward by `area * (1 - ratio^2) / perimeter`.
///
/// Coordinates are truncated to integers before the offset.
///
/// # Arguments
///
/// * `polygon` - Region in absolute pixels.
/// * `shrink_ratio` - Ratio `r` in the offset distance; smaller shrinks more.
///
/// # Returns
///
/// The exterior ring of the shrunken polygon without a closing vertex, or
/// `None` when the polygon has no area or the offset leaves nothing behind.
pub fn shrink_polygon(polygon: &Polygon, shrink_ratio: f32) -> Option<Vec<Point>> {
    let area = polygon.area();
    let perimeter = polygon.perimeter();
    if area <= 0.0 || perimeter <= 0.0 {
        tracing::warn!(points = polygon.points.len(), "skipping degenerate polygon");
        return None;
    }
    let distance = f64::from(area * (1.0 - shrink_ratio * shrink_ratio) / perimeter);

    let coords: Vec<Coord<i64>> = polygon
        .points
        .iter()
        .map(|p| Coord {
            x: p.x.trunc() as i64,
            y: p.y.trunc() as i64,
        })
        .collect();
    let subject = GeoPolygon::new(LineString::from(coords), vec![]);
    let shrunk = subject.offset(-distance, JoinType::Round(ARC_TOLERANCE), EndType::ClosedPolygon);

    let Some(first) = shrunk.0.first() else {
        tracing::debug!(distance, "polygon vanished after shrinking");
        return None;
    };

    let mut points: Vec<Point> = first
        .exterior()
        .coords()
        .map(|c| Point::new(c.x as f32, c.y as f32))
        .collect();
    // geo rings repeat the first coordinate at the end.
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    Some(points)
}

/// Builds a binary mask of `shape` by filling every shrunken region with 1.
///
/// # Arguments
///
/// * `shape` - Size of the mask.
/// * `regions` - Polygons in absolute pixels.
/// * `shrink_ratio` - Passed to [`shrink_polygon`] for every region.
///
/// # Returns
///
/// A mask of `shape`. Degenerate regions and regions that vanish when shrunk
/// leave it untouched; an empty shape yields an empty mask.
pub fn create_mask(shape: PageShape, regions: &[Polygon], shrink_ratio: f32) -> MaskCanvas {
    let mut mask = MaskCanvas::new(shape);
    if shape.width == 0 || shape.height == 0 {
        return mask;
    }
    for region in regions {
        if let Some(points) = shrink_polygon(region, shrink_ratio) {
            mask.fill(&points);
        }
    }
    mask
}
