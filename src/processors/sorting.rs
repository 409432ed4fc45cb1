//! Approximate row-major reading order for a batch of word boxes.

use super::geometry::{median, Quad, Rect, WordBox};
use super::rotation::{estimate_page_angle, rotate_boxes};
use crate::core::errors::LayoutResult;

/// Reference canvas used when straightening oriented boxes before sorting.
const SORT_REFERENCE_SHAPE: [usize; 2] = [1024, 1024];

/// Skews below this many degrees are not corrected before sorting.
const SORT_MIN_ANGLE: f32 = 5.0;

/// Boxes in reading order, together with the straight boxes the order was computed on.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedBoxes {
    /// Permutation of input indices, top-to-bottom then left-to-right.
    pub order: Vec<usize>,
    /// Straight box per input index. For oriented input these are fitted to
    /// the straightened quads; straight input is returned as is.
    pub boxes: Vec<Rect>,
}

/// Sorts boxes from top to bottom, left to right.
///
/// If any box is oriented, the whole batch is first straightened: the page
/// angle is estimated and the quads are rotated by its negation on a
/// 1024x1024 reference canvas, ignoring skews below 5 degrees. Each quad is
/// then collapsed to its bounding straight box.
///
/// The order is a single stable sort on `x1 + 2 * y1 / median_height`, which
/// compares by row first for boxes on different rows and by column within a
/// row.
pub fn sort_boxes(boxes: &[WordBox]) -> LayoutResult<SortedBoxes> {
    let straight: Vec<Rect> = if boxes.iter().any(WordBox::is_oriented) {
        let quads: Vec<Quad> = boxes.iter().map(WordBox::to_quad).collect();
        let angle = estimate_page_angle(&quads);
        tracing::debug!(angle, boxes = boxes.len(), "straightening oriented boxes");
        rotate_boxes(boxes, -angle, &SORT_REFERENCE_SHAPE, SORT_MIN_ANGLE, None)?
            .iter()
            .map(Quad::bounding_rect)
            .collect()
    } else {
        boxes.iter().map(WordBox::bounding_rect).collect()
    };

    let median_height = median(straight.iter().map(Rect::height))
        .unwrap_or(0.0)
        .max(f32::EPSILON);

    let keys: Vec<f32> = straight
        .iter()
        .map(|b| b.x1 + 2.0 * b.y1 / median_height)
        .collect();
    let mut order: Vec<usize> = (0..straight.len()).collect();
    order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));

    Ok(SortedBoxes {
        order,
        boxes: straight,
    })
}
