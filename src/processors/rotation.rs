//! Skew estimation and box rotation between coordinate frames.
//!
//! All functions work on batches of boxes expressed in RELATIVE coordinates
//! (normalized by the page shape) unless stated otherwise. Angles are in
//! degrees, counter-clockwise positive, with the image Y axis pointing down.

use super::geometry::{median, PageShape, Point, Quad, WordBox};
use crate::core::errors::LayoutResult;

/// Default minimum skew, in degrees, below which [`rotate_boxes`] leaves boxes untouched.
pub const DEFAULT_MIN_ANGLE: f32 = 1.0;

/// Estimates the skew of a batch of oriented quads, in degrees.
///
/// Each quad contributes the slope between the sum of its two left points and
/// the sum of its two right points (reading-direction left and right); the
/// page angle is the median of these per-quad angles, so a minority of
/// misdetected quads does not move the estimate.
///
/// The batch must not be empty. Quads whose angle is undefined (all four
/// points equal) are ignored.
pub fn estimate_page_angle(quads: &[Quad]) -> f32 {
    debug_assert!(!quads.is_empty(), "estimate_page_angle needs at least one quad");

    let angles = quads.iter().map(|quad| {
        let [tl, tr, br, bl] = quad.points;
        let (xleft, yleft) = (tl.x + bl.x, tl.y + bl.y);
        let (xright, yright) = (tr.x + br.x, tr.y + br.y);
        // Y axis points down, so a rising baseline has yleft > yright.
        ((yleft - yright) / (xright - xleft)).atan()
    });

    match median(angles) {
        Some(angle) => angle.to_degrees(),
        None => {
            tracing::warn!(quads = quads.len(), "no usable quad for skew estimation");
            0.0
        }
    }
}

/// Remaps relative quads expressed for `orig_shape` into `dest_shape`.
///
/// The absolute size of the boxes is unchanged; only their relative
/// coordinates move, accounting for the centered padding added when an image
/// of `orig_shape` is placed in a canvas of `dest_shape`.
///
/// # Arguments
///
/// * `quads` - Relative quads on a page of `orig_shape`.
/// * `orig_shape` - `(height, width)` of the source page.
/// * `dest_shape` - `(height, width)` of the enclosing canvas.
///
/// # Returns
///
/// The remapped quads, or an invalid-shape error unless both shapes have
/// exactly two components.
pub fn remap_boxes(
    quads: &[Quad],
    orig_shape: &[usize],
    dest_shape: &[usize],
) -> LayoutResult<Vec<Quad>> {
    let dest = PageShape::from_dims("dest_shape", dest_shape)?;
    let orig = PageShape::from_dims("orig_shape", orig_shape)?;

    let (orig_w, orig_h) = (orig.width as f32, orig.height as f32);
    let (dest_w, dest_h) = (dest.width as f32, dest.height as f32);

    Ok(quads
        .iter()
        .map(|quad| {
            quad.map_points(|p| {
                Point::new(
                    (p.x * orig_w + (dest_w - orig_w) / 2.0) / dest_w,
                    (p.y * orig_h + (dest_h - orig_h) / 2.0) / dest_h,
                )
            })
        })
        .collect())
}

/// Rotates a batch of relative boxes by `angle` degrees around the page center.
///
/// Straight boxes are first expanded to quads (clockwise from top-left), so
/// the result is always a batch of quads; confidence scores are carried over.
/// When `|angle| < min_angle` or `|angle| > 90 - min_angle` the quads are
/// returned without rotation.
///
/// When `target_shape` is given, the rotated quads are finally remapped from
/// `orig_shape` to `target_shape` (see [`remap_boxes`]), which removes the
/// padding introduced by rotating a page with canvas expansion.
///
/// # Arguments
///
/// * `boxes` - Relative boxes on a page of `orig_shape`.
/// * `angle` - Rotation in degrees, counter-clockwise positive.
/// * `orig_shape` - `(height, width)` of the page the boxes live on.
/// * `min_angle` - Skew below which no rotation happens.
/// * `target_shape` - Optional `(height, width)` to remap into.
///
/// # Returns
///
/// One quad per input box, in input order, or
/// [`LayoutError::InvalidShape`](crate::core::errors::LayoutError::InvalidShape)
/// when a shape does not have two components.
pub fn rotate_boxes(
    boxes: &[WordBox],
    angle: f32,
    orig_shape: &[usize],
    min_angle: f32,
    target_shape: Option<&[usize]>,
) -> LayoutResult<Vec<Quad>> {
    let orig = PageShape::from_dims("orig_shape", orig_shape)?;
    let quads: Vec<Quad> = boxes.iter().map(WordBox::to_quad).collect();

    if angle.abs() < min_angle || angle.abs() > 90.0 - min_angle {
        return Ok(quads);
    }

    let (width, height) = (orig.width as f32, orig.height as f32);
    let (center_x, center_y) = (width / 2.0, height / 2.0);
    let (sin, cos) = angle.to_radians().sin_cos();

    let rotated: Vec<Quad> = quads
        .iter()
        .map(|quad| {
            quad.map_points(|p| {
                let dx = p.x * width - center_x;
                let dy = p.y * height - center_y;
                Point::new(
                    (center_x + dx * cos + dy * sin) / width,
                    (center_y - dx * sin + dy * cos) / height,
                )
            })
        })
        .collect();

    match target_shape {
        Some(target) => remap_boxes(&rotated, orig_shape, target),
        None => Ok(rotated),
    }
}
