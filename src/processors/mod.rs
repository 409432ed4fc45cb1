//! Geometric processing of detected word boxes.
//!
//! This module contains the building blocks of line resolution:
//! - [`geometry`] - box, quad and polygon primitives
//! - [`rotation`] - skew estimation and rotation between coordinate frames
//! - [`sorting`] - approximate reading-order sort
//! - [`lines`] - geometric line clustering and sub-line splitting
//! - [`shrink_mask`] - shrunken polygon rasterization
//! - [`bands`] - dilation bands, band merging and word-to-band assignment

pub mod bands;
pub mod geometry;
pub mod lines;
pub mod rotation;
pub mod shrink_mask;
pub mod sorting;

pub use bands::{
    dilate_horizontal, external_regions, extract_bands, merge_boxes, sort_bands, BandLocalizer,
    CenterOverlapLocalizer,
};
pub use geometry::{CoordinateSpace, PageShape, Point, Polygon, Quad, Rect, WordBox};
pub use lines::{resolve_lines, split_sub_lines, Line, DEFAULT_PARAGRAPH_BREAK};
pub use rotation::{estimate_page_angle, remap_boxes, rotate_boxes, DEFAULT_MIN_ANGLE};
pub use shrink_mask::{create_mask, shrink_polygon, MaskCanvas, DEFAULT_SHRINK_RATIO};
pub use sorting::{sort_boxes, SortedBoxes};
