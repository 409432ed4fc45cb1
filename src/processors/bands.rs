//! Line-reference bands: extraction from a dilated word mask, merging of
//! spuriously split bands, and assignment of words to bands.

use std::collections::BTreeSet;
use std::fmt::Debug;

use image::{imageops, GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::morphology::{grayscale_dilate, Mask};
use itertools::Itertools;

use super::geometry::{PageShape, Polygon, Rect};
use super::shrink_mask::create_mask;
use crate::core::config::DilationPass;

/// Dilates `image` with a `width` x `height` rectangular element, `iterations` times.
///
/// The element is anchored at its center. Both dimensions must lie in `1..=511`.
pub fn dilate_horizontal(image: &GrayImage, width: u32, height: u32, iterations: u32) -> GrayImage {
    let element = GrayImage::from_pixel(width, height, Luma([255]));
    let kernel = Mask::from_image(&element, (width / 2) as u8, (height / 2) as u8);

    let mut dilated = image.clone();
    for _ in 0..iterations {
        dilated = grayscale_dilate(&dilated, &kernel);
    }
    dilated
}

/// Bounding boxes of the external regions of a binary image.
///
/// Regions may touch the image border. Boxes are in pixels with exclusive
/// right and bottom edges, sorted by `(y1, x1)`.
///
/// # Arguments
///
/// * `image` - Binary image; any non-zero pixel is foreground.
///
/// # Returns
///
/// One rectangle per top-level region. Holes inside a region are ignored.
pub fn external_regions(image: &GrayImage) -> Vec<Rect> {
    // Borders touching the image edge are traced as holes, so trace a copy
    // framed by one background pixel and shift the boxes back.
    let mut framed = GrayImage::new(image.width() + 2, image.height() + 2);
    imageops::replace(&mut framed, image, 1, 1);

    let mut regions: Vec<Rect> = find_contours::<u32>(&framed)
        .into_iter()
        .filter(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none())
        .filter_map(|contour| {
            let xs = contour.points.iter().map(|p| p.x);
            let ys = contour.points.iter().map(|p| p.y);
            let (x1, x2) = xs.minmax().into_option()?;
            let (y1, y2) = ys.minmax().into_option()?;
            Some(Rect::new(
                x1.saturating_sub(1) as f32,
                y1.saturating_sub(1) as f32,
                x2 as f32,
                y2 as f32,
            ))
        })
        .collect();
    sort_bands(&mut regions);
    regions
}

/// Sorts bands by top edge, then left edge.
pub fn sort_bands(bands: &mut [Rect]) {
    bands.sort_by(|a, b| a.y1.total_cmp(&b.y1).then(a.x1.total_cmp(&b.x1)));
}

/// Runs one shrink, dilate and extract pass over absolute word polygons.
pub fn extract_bands(shape: PageShape, regions: &[Polygon], pass: &DilationPass) -> Vec<Rect> {
    let mask = create_mask(shape, regions, pass.shrink_ratio);
    let binary = mask.to_binary_image();
    let dilated = dilate_horizontal(&binary, pass.kernel_width, pass.kernel_height, pass.iterations);
    let bands = external_regions(&dilated);
    tracing::debug!(
        regions = regions.len(),
        bands = bands.len(),
        kernel_width = pass.kernel_width,
        iterations = pass.iterations,
        "extracted line bands"
    );
    bands
}

/// Whether two boxes cover nearly the same vertical extent.
fn vertically_coincide(a: &Rect, b: &Rect) -> bool {
    let min_height = a.height().min(b.height());
    (a.y1 - b.y1).abs() < min_height && (a.y2 - b.y2).abs() < min_height
}

/// Merges boxes whose vertical extents coincide.
///
/// Pairs `(i, j)` with `i < j` are visited in index order; when both the top
/// and bottom edges differ by less than the smaller height, box `j` becomes
/// the union of both and box `i` is dropped. The scan restarts until no pair
/// qualifies, so merging the output again changes nothing. Survivors keep
/// their relative order.
pub fn merge_boxes(boxes: &[Rect]) -> Vec<Rect> {
    let mut arena = boxes.to_vec();
    let mut live: BTreeSet<usize> = (0..arena.len()).collect();

    loop {
        let pair = live
            .iter()
            .copied()
            .tuple_combinations()
            .find(|&(i, j)| vertically_coincide(&arena[i], &arena[j]));
        let Some((i, j)) = pair else {
            break;
        };
        arena[j] = arena[j].union(&arena[i]);
        live.remove(&i);
    }

    live.into_iter().map(|idx| arena[idx]).collect()
}

/// Assigns a word box to one of an ordered list of bands.
///
/// Implementations must return an index into `bands`; the caller rejects any
/// other value.
pub trait BandLocalizer: Send + Sync + Debug {
    /// Index of the band `word` belongs to.
    fn localize(&self, word: &Rect, bands: &[Rect]) -> usize;
}

/// Picks the band that best covers a word's vertical center.
///
/// Bands are ranked by: containing the word's center line, overlapping the
/// word horizontally, length of the vertical overlap, and finally distance
/// between the vertical centers. Ties go to the lowest index.
#[derive(Debug, Clone, Copy, Default)]
pub struct CenterOverlapLocalizer;

impl BandLocalizer for CenterOverlapLocalizer {
    fn localize(&self, word: &Rect, bands: &[Rect]) -> usize {
        let center_y = word.center_y();

        let rank = |band: &Rect| {
            let contains = band.y1 <= center_y && center_y <= band.y2;
            let overlaps = word.horizontal_overlap(band) > 0.0;
            let distance = (band.center_y() - center_y).abs();
            (contains, overlaps, word.vertical_overlap(band), -distance)
        };

        let mut best = 0;
        let mut best_rank = None;
        for (idx, band) in bands.iter().enumerate() {
            let rank = rank(band);
            let better = match &best_rank {
                None => true,
                Some((c, o, v, d)) => {
                    (rank.0, rank.1)
                        .cmp(&(*c, *o))
                        .then(rank.2.total_cmp(v))
                        .then(rank.3.total_cmp(d))
                        .is_gt()
                }
            };
            if better {
                best = idx;
                best_rank = Some(rank);
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dilation_bridges_row_but_not_rows() {
        let mut image = GrayImage::new(200, 20);
        for x in 10..20 {
            image.put_pixel(x, 5, Luma([255]));
            image.put_pixel(x + 50, 5, Luma([255]));
            image.put_pixel(x, 12, Luma([255]));
        }
        let dilated = dilate_horizontal(&image, 41, 1, 1);
        // Gap of 40 pixels on row 5 is bridged.
        assert!((20..60).all(|x| dilated.get_pixel(x, 5)[0] == 255));
        // Nothing leaks into the rows in between.
        assert!((0..200).all(|x| dilated.get_pixel(x, 8)[0] == 0));
    }

    #[test]
    fn test_external_regions_sorted_by_top_then_left() {
        let mut image = GrayImage::new(50, 50);
        for (x0, y0) in [(30, 5), (2, 5), (2, 30)] {
            for y in y0..y0 + 4 {
                for x in x0..x0 + 10 {
                    image.put_pixel(x, y, Luma([255]));
                }
            }
        }
        let regions = external_regions(&image);
        assert_eq!(
            regions,
            vec![
                Rect::new(2.0, 5.0, 12.0, 9.0),
                Rect::new(30.0, 5.0, 40.0, 9.0),
                Rect::new(2.0, 30.0, 12.0, 34.0),
            ]
        );
    }

    #[test]
    fn test_external_regions_ignore_holes() {
        let mut image = GrayImage::new(30, 30);
        for y in 5..25 {
            for x in 5..25 {
                if !(10..20).contains(&x) || !(10..20).contains(&y) {
                    image.put_pixel(x, y, Luma([255]));
                }
            }
        }
        assert_eq!(external_regions(&image), vec![Rect::new(5.0, 5.0, 25.0, 25.0)]);
    }

    #[test]
    fn test_external_regions_touching_border() {
        let mut image = GrayImage::new(100, 20);
        for y in 5..8 {
            for x in 0..30 {
                image.put_pixel(x, y, Luma([255]));
            }
        }
        for y in 12..20 {
            for x in 50..100 {
                image.put_pixel(x, y, Luma([255]));
            }
        }
        assert_eq!(
            external_regions(&image),
            vec![Rect::new(0.0, 5.0, 30.0, 8.0), Rect::new(50.0, 12.0, 100.0, 20.0)]
        );

        let full = GrayImage::from_pixel(7, 3, Luma([255]));
        assert_eq!(external_regions(&full), vec![Rect::new(0.0, 0.0, 7.0, 3.0)]);
    }

    #[test]
    fn test_extract_bands_reach_page_edge() {
        // A 100 px element over 4 iterations spreads the word past both edges.
        let shape = PageShape::new(60, 200);
        let word = Polygon::from(Rect::new(10.0, 15.0, 80.0, 45.0));
        let bands = extract_bands(shape, &[word], &DilationPass::default());
        assert_eq!(bands.len(), 1);
        assert_eq!((bands[0].x1, bands[0].x2), (0.0, 200.0));
        assert!(bands[0].y1 > 15.0 && bands[0].y2 < 45.0);
    }

    #[test]
    fn test_extract_bands_one_per_row() {
        let shape = PageShape::new(120, 400);
        let words: Vec<Polygon> = [
            Rect::new(10.0, 10.0, 80.0, 40.0),
            Rect::new(100.0, 10.0, 170.0, 40.0),
            Rect::new(10.0, 70.0, 80.0, 100.0),
        ]
        .into_iter()
        .map(Polygon::from)
        .collect();
        let bands = extract_bands(shape, &words, &DilationPass::default());
        assert_eq!(bands.len(), 2);
        assert!(bands[0].y2 <= bands[1].y1);
        assert!(bands[0].x1 <= 30.0 && bands[0].x2 >= 150.0);
    }

    #[test]
    fn test_merge_coinciding_boxes() {
        let boxes = vec![
            Rect::new(0.0, 10.0, 50.0, 30.0),
            Rect::new(0.0, 60.0, 80.0, 80.0),
            Rect::new(60.0, 12.0, 120.0, 31.0),
        ];
        let merged = merge_boxes(&boxes);
        assert_eq!(
            merged,
            vec![Rect::new(0.0, 60.0, 80.0, 80.0), Rect::new(0.0, 10.0, 120.0, 31.0)]
        );
        assert_eq!(merge_boxes(&merged), merged);
    }

    #[test]
    fn test_merge_cascades_until_stable() {
        let boxes = vec![
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(20.0, 2.0, 30.0, 12.0),
            Rect::new(40.0, 4.0, 50.0, 14.0),
        ];
        let merged = merge_boxes(&boxes);
        assert_eq!(merged, vec![Rect::new(0.0, 0.0, 50.0, 14.0)]);
    }

    #[test]
    fn test_merge_keeps_separate_rows() {
        let boxes = vec![Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(0.0, 10.0, 10.0, 20.0)];
        assert_eq!(merge_boxes(&boxes), boxes);
        assert!(merge_boxes(&[]).is_empty());
    }

    #[test]
    fn test_localize_prefers_band_containing_center() {
        let bands = vec![
            Rect::new(0.0, 0.0, 300.0, 20.0),
            Rect::new(0.0, 25.0, 300.0, 45.0),
        ];
        let word = Rect::new(50.0, 18.0, 90.0, 40.0);
        assert_eq!(CenterOverlapLocalizer.localize(&word, &bands), 1);
    }

    #[test]
    fn test_localize_prefers_horizontal_overlap_then_lowest_index() {
        let bands = vec![
            Rect::new(200.0, 0.0, 300.0, 20.0),
            Rect::new(0.0, 0.0, 100.0, 20.0),
            Rect::new(0.0, 0.0, 100.0, 20.0),
        ];
        let word = Rect::new(10.0, 5.0, 40.0, 15.0);
        assert_eq!(CenterOverlapLocalizer.localize(&word, &bands), 1);
    }

    #[test]
    fn test_localize_falls_back_to_nearest_band() {
        let bands = vec![
            Rect::new(0.0, 0.0, 100.0, 10.0),
            Rect::new(0.0, 100.0, 100.0, 110.0),
        ];
        let word = Rect::new(10.0, 80.0, 40.0, 90.0);
        assert_eq!(CenterOverlapLocalizer.localize(&word, &bands), 1);
    }
}
