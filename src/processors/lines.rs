//! Geometric line clustering.
//!
//! Words are scanned in reading order and grouped while their vertical center
//! stays within half the page's median word height of the running line
//! center. Each vertical group is then split on wide horizontal gaps.

use super::geometry::{median, Rect, WordBox};
use super::sorting::sort_boxes;
use crate::core::errors::LayoutResult;

/// Default horizontal gap, in relative units, that starts a new sub-line.
pub const DEFAULT_PARAGRAPH_BREAK: f32 = 0.035;

/// An ordered sequence of word indices, left to right.
pub type Line = Vec<usize>;

/// Groups boxes into lines.
///
/// Returns a partition of `0..boxes.len()`: lines come out top to bottom and
/// every line is ordered left to right. `paragraph_break` is expressed in the
/// same units as the box coordinates.
pub fn resolve_lines(boxes: &[WordBox], paragraph_break: f32) -> LayoutResult<Vec<Line>> {
    if boxes.is_empty() {
        return Ok(Vec::new());
    }

    let sorted = sort_boxes(boxes)?;
    let straight = &sorted.boxes;
    let y_med = median(straight.iter().map(Rect::height)).unwrap_or(0.0);

    let mut lines = Vec::new();
    let mut words: Vec<usize> = Vec::new();
    let mut y_center_sum = 0.0;

    for &idx in &sorted.order {
        let y_center = straight[idx].center_y();
        if !words.is_empty() {
            let y_dist = (y_center - y_center_sum / words.len() as f32).abs();
            if y_dist >= y_med / 2.0 {
                lines.extend(split_sub_lines(straight, &words, paragraph_break));
                words.clear();
                y_center_sum = 0.0;
            }
        }
        words.push(idx);
        y_center_sum += y_center;
    }

    if !words.is_empty() {
        lines.extend(split_sub_lines(straight, &words, paragraph_break));
    }

    tracing::debug!(
        words = boxes.len(),
        lines = lines.len(),
        median_height = y_med,
        "resolved lines"
    );

    Ok(lines)
}

/// Splits one vertical cluster into left-to-right sub-lines.
///
/// Words are sorted by their left edge; a new sub-line starts wherever the gap
/// between a word's right edge and the next word's left edge reaches
/// `paragraph_break`.
pub fn split_sub_lines(boxes: &[Rect], word_indices: &[usize], paragraph_break: f32) -> Vec<Line> {
    let mut words = word_indices.to_vec();
    words.sort_by(|&a, &b| boxes[a].x1.total_cmp(&boxes[b].x1));

    if words.len() < 2 {
        return vec![words];
    }

    let mut lines = Vec::new();
    let mut sub_line = vec![words[0]];
    for &idx in &words[1..] {
        let prev = sub_line[sub_line.len() - 1];
        let dist = boxes[idx].x1 - boxes[prev].x2;
        if dist >= paragraph_break {
            lines.push(std::mem::take(&mut sub_line));
        }
        sub_line.push(idx);
    }
    lines.push(sub_line);

    lines
}
