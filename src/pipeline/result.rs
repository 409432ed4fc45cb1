//! Result types for line resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::processors::lines::Line;

/// Position of one word in the resolved layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordEntry {
    /// Zero-based line number, top to bottom.
    pub line_no: usize,
    /// Zero-based position of the word within its line, left to right.
    pub word_no: usize,
    /// Index of the word in the detector's output.
    pub word_index: usize,
}

/// The ordered lines of one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageLayout {
    /// Lines top to bottom; each holds word indices left to right.
    pub lines: Vec<Line>,
}

impl PageLayout {
    /// Wraps resolved lines.
    pub fn new(lines: Vec<Line>) -> Self {
        Self { lines }
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total number of words across all lines.
    pub fn word_count(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }

    /// Whether the layout holds no words.
    pub fn is_empty(&self) -> bool {
        self.word_count() == 0
    }

    /// Word indices in reading order: line by line, left to right.
    pub fn reading_order(&self) -> Vec<usize> {
        self.lines.iter().flatten().copied().collect()
    }

    /// One entry per word, in reading order.
    pub fn entries(&self) -> impl Iterator<Item = WordEntry> + '_ {
        self.lines.iter().enumerate().flat_map(|(line_no, line)| {
            line.iter().enumerate().map(move |(word_no, &word_index)| WordEntry {
                line_no,
                word_no,
                word_index,
            })
        })
    }

    /// Whether every index in `0..word_count` appears in exactly one line.
    pub fn is_partition_of(&self, word_count: usize) -> bool {
        let mut seen = vec![false; word_count];
        for idx in self.lines.iter().flatten().copied() {
            match seen.get_mut(idx) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        seen.into_iter().all(|s| s)
    }
}

impl fmt::Display for PageLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (line_no, line) in self.lines.iter().enumerate() {
            writeln!(f, "line {}: {:?}", line_no, line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_follow_reading_order() {
        let layout = PageLayout::new(vec![vec![2, 0], vec![1]]);
        let entries: Vec<WordEntry> = layout.entries().collect();
        assert_eq!(
            entries,
            vec![
                WordEntry { line_no: 0, word_no: 0, word_index: 2 },
                WordEntry { line_no: 0, word_no: 1, word_index: 0 },
                WordEntry { line_no: 1, word_no: 0, word_index: 1 },
            ]
        );
        assert_eq!(layout.reading_order(), vec![2, 0, 1]);
        assert_eq!(layout.word_count(), 3);
        assert_eq!(layout.line_count(), 2);
    }

    #[test]
    fn test_partition_check() {
        assert!(PageLayout::new(vec![vec![2, 0], vec![1]]).is_partition_of(3));
        assert!(!PageLayout::new(vec![vec![0, 0], vec![1]]).is_partition_of(3));
        assert!(!PageLayout::new(vec![vec![0], vec![1]]).is_partition_of(3));
        assert!(!PageLayout::new(vec![vec![0, 3]]).is_partition_of(2));
        assert!(PageLayout::default().is_partition_of(0));
    }

    #[test]
    fn test_display() {
        let layout = PageLayout::new(vec![vec![1, 0]]);
        assert_eq!(layout.to_string(), "line 0: [1, 0]\n");
    }
}
