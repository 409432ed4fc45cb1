//! Page reading: detection, line resolution and recognition in reading order.
//!
//! The detector and recognizer are external collaborators; this module only
//! orders their inputs and outputs.

use std::sync::Arc;

use image::RgbImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::strategy::{ClusterStrategy, Page};
use crate::core::config::{LayoutConfig, ParallelPolicy};
use crate::core::errors::{LayoutError, LayoutResult};
use crate::processors::geometry::{CoordinateSpace, PageShape, WordBox};

/// Word boxes found on a page, with one crop per box.
#[derive(Debug, Clone, Default)]
pub struct Detections {
    /// Detected word boxes.
    pub boxes: Vec<WordBox>,
    /// Image crop of each box, index-aligned with `boxes`.
    pub crops: Vec<RgbImage>,
    /// Coordinate convention of `boxes`.
    pub space: CoordinateSpace,
}

/// Finds word boxes on a page image.
pub trait Detector: Send + Sync {
    /// Detects the words of `image`.
    fn detect(&self, image: &RgbImage) -> LayoutResult<Detections>;
}

/// Reads the text of word crops.
pub trait Recognizer: Send + Sync {
    /// Returns one string per crop, in the order given.
    fn recognize(&self, crops: &[&RgbImage]) -> LayoutResult<Vec<String>>;
}

/// A recognized word and its place in the page layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecognizedWord {
    /// Zero-based line number, top to bottom.
    pub line_no: usize,
    /// Zero-based position within the line, left to right.
    pub word_no: usize,
    /// Index of the word in the detector's output.
    pub word_index: usize,
    /// Recognized text.
    pub text: String,
    /// The detected box.
    pub bbox: WordBox,
}

/// The text of one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PageText {
    /// Words in reading order.
    pub words: Vec<RecognizedWord>,
    /// One string per line, words joined by the reader's separator.
    pub lines: Vec<String>,
}

impl PageText {
    /// Whether nothing was read.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// All lines joined by newlines.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Builder for [`PageReader`].
pub struct PageReaderBuilder {
    detector: Arc<dyn Detector>,
    recognizer: Arc<dyn Recognizer>,
    config: LayoutConfig,
    strategy: Option<Box<dyn ClusterStrategy>>,
    separator: String,
}

impl PageReaderBuilder {
    /// Starts a builder with the default configuration.
    pub fn new(detector: Arc<dyn Detector>, recognizer: Arc<dyn Recognizer>) -> Self {
        Self {
            detector,
            recognizer,
            config: LayoutConfig::default(),
            strategy: None,
            separator: " ".to_string(),
        }
    }

    /// Sets the layout configuration; its strategy is built on [`build`](Self::build).
    pub fn config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses an already built strategy instead of the configured one.
    pub fn strategy(mut self, strategy: Box<dyn ClusterStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Sets the string placed between words of a line.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Builds the reader, validating the configuration.
    pub fn build(self) -> LayoutResult<PageReader> {
        let strategy = match self.strategy {
            Some(strategy) => strategy,
            None => self.config.build_strategy()?,
        };
        Ok(PageReader {
            detector: self.detector,
            recognizer: self.recognizer,
            strategy,
            parallel: self.config.parallel,
            separator: self.separator,
        })
    }
}

/// Reads pages: detects words, orders them into lines and recognizes them.
pub struct PageReader {
    detector: Arc<dyn Detector>,
    recognizer: Arc<dyn Recognizer>,
    strategy: Box<dyn ClusterStrategy>,
    parallel: ParallelPolicy,
    separator: String,
}

impl std::fmt::Debug for PageReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageReader")
            .field("strategy", &self.strategy)
            .field("parallel", &self.parallel)
            .field("separator", &self.separator)
            .finish_non_exhaustive()
    }
}

impl PageReader {
    /// The clustering strategy in use.
    pub fn strategy(&self) -> &dyn ClusterStrategy {
        self.strategy.as_ref()
    }

    /// Reads one page image.
    ///
    /// Crops are handed to the recognizer in reading order, in one batch.
    /// A page without detections yields an empty [`PageText`].
    pub fn read(&self, image: &RgbImage) -> LayoutResult<PageText> {
        let detections = self.detector.detect(image)?;
        if detections.boxes.is_empty() {
            tracing::debug!("no words detected");
            return Ok(PageText::default());
        }
        if detections.crops.len() != detections.boxes.len() {
            return Err(LayoutError::validation_error(
                "PageReader",
                "crops",
                format!("{} crops", detections.boxes.len()),
                format!("{} crops", detections.crops.len()),
            ));
        }

        let Detections { boxes, crops, space } = detections;
        let page = Page::new(boxes, PageShape::new(image.height(), image.width()), space);
        let layout = self.strategy.layout(&page)?;
        if !layout.is_partition_of(page.len()) {
            return Err(LayoutError::InvalidInput {
                message: format!(
                    "strategy '{}' did not partition {} words",
                    self.strategy.name(),
                    page.len()
                ),
            });
        }

        let order = layout.reading_order();
        let ordered_crops: Vec<&RgbImage> = order.iter().map(|&idx| &crops[idx]).collect();
        let texts = self.recognizer.recognize(&ordered_crops)?;
        if texts.len() != order.len() {
            return Err(LayoutError::validation_error(
                "PageReader",
                "recognized texts",
                format!("{} texts", order.len()),
                format!("{} texts", texts.len()),
            ));
        }

        let words: Vec<RecognizedWord> = layout
            .entries()
            .zip(texts)
            .map(|(entry, text)| RecognizedWord {
                line_no: entry.line_no,
                word_no: entry.word_no,
                word_index: entry.word_index,
                text,
                bbox: page.boxes[entry.word_index],
            })
            .collect();

        let mut lines = vec![Vec::new(); layout.line_count()];
        for word in &words {
            lines[word.line_no].push(word.text.as_str());
        }
        let lines: Vec<String> = lines.into_iter().map(|line| line.join(&self.separator)).collect();

        tracing::debug!(
            strategy = self.strategy.name(),
            words = words.len(),
            lines = layout.line_count(),
            "read page"
        );

        Ok(PageText { words, lines })
    }

    /// Reads several pages, in parallel when the batch is large enough.
    pub fn read_batch(&self, images: &[RgbImage]) -> LayoutResult<Vec<PageText>> {
        if self.parallel.should_parallelize(images.len()) {
            images.par_iter().map(|image| self.read(image)).collect()
        } else {
            images.iter().map(|image| self.read(image)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::StrategyKind;
    use crate::core::errors::ProcessingStage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Detector returning fixed boxes; each crop is a 1x1 image whose red
    /// channel holds the box index.
    #[derive(Debug)]
    struct FixedDetector {
        boxes: Vec<WordBox>,
        crops: usize,
    }

    impl FixedDetector {
        fn new(boxes: Vec<WordBox>) -> Self {
            let crops = boxes.len();
            Self { boxes, crops }
        }
    }

    impl Detector for FixedDetector {
        fn detect(&self, _image: &RgbImage) -> LayoutResult<Detections> {
            Ok(Detections {
                boxes: self.boxes.clone(),
                crops: (0..self.crops)
                    .map(|i| RgbImage::from_pixel(1, 1, image::Rgb([i as u8, 0, 0])))
                    .collect(),
                space: CoordinateSpace::Absolute,
            })
        }
    }

    /// Recognizer naming each crop after the box index it carries.
    #[derive(Debug, Default)]
    struct IndexRecognizer {
        calls: AtomicUsize,
    }

    impl Recognizer for IndexRecognizer {
        fn recognize(&self, crops: &[&RgbImage]) -> LayoutResult<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(crops
                .iter()
                .map(|crop| format!("w{}", crop.get_pixel(0, 0)[0]))
                .collect())
        }
    }

    #[derive(Debug)]
    struct FailingRecognizer;

    impl Recognizer for FailingRecognizer {
        fn recognize(&self, _crops: &[&RgbImage]) -> LayoutResult<Vec<String>> {
            Err(LayoutError::collaborator_error(
                ProcessingStage::Recognition,
                "text recognizer",
                std::io::Error::new(std::io::ErrorKind::Other, "model unavailable"),
            ))
        }
    }

    fn page_boxes() -> Vec<WordBox> {
        vec![
            WordBox::straight(100.0, 110.0, 180.0, 140.0),
            WordBox::straight(10.0, 10.0, 90.0, 40.0),
            WordBox::straight(10.0, 110.0, 90.0, 140.0),
            WordBox::straight(100.0, 12.0, 180.0, 42.0),
        ]
    }

    fn page_image() -> RgbImage {
        RgbImage::new(400, 200)
    }

    #[test]
    fn test_read_orders_words_and_lines() {
        let recognizer = Arc::new(IndexRecognizer::default());
        let reader = PageReaderBuilder::new(Arc::new(FixedDetector::new(page_boxes())), recognizer.clone())
            .build()
            .unwrap();
        let text = reader.read(&page_image()).unwrap();

        assert_eq!(text.lines, vec!["w1 w3".to_string(), "w2 w0".to_string()]);
        assert_eq!(text.text(), "w1 w3\nw2 w0");
        let indices: Vec<usize> = text.words.iter().map(|w| w.word_index).collect();
        assert_eq!(indices, vec![1, 3, 2, 0]);
        assert_eq!(text.words[3].line_no, 1);
        assert_eq!(text.words[3].word_no, 1);
        assert_eq!(text.words[3].bbox, page_boxes()[0]);
        assert_eq!(recognizer.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_read_with_mask_strategy_and_separator() {
        let config = LayoutConfig {
            strategy: StrategyKind::Mask,
            ..LayoutConfig::default()
        };
        let reader = PageReaderBuilder::new(
            Arc::new(FixedDetector::new(page_boxes())),
            Arc::new(IndexRecognizer::default()),
        )
        .config(config)
        .separator("|")
        .build()
        .unwrap();
        assert_eq!(reader.strategy().name(), "mask");
        let text = reader.read(&page_image()).unwrap();
        assert_eq!(text.lines, vec!["w1|w3".to_string(), "w2|w0".to_string()]);
    }

    #[test]
    fn test_read_without_detections_skips_recognition() {
        let recognizer = Arc::new(IndexRecognizer::default());
        let reader = PageReaderBuilder::new(Arc::new(FixedDetector::new(Vec::new())), recognizer.clone())
            .build()
            .unwrap();
        let text = reader.read(&page_image()).unwrap();
        assert!(text.is_empty());
        assert!(text.lines.is_empty());
        assert_eq!(recognizer.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_read_rejects_crop_mismatch() {
        let detector = FixedDetector {
            boxes: page_boxes(),
            crops: 3,
        };
        let reader = PageReaderBuilder::new(Arc::new(detector), Arc::new(IndexRecognizer::default()))
            .build()
            .unwrap();
        assert!(matches!(
            reader.read(&page_image()),
            Err(LayoutError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_read_propagates_recognizer_failure() {
        let reader = PageReaderBuilder::new(
            Arc::new(FixedDetector::new(page_boxes())),
            Arc::new(FailingRecognizer),
        )
        .build()
        .unwrap();
        assert!(matches!(
            reader.read(&page_image()),
            Err(LayoutError::Processing {
                kind: ProcessingStage::Recognition,
                ..
            })
        ));
    }

    #[test]
    fn test_read_batch_parallel_matches_sequential() {
        let config = LayoutConfig {
            parallel: ParallelPolicy::new().with_page_threshold(1),
            ..LayoutConfig::default()
        };
        let reader = PageReaderBuilder::new(
            Arc::new(FixedDetector::new(page_boxes())),
            Arc::new(IndexRecognizer::default()),
        )
        .config(config)
        .build()
        .unwrap();
        let images = vec![page_image(); 3];
        let pages = reader.read_batch(&images).unwrap();
        assert_eq!(pages.len(), 3);
        assert!(pages.iter().all(|p| p == &pages[0]));
        assert_eq!(pages[0], reader.read(&images[0]).unwrap());
    }
}
