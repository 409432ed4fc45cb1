//! Line clustering strategies.
//!
//! Both strategies consume a [`Page`] and produce the same output shape: a
//! partition of the page's word indices into lines, top to bottom, each line
//! ordered left to right.

use std::fmt::Debug;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::result::PageLayout;
use crate::core::config::{ConfigValidator, GeometricConfig, MaskConfig};
use crate::core::errors::{LayoutError, LayoutResult};
use crate::processors::bands::{extract_bands, merge_boxes, sort_bands, BandLocalizer, CenterOverlapLocalizer};
use crate::processors::geometry::{CoordinateSpace, PageShape, Polygon, Rect, WordBox};
use crate::processors::lines::{resolve_lines, Line};

/// The word boxes of one page together with the page they were detected on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page {
    /// Detected word boxes.
    pub boxes: Vec<WordBox>,
    /// Page size in pixels.
    pub shape: PageShape,
    /// Coordinate convention of `boxes`.
    #[serde(default)]
    pub space: CoordinateSpace,
}

impl Page {
    /// Creates a page.
    pub fn new(boxes: Vec<WordBox>, shape: PageShape, space: CoordinateSpace) -> Self {
        Self { boxes, shape, space }
    }

    /// A page whose boxes are normalized to `[0, 1]`.
    pub fn relative(boxes: Vec<WordBox>, shape: PageShape) -> Self {
        Self::new(boxes, shape, CoordinateSpace::Relative)
    }

    /// A page whose boxes are in pixels.
    pub fn absolute(boxes: Vec<WordBox>, shape: PageShape) -> Self {
        Self::new(boxes, shape, CoordinateSpace::Absolute)
    }

    /// Number of words on the page.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Whether the page has no words.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Boxes normalized by the page shape.
    pub fn relative_boxes(&self) -> LayoutResult<Vec<WordBox>> {
        match self.space {
            CoordinateSpace::Relative => Ok(self.boxes.clone()),
            CoordinateSpace::Absolute => {
                self.ensure_non_empty_shape()?;
                let (sx, sy) = (1.0 / self.shape.width as f32, 1.0 / self.shape.height as f32);
                Ok(self.boxes.iter().map(|b| b.scaled(sx, sy)).collect())
            }
        }
    }

    /// Boxes in page pixels.
    pub fn absolute_boxes(&self) -> LayoutResult<Vec<WordBox>> {
        match self.space {
            CoordinateSpace::Absolute => Ok(self.boxes.clone()),
            CoordinateSpace::Relative => {
                self.ensure_non_empty_shape()?;
                let (sx, sy) = (self.shape.width as f32, self.shape.height as f32);
                Ok(self.boxes.iter().map(|b| b.scaled(sx, sy)).collect())
            }
        }
    }

    fn ensure_non_empty_shape(&self) -> LayoutResult<()> {
        if self.shape.width == 0 || self.shape.height == 0 {
            return Err(LayoutError::validation_error(
                "Page",
                "shape",
                "non-zero height and width",
                format!("{}x{}", self.shape.height, self.shape.width),
            ));
        }
        Ok(())
    }
}

/// A word-to-line clustering strategy.
pub trait ClusterStrategy: Send + Sync + Debug {
    /// Short identifier used in logs and configuration.
    fn name(&self) -> &str;

    /// Partitions the page's word indices into ordered lines.
    fn resolve(&self, page: &Page) -> LayoutResult<Vec<Line>>;

    /// Resolves the page and wraps the lines in a [`PageLayout`].
    fn layout(&self, page: &Page) -> LayoutResult<PageLayout> {
        Ok(PageLayout::new(self.resolve(page)?))
    }
}

/// Clusters words by the vertical distance of their centers in reading order.
///
/// Works on relative coordinates; absolute pages are normalized first.
#[derive(Debug, Clone, Default)]
pub struct GeometricStrategy {
    config: GeometricConfig,
}

impl GeometricStrategy {
    /// Creates the strategy.
    pub fn new(config: GeometricConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &GeometricConfig {
        &self.config
    }
}

impl ClusterStrategy for GeometricStrategy {
    fn name(&self) -> &str {
        "geometric"
    }

    fn resolve(&self, page: &Page) -> LayoutResult<Vec<Line>> {
        if page.is_empty() {
            return Ok(Vec::new());
        }
        let boxes = page.relative_boxes()?;
        resolve_lines(&boxes, self.config.paragraph_break)
    }
}

/// Clusters words through horizontally dilated shrink masks.
///
/// Every word is rasterized as a shrunken polygon, the mask is smeared
/// horizontally so that words of one row fuse into a band, and each word is
/// assigned to a band by the configured [`BandLocalizer`].
#[derive(Debug, Clone)]
pub struct MaskStrategy {
    config: MaskConfig,
    localizer: Arc<dyn BandLocalizer>,
}

impl MaskStrategy {
    /// Creates the strategy with the [`CenterOverlapLocalizer`].
    ///
    /// The configuration is taken as is. Kernel sizes outside `1..=511`
    /// panic during dilation; use [`MaskStrategy::try_new`] for untrusted
    /// configurations.
    pub fn new(config: MaskConfig) -> Self {
        Self {
            config,
            localizer: Arc::new(CenterOverlapLocalizer),
        }
    }

    /// Validates `config` and creates the strategy.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ConfigError`] when a dilation pass is out of range.
    pub fn try_new(config: MaskConfig) -> LayoutResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Replaces the band localizer.
    pub fn with_localizer(mut self, localizer: Arc<dyn BandLocalizer>) -> Self {
        self.localizer = localizer;
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    /// Extracts the line bands of a page.
    ///
    /// Runs the primary pass and, when configured, the secondary pass, whose
    /// bands are merged into the primary ones.
    ///
    /// # Arguments
    ///
    /// * `shape` - Page size the mask is rasterized at.
    /// * `polygons` - Word polygons in page pixels.
    ///
    /// # Returns
    ///
    /// Bands in pixels, sorted by top edge then left edge. Empty when no
    /// polygon survives shrinking.
    pub fn bands(&self, shape: PageShape, polygons: &[Polygon]) -> Vec<Rect> {
        let mut bands = extract_bands(shape, polygons, &self.config.primary);
        if let Some(secondary) = &self.config.secondary {
            bands.extend(extract_bands(shape, polygons, secondary));
            sort_bands(&mut bands);
            bands = merge_boxes(&bands);
            sort_bands(&mut bands);
        }
        bands
    }
}

impl Default for MaskStrategy {
    fn default() -> Self {
        Self::new(MaskConfig::default())
    }
}

impl ClusterStrategy for MaskStrategy {
    fn name(&self) -> &str {
        "mask"
    }

    fn resolve(&self, page: &Page) -> LayoutResult<Vec<Line>> {
        if page.is_empty() {
            return Ok(Vec::new());
        }
        let boxes = page.absolute_boxes()?;
        let polygons: Vec<Polygon> = boxes.iter().map(|b| Polygon::from(b.to_quad())).collect();
        let words: Vec<Rect> = boxes.iter().map(|b| b.bounding_rect().truncated()).collect();

        let mut bands = self.bands(page.shape, &polygons);
        if bands.is_empty() {
            tracing::warn!(words = words.len(), "no line band found, using word boxes as bands");
            bands = words.clone();
            sort_bands(&mut bands);
        }

        let mut members: Vec<Line> = vec![Vec::new(); bands.len()];
        for (idx, word) in words.iter().enumerate() {
            let band = self.localizer.localize(word, &bands);
            let bands_len = bands.len();
            let slot = members.get_mut(band).ok_or(LayoutError::BandOutOfRange {
                index: band,
                bands: bands_len,
            })?;
            slot.push(idx);
        }

        let lines: Vec<Line> = members
            .into_iter()
            .filter(|line| !line.is_empty())
            .map(|mut line| {
                line.sort_by(|&a, &b| words[a].x1.total_cmp(&words[b].x1));
                line
            })
            .collect();

        tracing::debug!(
            words = words.len(),
            bands = bands.len(),
            lines = lines.len(),
            "resolved lines from mask bands"
        );

        Ok(lines)
    }
}
