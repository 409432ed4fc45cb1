//! Configuration for the line clustering strategies.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{ConfigError, ConfigValidator};
use super::parallel::ParallelPolicy;
use crate::core::errors::LayoutResult;
use crate::impl_config_validator;
use crate::pipeline::{ClusterStrategy, GeometricStrategy, MaskStrategy};

/// Configuration for the geometric (vertical-distance) clustering strategy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeometricConfig {
    /// Horizontal gap, in relative page units, that splits a line in two (default: 0.035).
    pub paragraph_break: f32,
}

impl Default for GeometricConfig {
    fn default() -> Self {
        Self {
            paragraph_break: crate::processors::DEFAULT_PARAGRAPH_BREAK,
        }
    }
}

impl_config_validator!(GeometricConfig {
    paragraph_break: positive(),
});

/// One shrink-mask + horizontal dilation pass producing line bands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DilationPass {
    /// Fraction of each word's area kept after shrinking, squared (default: 0.4).
    pub shrink_ratio: f32,
    /// Width of the rectangular structuring element in pixels (default: 100).
    pub kernel_width: u32,
    /// Height of the rectangular structuring element in pixels (default: 1).
    pub kernel_height: u32,
    /// Number of dilation iterations (default: 4).
    pub iterations: u32,
}

impl Default for DilationPass {
    fn default() -> Self {
        Self {
            shrink_ratio: crate::processors::DEFAULT_SHRINK_RATIO,
            kernel_width: 100,
            kernel_height: 1,
            iterations: 4,
        }
    }
}

impl_config_validator!(DilationPass {
    shrink_ratio: range(0.0, 1.0),
    kernel_width: range(1, 511),
    kernel_height: range(1, 511),
    iterations: min(1),
});

/// Configuration for the mask/dilation clustering strategy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MaskConfig {
    /// The band-producing pass that always runs.
    pub primary: DilationPass,
    /// Optional second pass; its bands are merged with the primary ones.
    pub secondary: Option<DilationPass>,
}

impl ConfigValidator for MaskConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.primary.validate()?;
        if let Some(secondary) = &self.secondary {
            secondary.validate()?;
        }
        Ok(())
    }
}

/// Which clustering strategy an orchestrator should use.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Vertical-center clustering over the reading-order sort.
    #[default]
    Geometric,
    /// Shrink-mask dilation bands.
    Mask,
}

/// Top-level configuration for line resolution.
///
/// # Example
///
/// ```rust
/// use wordline::core::config::{LayoutConfig, StrategyKind};
///
/// let config = LayoutConfig::from_json_str(r#"{"strategy": "mask"}"#).unwrap();
/// assert_eq!(config.strategy, StrategyKind::Mask);
/// assert_eq!(config.mask.primary.kernel_width, 100);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Selected strategy.
    pub strategy: StrategyKind,
    /// Settings for [`StrategyKind::Geometric`].
    pub geometric: GeometricConfig,
    /// Settings for [`StrategyKind::Mask`].
    pub mask: MaskConfig,
    /// Settings for multi-page batches.
    pub parallel: ParallelPolicy,
}

impl LayoutConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> LayoutResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> LayoutResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Validates the configuration and builds the selected strategy.
    pub fn build_strategy(&self) -> LayoutResult<Box<dyn ClusterStrategy>> {
        self.validate()?;
        let strategy: Box<dyn ClusterStrategy> = match self.strategy {
            StrategyKind::Geometric => Box::new(GeometricStrategy::new(self.geometric.clone())),
            StrategyKind::Mask => Box::new(MaskStrategy::new(self.mask.clone())),
        };
        Ok(strategy)
    }
}

impl ConfigValidator for LayoutConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        match self.strategy {
            StrategyKind::Geometric => self.geometric.validate(),
            StrategyKind::Mask => self.mask.validate(),
        }
    }
}
