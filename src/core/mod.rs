//! The core module of the line-resolution engine.
//!
//! This module contains the ambient components shared by every other module:
//! - Configuration management
//! - Error handling
//! - Numeric validation helpers
//! - Configuration macros

pub mod config;
pub mod errors;
#[macro_use]
pub mod macros;
pub mod validation;

pub use config::{
    ConfigError, ConfigValidator, DilationPass, GeometricConfig, LayoutConfig, MaskConfig,
    ParallelPolicy, StrategyKind,
};
pub use errors::{LayoutError, LayoutResult, ProcessingStage};
