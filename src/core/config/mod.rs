//! Configuration management for line resolution.
//!
//! This module provides configuration types, validation traits, and utilities
//! for selecting and tuning a clustering strategy.

pub mod errors;
pub mod layout;
pub mod parallel;

pub use errors::{ConfigError, ConfigValidator};
pub use layout::{DilationPass, GeometricConfig, LayoutConfig, MaskConfig, StrategyKind};
pub use parallel::ParallelPolicy;
