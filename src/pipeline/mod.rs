//! The line resolution pipeline.
//!
//! This module ties the processors together:
//!
//! - [`ClusterStrategy`] - the word-to-line clustering capability, with the
//!   [`GeometricStrategy`] and [`MaskStrategy`] implementations
//! - [`PageLayout`] - the ordered lines of a page
//! - [`PageReader`] - detection, line resolution and recognition of a page image
//! - [`resolve_pages`] - batch resolution over many pages

pub mod batch;
pub mod reader;
pub mod result;
pub mod strategy;

pub use batch::resolve_pages;
pub use reader::{
    Detections, Detector, PageReader, PageReaderBuilder, PageText, RecognizedWord, Recognizer,
};
pub use result::{PageLayout, WordEntry};
pub use strategy::{ClusterStrategy, GeometricStrategy, MaskStrategy, Page};
