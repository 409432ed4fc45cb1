//! Error handling for the line-resolution engine.

mod types;

pub use types::{LayoutError, LayoutResult, ProcessingStage};
