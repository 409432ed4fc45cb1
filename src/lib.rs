//! # wordline
//!
//! Resolves detected word boxes on a page into ordered lines of text.
//!
//! Given the word boxes an OCR detector produced for a page (straight boxes or
//! oriented quadrilaterals), the engine estimates and corrects page skew,
//! sorts the words into approximate reading order and groups them into lines,
//! each line ordered left to right. Two interchangeable strategies are
//! provided:
//!
//! - **Geometric**: words join a line while their vertical center stays close
//!   to the running line center; lines are split on wide horizontal gaps.
//! - **Mask**: words are rasterized as shrunken polygons, the mask is dilated
//!   horizontally into line bands and every word is assigned to a band.
//!
//! ## Modules
//!
//! * [`core`] - errors, configuration and validation
//! * [`processors`] - geometry, rotation, sorting, clustering and band processing
//! * [`pipeline`] - clustering strategies, page reading and batch resolution
//! * [`utils`] - logging setup
//!
//! ## Example
//!
//! ```rust
//! use wordline::pipeline::{ClusterStrategy, GeometricStrategy, Page};
//! use wordline::processors::{PageShape, WordBox};
//!
//! let page = Page::relative(
//!     vec![
//!         WordBox::straight(0.015, 0.020, 0.025, 0.025),
//!         WordBox::straight(0.000, 0.000, 0.010, 0.005),
//!         WordBox::straight(0.000, 0.020, 0.010, 0.025),
//!         WordBox::straight(0.015, 0.000, 0.025, 0.005),
//!     ],
//!     PageShape::new(1000, 1000),
//! );
//! let lines = GeometricStrategy::default().resolve(&page)?;
//! assert_eq!(lines, vec![vec![1, 3], vec![2, 0]]);
//! # Ok::<(), wordline::core::LayoutError>(())
//! ```

pub mod core;
pub mod pipeline;
pub mod processors;
pub mod utils;

pub use crate::core::{LayoutConfig, LayoutError, LayoutResult};
pub use crate::pipeline::{
    resolve_pages, ClusterStrategy, GeometricStrategy, MaskStrategy, Page, PageLayout, PageReader,
    PageReaderBuilder,
};
pub use crate::processors::{PageShape, Point, Quad, Rect, WordBox};
