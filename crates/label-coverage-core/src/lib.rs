//! Core geometry for normalized object-detection labels.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! read label files, render anything, or log from its operations; callers
//! feed it already-tokenized numbers and get pixel geometry and coverage
//! values back.
//!
//! Pipeline:
//! - [`denormalize_bbox`] / [`CenterBox`]: center-format boxes to integer
//!   pixel corners (truncating toward zero).
//! - [`denormalize_polygon`]: flat `x0 y0 x1 y1 ...` fractions to pixel
//!   vertices.
//! - [`polygon_area`]: shoelace area of a closed polygon.
//! - [`coverage_percentage`] / [`summarize`]: percentage of the image and a
//!   dataset-level sum.
//!
//! ```
//! use label_coverage_core::{coverage_percentage, denormalize_polygon, polygon_area};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let vertices = denormalize_polygon(&[0.0, 0.0, 0.4, 0.0, 0.0, 0.3], 10.0, 10.0)?;
//! let area = polygon_area(&vertices)?;
//! assert_eq!(area, 6.0);
//! assert_eq!(coverage_percentage(area, 10.0, 10.0)?, 6.0);
//! # Ok(())
//! # }
//! ```

mod annotation;
mod bbox;
mod coverage;
mod error;
mod extent;
mod logger;
mod polygon;
mod shoelace;

pub use annotation::{AnnotationRecord, AnnotationShape};
pub use bbox::{denormalize_bbox, BoundingBox, CenterBox};
pub use coverage::{
    annotation_coverage, bbox_coverage, coverage_batch, coverage_percentage,
    normalized_coverage_percentage, polygon_coverage, summarize, CoverageResult, DatasetSummary,
};
pub use error::{BatchError, CoverageError, DivisionError, ValidationError};
pub use extent::ImageExtent;
pub use polygon::{denormalize_polygon, Polygon};
pub use shoelace::{polygon_area, signed_area};

#[cfg(feature = "rayon")]
pub use coverage::coverage_batch_par;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;

/// Pixel-space point. Polygon vertices keep sub-pixel precision.
pub type PixelPoint = nalgebra::Point2<f64>;
