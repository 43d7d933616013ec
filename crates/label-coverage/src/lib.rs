//! Label-file front end for [`label_coverage_core`].
//!
//! This crate provides:
//! - a tokenizer for normalized label files (one annotation per line),
//! - a JSON [`CoverageConfig`] with class names and image sizes,
//! - per-file and per-dataset coverage reports with a fixed-width text table,
//! - the `label-coverage` binary (feature `cli`, on by default).
//!
//! ## Quickstart
//!
//! ```
//! use label_coverage::{analyze_text, render_table, CoverageConfig};
//! use label_coverage::core::ImageExtent;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut cfg = CoverageConfig::default();
//! cfg.class_names.insert(0, "Car".into());
//!
//! let extent = ImageExtent::new(10, 10)?;
//! let report = analyze_text("img_001.txt", "0 0 0 0.4 0 0 0.3\n", extent, &cfg)?;
//! assert_eq!(report.summary.total_area(), 6.0);
//! println!("{}", render_table(&report));
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//! - `cli` (default): the `label-coverage` binary.
//! - `rayon`: annotations of one file are measured in parallel.
//! - `tracing`: `tracing` spans and events instead of the `log` facade.

pub use label_coverage_core as core;

mod analyze;
mod config;
mod parse;
mod report;

pub use analyze::{analyze_file, analyze_inputs, analyze_text, AnalyzeError};
pub use config::{CoverageConfig, CoverageIoError, LabelInput};
pub use parse::{parse_annotation_line, parse_annotations, ParseError};
pub use report::{render_table, DatasetReport, FileReport};
