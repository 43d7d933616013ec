use label_coverage_core::{
    summarize, AnnotationRecord, AnnotationShape, BatchError, CoverageError, CoverageResult,
    ImageExtent,
};
use std::{fs, path::Path};

#[cfg(not(feature = "tracing"))]
use log::{debug, info, warn};
#[cfg(feature = "tracing")]
use tracing::{debug, info, instrument, warn};

use crate::{parse_annotations, CoverageConfig, DatasetReport, FileReport, LabelInput, ParseError};

/// Errors produced while analyzing one label file.
#[derive(thiserror::Error, Debug)]
pub enum AnalyzeError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ParseError,
    },

    #[error("{path}: annotation #{index}: {source}")]
    Coverage {
        path: String,
        index: usize,
        #[source]
        source: CoverageError,
    },
}

fn coverage_results(
    records: &[AnnotationRecord],
    extent: ImageExtent,
    cfg: &CoverageConfig,
) -> Result<Vec<CoverageResult>, BatchError> {
    let label = |id: u32| Some(cfg.class_name(id));

    #[cfg(feature = "rayon")]
    let results = label_coverage_core::coverage_batch_par(records, extent, label);
    #[cfg(not(feature = "rayon"))]
    let results = label_coverage_core::coverage_batch(records, extent, label);

    results
}

/// Analyze the contents of a label file already read into memory.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(text, extent, cfg), fields(extent = %extent))
)]
pub fn analyze_text(
    label_path: &str,
    text: &str,
    extent: ImageExtent,
    cfg: &CoverageConfig,
) -> Result<FileReport, AnalyzeError> {
    let records = parse_annotations(text).map_err(|source| AnalyzeError::Parse {
        path: label_path.to_string(),
        source,
    })?;

    for (idx, rec) in records.iter().enumerate() {
        if let AnnotationShape::BoundingBox(b) = rec.shape() {
            let px = b.denormalize(extent);
            if px.is_inverted() {
                warn!(
                    "{label_path}: annotation #{idx} box is inverted: {:?}",
                    px.to_array()
                );
            }
        }
    }

    let results = coverage_results(&records, extent, cfg).map_err(|err| AnalyzeError::Coverage {
        path: label_path.to_string(),
        index: err.index,
        source: err.source,
    })?;

    for (rec, r) in records.iter().zip(&results) {
        debug!(
            "{label_path}: class {} area={:.2}px^2 coverage={:.2}% vertices={}",
            rec.class_id,
            r.area(),
            r.percentage(),
            r.vertex_count()
        );
    }

    let summary = summarize(results);
    info!(
        "{label_path}: {} annotations, total coverage {:.2}% of {extent}",
        summary.len(),
        summary.total_percentage()
    );

    Ok(FileReport {
        label_path: label_path.to_string(),
        extent,
        class_ids: records.iter().map(|r| r.class_id).collect(),
        summary,
        error: None,
    })
}

/// Read and analyze one label file.
pub fn analyze_file(input: &LabelInput, cfg: &CoverageConfig) -> Result<FileReport, AnalyzeError> {
    let extent = cfg.extent_for(input);
    let text = fs::read_to_string(Path::new(&input.label_path)).map_err(|source| {
        AnalyzeError::Io {
            path: input.label_path.clone(),
            source,
        }
    })?;
    analyze_text(&input.label_path, &text, extent, cfg)
}

/// Analyze every input of `cfg`. Failing files are kept in the report with
/// their error message; the remaining files are still processed.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(cfg), fields(inputs = cfg.inputs.len()))
)]
pub fn analyze_inputs(cfg: &CoverageConfig) -> DatasetReport {
    let files = cfg
        .inputs
        .iter()
        .map(|input| match analyze_file(input, cfg) {
            Ok(report) => report,
            Err(err) => {
                warn!("{err}");
                FileReport::failed(&input.label_path, cfg.extent_for(input), err.to_string())
            }
        })
        .collect();

    let report = DatasetReport { files };
    info!(
        "analyzed {} files ({} failed), {} annotations",
        report.files.len(),
        report.failed_count(),
        report.annotation_count()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use label_coverage_core::ValidationError;

    fn cfg() -> CoverageConfig {
        let mut cfg = CoverageConfig::default();
        cfg.class_names.insert(0, "Car".into());
        cfg.class_names.insert(1, "Person".into());
        cfg
    }

    #[test]
    fn mixed_boxes_and_polygons() {
        let extent = ImageExtent::new(10, 10).unwrap();
        let text = "1 0 0 0.4 0 0 0.3\n0 0.5 0.5 1.0 1.0\n";
        let report = analyze_text("mixed.txt", text, extent, &cfg()).unwrap();

        assert_eq!(report.class_ids, vec![1, 0]);
        let rows = report.summary.results();
        assert_eq!(rows[0].class_label(), Some("Person"));
        assert_relative_eq!(rows[0].area(), 6.0);
        assert_eq!(rows[0].vertex_count(), 3);
        assert_eq!(rows[1].class_label(), Some("Car"));
        assert_relative_eq!(rows[1].percentage(), 100.0);
        assert_relative_eq!(report.summary.total_percentage(), 106.0);
    }

    #[test]
    fn malformed_polygon_names_the_annotation() {
        let extent = ImageExtent::new(10, 10).unwrap();
        let text = "0 0 0 1 0 1 1\n0 0.1 0.2 0.3 0.4 0.5\n";
        let err = analyze_text("bad.txt", text, extent, &cfg()).unwrap_err();
        match err {
            AnalyzeError::Coverage {
                path,
                index,
                source,
            } => {
                assert_eq!(path, "bad.txt");
                assert_eq!(index, 1);
                assert_eq!(
                    source,
                    CoverageError::Validation(ValidationError::OddCoordinateCount { len: 5 })
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_errors_carry_the_path() {
        let extent = ImageExtent::VGA;
        let err = analyze_text("x.txt", "0 0.1 oops", extent, &cfg()).unwrap_err();
        assert!(matches!(err, AnalyzeError::Parse { .. }));
        assert!(err.to_string().starts_with("x.txt: line 1"));
    }

    #[test]
    fn missing_file_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        fs::write(&good, "0 0 0 1 0 1 1 0 1\n").unwrap();

        let mut cfg = cfg();
        cfg.inputs.push(LabelInput::new(good.to_string_lossy()));
        cfg.inputs
            .push(LabelInput::new(dir.path().join("missing.txt").to_string_lossy()));

        let report = analyze_inputs(&cfg);
        assert_eq!(report.files.len(), 2);
        assert_eq!(report.failed_count(), 1);
        assert!(report.files[0].error.is_none());
        assert_relative_eq!(report.files[0].summary.total_percentage(), 100.0);
        assert!(report.files[1].error.is_some());
    }
}
