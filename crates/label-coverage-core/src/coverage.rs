//! Percentage-of-image coverage and dataset aggregation.

use serde::{Deserialize, Serialize};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{
    denormalize_polygon, polygon_area, AnnotationRecord, AnnotationShape, BatchError, CenterBox,
    CoverageError, DivisionError, ImageExtent, PixelPoint, ValidationError,
};

/// `area / (image_width * image_height) * 100`.
///
/// Not capped at 100: an area larger than the frame gives a larger value.
/// A non-positive (or NaN) image area fails instead of producing inf/NaN.
pub fn coverage_percentage(
    area: f64,
    image_width: f64,
    image_height: f64,
) -> Result<f64, DivisionError> {
    let image_area = image_width * image_height;
    if image_area.is_nan() || image_area <= 0.0 {
        return Err(DivisionError::ZeroImageArea {
            width: image_width,
            height: image_height,
        });
    }
    Ok(area / image_area * 100.0)
}

/// Coverage computed directly from normalized pairs.
///
/// Denormalizing scales the shoelace area by `W * H`, and the same factor
/// divides it back out when taking the percentage, so the shoelace area of
/// the raw `[0, 1]` coordinates times 100 equals the pixel-space percentage
/// for every positive extent. Skips the per-vertex multiply.
pub fn normalized_coverage_percentage(coords: &[f64]) -> Result<f64, ValidationError> {
    let unit = denormalize_polygon(coords, 1.0, 1.0)?;
    Ok(polygon_area(&unit)? * 100.0)
}

/// Per-annotation coverage value. Fields are fixed at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoverageResult {
    area: f64,
    percentage: f64,
    vertex_count: usize,
    #[serde(default)]
    class_label: Option<String>,
}

impl CoverageResult {
    pub fn new(
        area: f64,
        percentage: f64,
        vertex_count: usize,
        class_label: Option<String>,
    ) -> Self {
        Self {
            area,
            percentage,
            vertex_count,
            class_label,
        }
    }

    /// Square pixels.
    #[inline]
    pub fn area(&self) -> f64 {
        self.area
    }

    #[inline]
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    pub fn class_label(&self) -> Option<&str> {
        self.class_label.as_deref()
    }
}

/// Ordered results plus their summed totals.
///
/// Totals are plain sums. Overlapping annotations count their shared pixels
/// once per annotation, so `total_percentage` can exceed the true covered
/// fraction (and 100).
///
/// The totals are written out for readers of the JSON but ignored when
/// reading it back; they are recomputed from `results`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "SummaryResults")]
pub struct DatasetSummary {
    results: Vec<CoverageResult>,
    total_area: f64,
    total_percentage: f64,
}

impl DatasetSummary {
    #[inline]
    pub fn results(&self) -> &[CoverageResult] {
        &self.results
    }

    #[inline]
    pub fn total_area(&self) -> f64 {
        self.total_area
    }

    #[inline]
    pub fn total_percentage(&self) -> f64 {
        self.total_percentage
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn into_results(self) -> Vec<CoverageResult> {
        self.results
    }
}

#[derive(Deserialize)]
struct SummaryResults {
    results: Vec<CoverageResult>,
}

impl From<SummaryResults> for DatasetSummary {
    fn from(raw: SummaryResults) -> Self {
        summarize(raw.results)
    }
}

/// Sum areas and percentages over `results`, keeping their order.
pub fn summarize(results: Vec<CoverageResult>) -> DatasetSummary {
    let (total_area, total_percentage) = results
        .iter()
        .fold((0.0, 0.0), |(a, p), r| (a + r.area, p + r.percentage));
    DatasetSummary {
        results,
        total_area,
        total_percentage,
    }
}

/// Denormalize, measure and express a normalized polygon as coverage.
pub fn polygon_coverage(
    coords: &[f64],
    extent: ImageExtent,
    class_label: Option<String>,
) -> Result<CoverageResult, CoverageError> {
    let (w, h) = extent.as_f64();
    let vertices: Vec<PixelPoint> = denormalize_polygon(coords, w, h)?;
    let area = polygon_area(&vertices)?;
    let percentage = coverage_percentage(area, w, h)?;
    Ok(CoverageResult::new(
        area,
        percentage,
        vertices.len(),
        class_label,
    ))
}

/// Coverage of a center-format box, measured on its truncated pixel corners.
pub fn bbox_coverage(
    center_box: CenterBox,
    extent: ImageExtent,
    class_label: Option<String>,
) -> Result<CoverageResult, CoverageError> {
    let (w, h) = extent.as_f64();
    let area = center_box.denormalize(extent).area();
    let percentage = coverage_percentage(area, w, h)?;
    Ok(CoverageResult::new(area, percentage, 4, class_label))
}

/// Coverage of one record, dispatched on its [`AnnotationShape`].
pub fn annotation_coverage(
    record: &AnnotationRecord,
    extent: ImageExtent,
    class_label: Option<String>,
) -> Result<CoverageResult, CoverageError> {
    match record.shape() {
        AnnotationShape::BoundingBox(b) => bbox_coverage(b, extent, class_label),
        AnnotationShape::Polygon(coords) => polygon_coverage(coords, extent, class_label),
    }
}

/// Coverage of every record against one image extent, in input order.
///
/// `label` maps a class id to its display name. Stops at the first failing
/// record and reports its index.
pub fn coverage_batch<F>(
    records: &[AnnotationRecord],
    extent: ImageExtent,
    label: F,
) -> Result<Vec<CoverageResult>, BatchError>
where
    F: Fn(u32) -> Option<String>,
{
    records
        .iter()
        .enumerate()
        .map(|(index, r)| {
            annotation_coverage(r, extent, label(r.class_id))
                .map_err(|source| BatchError { index, source })
        })
        .collect()
}

/// Parallel [`coverage_batch`]; results keep the input order.
///
/// When several records fail, which one is reported is unspecified.
#[cfg(feature = "rayon")]
pub fn coverage_batch_par<F>(
    records: &[AnnotationRecord],
    extent: ImageExtent,
    label: F,
) -> Result<Vec<CoverageResult>, BatchError>
where
    F: Fn(u32) -> Option<String> + Sync,
{
    records
        .par_iter()
        .enumerate()
        .map(|(index, r)| {
            annotation_coverage(r, extent, label(r.class_id))
                .map_err(|source| BatchError { index, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn extent(w: u32, h: u32) -> ImageExtent {
        ImageExtent::new(w, h).unwrap()
    }

    #[test]
    fn triangle_on_ten_by_ten() {
        assert_eq!(coverage_percentage(6.0, 10.0, 10.0).unwrap(), 6.0);

        let r = polygon_coverage(&[0.0, 0.0, 0.4, 0.0, 0.0, 0.3], extent(10, 10), None).unwrap();
        assert_eq!(r.area(), 6.0);
        assert_relative_eq!(r.percentage(), 6.0);
        assert_eq!(r.vertex_count(), 3);
        assert_eq!(r.class_label(), None);
    }

    #[test]
    fn zero_sides_fail_with_division_error() {
        for (w, h) in [(0.0, 10.0), (10.0, 0.0), (0.0, 0.0), (-5.0, 10.0), (f64::NAN, 1.0)] {
            assert!(
                matches!(
                    coverage_percentage(12.5, w, h),
                    Err(DivisionError::ZeroImageArea { .. })
                ),
                "({w}, {h}) should be rejected"
            );
        }
    }

    #[test]
    fn percentage_is_not_capped() {
        assert_relative_eq!(coverage_percentage(200.0, 10.0, 10.0).unwrap(), 200.0);
    }

    #[test]
    fn summarize_sums_without_dedup() {
        let a = CoverageResult::new(30.0, 30.0, 4, Some("Car".into()));
        let b = CoverageResult::new(80.0, 80.0, 5, Some("Person".into()));
        let s = summarize(vec![a.clone(), b.clone()]);

        assert_eq!(s.results(), &[a, b]);
        assert_relative_eq!(s.total_area(), 110.0);
        assert_relative_eq!(s.total_percentage(), 110.0);
    }

    #[test]
    fn deserialized_totals_follow_the_results() {
        let json = r#"{
            "results": [
                {"area": 6.0, "percentage": 6.0, "vertex_count": 3},
                {"area": 25.0, "percentage": 25.0, "vertex_count": 4, "class_label": "Car"}
            ],
            "total_area": 1.0,
            "total_percentage": 999.0
        }"#;
        let s: DatasetSummary = serde_json::from_str(json).unwrap();
        assert_eq!(s.len(), 2);
        assert_relative_eq!(s.total_area(), 31.0);
        assert_relative_eq!(s.total_percentage(), 31.0);
        assert_eq!(s.results()[1].class_label(), Some("Car"));

        let json = serde_json::to_string(&s).unwrap();
        let back: DatasetSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn empty_summary_is_zero() {
        let s = summarize(Vec::new());
        assert!(s.is_empty());
        assert_eq!(s.total_area(), 0.0);
        assert_eq!(s.total_percentage(), 0.0);
    }

    #[test]
    fn bbox_coverage_uses_truncated_corners() {
        // 0.5 +- 0.15 of 10 px: corners at 3.5 and 6.5 truncate to 3 and 6
        let r = bbox_coverage(CenterBox::new(0.5, 0.5, 0.3, 0.3), extent(10, 10), None).unwrap();
        assert_eq!(r.area(), 9.0);
        assert_relative_eq!(r.percentage(), 9.0);
        assert_eq!(r.vertex_count(), 4);
    }

    #[test]
    fn normalized_shortcut_matches_pixel_path() {
        let coords = [0.12, 0.15, 0.25, 0.2, 0.24, 0.45, 0.09, 0.49, 0.05, 0.32];
        let shortcut = normalized_coverage_percentage(&coords).unwrap();
        for (w, h) in [(640, 480), (360, 360), (1, 1), (1920, 1080)] {
            let full = polygon_coverage(&coords, extent(w, h), None).unwrap();
            assert_relative_eq!(full.percentage(), shortcut, max_relative = 1e-9);
        }
    }

    #[test]
    fn batch_keeps_order_and_labels() {
        let records = vec![
            AnnotationRecord::new(1, vec![0.0, 0.0, 0.4, 0.0, 0.0, 0.3]),
            AnnotationRecord::new(0, vec![0.5, 0.5, 1.0, 1.0]),
        ];
        let names = |id: u32| Some(format!("c{id}"));
        let out = coverage_batch(&records, extent(10, 10), names).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].class_label(), Some("c1"));
        assert_eq!(out[0].area(), 6.0);
        assert_eq!(out[1].class_label(), Some("c0"));
        assert_relative_eq!(out[1].percentage(), 100.0);
    }

    #[test]
    fn batch_stops_on_malformed_record() {
        let records = vec![
            AnnotationRecord::new(0, vec![0.0, 0.0, 0.4, 0.0, 0.0, 0.3]),
            AnnotationRecord::new(0, vec![0.1, 0.2, 0.3]),
        ];
        let err = coverage_batch(&records, extent(10, 10), |_| None).unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(
            err.source,
            CoverageError::Validation(ValidationError::OddCoordinateCount { len: 3 })
        );
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_batch_matches_sequential() {
        let records: Vec<AnnotationRecord> = (0..64)
            .map(|i| {
                let s = 0.1 + i as f64 * 0.01;
                AnnotationRecord::new(i % 5, vec![0.0, 0.0, s, 0.0, s, s, 0.0, s])
            })
            .collect();
        let seq = coverage_batch(&records, extent(640, 480), |_| None).unwrap();
        let par = coverage_batch_par(&records, extent(640, 480), |_| None).unwrap();
        assert_eq!(seq, par);
    }
}
