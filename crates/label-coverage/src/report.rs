//! Report values and their text / JSON renderings.

use label_coverage_core::{DatasetSummary, ImageExtent};
use serde::{Deserialize, Serialize};
use std::{fmt::Write as _, fs, path::Path};

use crate::CoverageIoError;

const RULE_WIDTH: usize = 70;

/// Coverage of one label file against its image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub label_path: String,
    pub extent: ImageExtent,
    /// Class id of each entry in `summary.results()`, same order.
    pub class_ids: Vec<u32>,
    pub summary: DatasetSummary,
    #[serde(default)]
    pub error: Option<String>,
}

impl FileReport {
    /// Report for a file that could not be analyzed.
    pub fn failed(label_path: impl Into<String>, extent: ImageExtent, error: String) -> Self {
        Self {
            label_path: label_path.into(),
            extent,
            class_ids: Vec::new(),
            summary: label_coverage_core::summarize(Vec::new()),
            error: Some(error),
        }
    }
}

/// All files of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DatasetReport {
    pub files: Vec<FileReport>,
}

impl DatasetReport {
    pub fn annotation_count(&self) -> usize {
        self.files.iter().map(|f| f.summary.len()).sum()
    }

    pub fn failed_count(&self) -> usize {
        self.files.iter().filter(|f| f.error.is_some()).count()
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CoverageIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON, creating parent directories.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), CoverageIoError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Fixed-width coverage table for one file.
///
/// ```text
/// Label file: labels/car.txt
/// Image dimensions: 640x480 pixels
/// Total image area: 307200 square pixels
///
/// Coverage Analysis:
/// ----------------------------------------------------------------------
/// Class ID  Class Name     Area (pixels)       Coverage %     Vertices
/// ----------------------------------------------------------------------
/// 0         Car            16803.84            5.47%          23
/// ----------------------------------------------------------------------
/// TOTAL                    16803.84            5.47%
/// ```
pub fn render_table(report: &FileReport) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "Label file: {}", report.label_path);
    let _ = writeln!(out, "Image dimensions: {} pixels", report.extent);
    let _ = writeln!(
        out,
        "Total image area: {} square pixels",
        report.extent.area()
    );

    if let Some(err) = &report.error {
        let _ = writeln!(out, "error: {err}");
        return out;
    }

    let _ = writeln!(out, "\nCoverage Analysis:");
    let _ = writeln!(out, "{rule}");
    push_row(
        &mut out,
        format_args!(
            "{:<10}{:<15}{:<20}{:<15}{:<10}",
            "Class ID", "Class Name", "Area (pixels)", "Coverage %", "Vertices"
        ),
    );
    let _ = writeln!(out, "{rule}");

    for (class_id, r) in report.class_ids.iter().zip(report.summary.results()) {
        push_row(
            &mut out,
            format_args!(
                "{:<10}{:<15}{:<20.2}{:<15}{:<10}",
                class_id,
                r.class_label().unwrap_or("-"),
                r.area(),
                format!("{:.2}%", r.percentage()),
                r.vertex_count()
            ),
        );
    }

    let _ = writeln!(out, "{rule}");
    push_row(
        &mut out,
        format_args!(
            "{:<25}{:<20.2}{:<15}",
            "TOTAL",
            report.summary.total_area(),
            format!("{:.2}%", report.summary.total_percentage())
        ),
    );
    out
}

fn push_row(out: &mut String, row: std::fmt::Arguments<'_>) {
    let line = row.to_string();
    out.push_str(line.trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use label_coverage_core::{summarize, CoverageResult};

    fn sample() -> FileReport {
        let extent = ImageExtent::new(10, 10).unwrap();
        FileReport {
            label_path: "img_001.txt".into(),
            extent,
            class_ids: vec![0, 3],
            summary: summarize(vec![
                CoverageResult::new(6.0, 6.0, 3, Some("Car".into())),
                CoverageResult::new(25.0, 25.0, 4, None),
            ]),
            error: None,
        }
    }

    #[test]
    fn table_lists_rows_and_total() {
        let table = render_table(&sample());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[1], "Image dimensions: 10x10 pixels");
        assert_eq!(lines[2], "Total image area: 100 square pixels");
        assert!(lines.contains(&"0         Car            6.00                6.00%          3"));
        assert!(lines.contains(&"3         -              25.00               25.00%         4"));
        assert_eq!(
            *lines.last().unwrap(),
            "TOTAL                    31.00               31.00%"
        );
        assert_eq!(lines.iter().filter(|l| **l == "-".repeat(70)).count(), 3);
    }

    #[test]
    fn vertices_column_stays_aligned() {
        let extent = ImageExtent::new(10, 10).unwrap();
        let report = FileReport {
            label_path: "wide.txt".into(),
            extent,
            class_ids: vec![1, 2],
            summary: summarize(vec![
                CoverageResult::new(0.5, 0.5, 3, None),
                CoverageResult::new(12345.0, 12345.0, 17, None),
            ]),
            error: None,
        };
        let table = render_table(&report);
        let header = table.lines().find(|l| l.starts_with("Class ID")).unwrap();
        assert_eq!(header.find("Vertices"), Some(60));
        for row in table.lines().filter(|l| l.starts_with('1') || l.starts_with('2')) {
            assert_eq!(&row[45..60].trim_end().chars().last(), &Some('%'));
            assert!(row[60..].chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn failed_file_renders_error_only() {
        let extent = ImageExtent::new(10, 10).unwrap();
        let r = FileReport::failed("bad.txt", extent, "line 2: invalid number \"x\"".into());
        let table = render_table(&r);
        assert!(table.contains("error: line 2"));
        assert!(!table.contains("TOTAL"));
    }

    #[test]
    fn dataset_report_counts_and_persists() {
        let mut report = DatasetReport::default();
        report.files.push(sample());
        report.files.push(FileReport::failed(
            "bad.txt",
            ImageExtent::VGA,
            "boom".into(),
        ));
        assert_eq!(report.annotation_count(), 2);
        assert_eq!(report.failed_count(), 1);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/report.json");
        report.write_json(&path).unwrap();
        assert_eq!(DatasetReport::load_json(&path).unwrap(), report);
    }
}
