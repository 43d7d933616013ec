//! JSON configuration for coverage runs.

use label_coverage_core::ImageExtent;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum CoverageIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn default_extent() -> ImageExtent {
    ImageExtent::VGA
}

/// One label file, optionally with its own image size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelInput {
    pub label_path: String,
    #[serde(default)]
    pub extent: Option<ImageExtent>,
}

impl LabelInput {
    pub fn new(label_path: impl Into<String>) -> Self {
        Self {
            label_path: label_path.into(),
            extent: None,
        }
    }
}

/// Class-name table, fallback image size and the files to analyze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageConfig {
    #[serde(default)]
    pub class_names: BTreeMap<u32, String>,
    #[serde(default = "default_extent")]
    pub default_extent: ImageExtent,
    #[serde(default)]
    pub inputs: Vec<LabelInput>,
    #[serde(default)]
    pub output_path: Option<String>,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            class_names: BTreeMap::new(),
            default_extent: default_extent(),
            inputs: Vec::new(),
            output_path: None,
        }
    }
}

impl CoverageConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CoverageIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), CoverageIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Display name for a class id; unknown ids render as `class <id>`.
    pub fn class_name(&self, class_id: u32) -> String {
        self.class_names
            .get(&class_id)
            .cloned()
            .unwrap_or_else(|| format!("class {class_id}"))
    }

    /// Image size for `input`, falling back to `default_extent`.
    pub fn extent_for(&self, input: &LabelInput) -> ImageExtent {
        input.extent.unwrap_or(self.default_extent)
    }

    /// Resolve the JSON report path, if one was requested.
    pub fn output_path(&self) -> Option<PathBuf> {
        self.output_path.as_ref().map(PathBuf::from)
    }
}
