//! Scoring configuration
//!
//! A [`ScoringConfig`] is usually read from a TOML document:
//!
//! ```toml
//! [task]
//! kind = "classification"
//!
//! [classification]
//! index_column = "image"
//! categories = ["MEL", "NV", "BCC", "AKIEC", "BKL", "DF", "VASC"]
//! sensitivity_thresholds = [0.82, 0.89, 0.95]
//!
//! [segmentation]
//! jaccard_threshold = 0.65
//! mask_pattern = "*.png"
//!
//! [subsets]
//! exclude = []
//! validation = []
//! ```
//!
//! Every section and key is optional and falls back to the defaults shown.

use crate::error::{EngineError, Result};
use isic_core::{TableSchema, DEFAULT_INDEX_COLUMN, ISIC_2018_CATEGORIES};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Kind of challenge task being scored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Lesion diagnosis from per-category probabilities
    #[default]
    Classification,
    /// Lesion boundary segmentation from binary masks
    Segmentation,
}

impl TaskKind {
    /// Configuration name of the task
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Classification => "classification",
            TaskKind::Segmentation => "segmentation",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "classification" => Ok(TaskKind::Classification),
            "segmentation" => Ok(TaskKind::Segmentation),
            other => Err(EngineError::ConfigError(format!("Unknown task: {other}"))),
        }
    }
}

/// Task selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Which task to score
    pub kind: TaskKind,
}

/// Classification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Header of the image identifier column
    pub index_column: String,
    /// Category columns in canonical order
    pub categories: Vec<String>,
    /// Sensitivities at which specificity is reported
    pub sensitivity_thresholds: Vec<f64>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            index_column: DEFAULT_INDEX_COLUMN.to_string(),
            categories: ISIC_2018_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            sensitivity_thresholds: vec![0.82, 0.89, 0.95],
        }
    }
}

/// Segmentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Per-image Jaccard values below this count as 0
    pub jaccard_threshold: f64,
    /// File name pattern of mask files inside the input directories
    pub mask_pattern: String,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            jaccard_threshold: 0.65,
            mask_pattern: "*.png".to_string(),
        }
    }
}

/// Image identifier subsets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubsetConfig {
    /// Identifiers removed from both truth and prediction before scoring
    pub exclude: Vec<String>,
    /// Identifiers that make up the validation score
    pub validation: Vec<String>,
}

/// Complete scoring configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Task selection
    #[serde(default)]
    pub task: TaskConfig,

    /// Classification settings
    #[serde(default)]
    pub classification: ClassificationConfig,

    /// Segmentation settings
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Excluded and validation identifiers
    #[serde(default)]
    pub subsets: SubsetConfig,
}

impl ScoringConfig {
    /// Defaults for the classification task
    pub fn classification() -> Self {
        Self::default()
    }

    /// Defaults for the segmentation task
    pub fn segmentation() -> Self {
        Self {
            task: TaskConfig {
                kind: TaskKind::Segmentation,
            },
            ..Default::default()
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ScoringConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EngineError::IoError(format!("Failed to read config {}: {e}", path.display()))
        })?;
        let config = Self::from_toml_str(&content).map_err(|e| match e {
            EngineError::ConfigError(msg) => {
                EngineError::ConfigError(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;
        tracing::debug!(path = %path.display(), task = %config.task.kind, "loaded config");
        Ok(config)
    }

    /// The configured task
    pub fn task_kind(&self) -> TaskKind {
        self.task.kind
    }

    /// Table layout for classification inputs
    pub fn schema(&self) -> TableSchema {
        TableSchema::new(
            self.classification.index_column.clone(),
            self.classification.categories.iter().cloned(),
        )
    }

    /// Check the configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let classification = &self.classification;
        if classification.index_column.trim().is_empty() {
            return Err(EngineError::ConfigError(
                "Index column cannot be empty".to_string(),
            ));
        }
        if classification.categories.is_empty() {
            return Err(EngineError::ConfigError(
                "At least one category is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for category in &classification.categories {
            if category.trim().is_empty() {
                return Err(EngineError::ConfigError(
                    "Category names cannot be empty".to_string(),
                ));
            }
            if !seen.insert(category.as_str()) {
                return Err(EngineError::ConfigError(format!(
                    "Duplicate category: {category}"
                )));
            }
        }
        if seen.contains(classification.index_column.as_str()) {
            return Err(EngineError::ConfigError(format!(
                "Index column {} is also a category",
                classification.index_column
            )));
        }

        for &threshold in &classification.sensitivity_thresholds {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(EngineError::ConfigError(format!(
                    "Sensitivity threshold {threshold} is outside [0, 1]"
                )));
            }
        }

        let jaccard_threshold = self.segmentation.jaccard_threshold;
        if !(0.0..=1.0).contains(&jaccard_threshold) {
            return Err(EngineError::ConfigError(format!(
                "Jaccard threshold {jaccard_threshold} is outside [0, 1]"
            )));
        }
        if self.segmentation.mask_pattern.trim().is_empty() {
            return Err(EngineError::ConfigError(
                "Mask pattern cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ScoringConfig::default();
        assert_eq!(config.task_kind(), TaskKind::Classification);
        assert_eq!(config.classification.categories.len(), 7);
        assert_eq!(config.classification.sensitivity_thresholds, vec![0.82, 0.89, 0.95]);
        assert_eq!(config.segmentation.jaccard_threshold, 0.65);
        assert!(config.validate().is_ok());
        assert_eq!(config.schema(), TableSchema::isic_2018());
    }

    #[test]
    fn test_presets() {
        assert_eq!(
            ScoringConfig::segmentation().task_kind(),
            TaskKind::Segmentation
        );
        assert_eq!(
            ScoringConfig::classification().task_kind(),
            TaskKind::Classification
        );
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ScoringConfig::from_toml_str("").unwrap();
        assert_eq!(config, ScoringConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = ScoringConfig::from_toml_str(
            r#"
[task]
kind = "segmentation"

[segmentation]
jaccard_threshold = 0.5

[subsets]
exclude = ["ISIC_0000001"]
"#,
        )
        .unwrap();

        assert_eq!(config.task_kind(), TaskKind::Segmentation);
        assert_eq!(config.segmentation.jaccard_threshold, 0.5);
        assert_eq!(config.segmentation.mask_pattern, "*.png");
        assert_eq!(config.subsets.exclude, vec!["ISIC_0000001"]);
        assert!(config.subsets.validation.is_empty());
    }

    #[test]
    fn test_custom_categories() {
        let config = ScoringConfig::from_toml_str(
            r#"
[classification]
index_column = "image_id"
categories = ["melanoma", "seborrheic_keratosis"]
"#,
        )
        .unwrap();
        let schema = config.schema();
        assert_eq!(schema.index_column, "image_id");
        assert_eq!(schema.categories, vec!["melanoma", "seborrheic_keratosis"]);
    }

    #[test]
    fn test_unknown_task_is_rejected() {
        let result = ScoringConfig::from_toml_str("[task]\nkind = \"detection\"\n");
        assert!(matches!(result, Err(EngineError::ConfigError(_))));
    }

    #[test]
    fn test_validation_failures() {
        let mut config = ScoringConfig::default();
        config.classification.categories.clear();
        assert!(config.validate().is_err());

        let mut config = ScoringConfig::default();
        config.classification.categories.push("MEL".to_string());
        assert!(config.validate().is_err());

        let mut config = ScoringConfig::default();
        config.classification.index_column = "NV".to_string();
        assert!(config.validate().is_err());

        let mut config = ScoringConfig::default();
        config.classification.sensitivity_thresholds = vec![1.5];
        assert!(config.validate().is_err());

        let mut config = ScoringConfig::default();
        config.segmentation.jaccard_threshold = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_task_kind_from_str() {
        assert_eq!(
            "Segmentation".parse::<TaskKind>().unwrap(),
            TaskKind::Segmentation
        );
        assert!("detection".parse::<TaskKind>().is_err());
        assert_eq!(TaskKind::Classification.to_string(), "classification");
    }

    #[test]
    fn test_from_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[task]\nkind = \"segmentation\"\n").unwrap();
        let config = ScoringConfig::from_file(file.path()).unwrap();
        assert_eq!(config.task_kind(), TaskKind::Segmentation);

        let missing = ScoringConfig::from_file(Path::new("/nonexistent/config.toml"));
        assert!(matches!(missing, Err(EngineError::IoError(_))));
    }
}
