//! Task dispatch and builder
//!
//! [`Scorer`] is the entry point used by front ends: it owns a validated
//! configuration and routes inputs to the classification or segmentation
//! pipeline.

use crate::{
    classification::{score_classification, ClassificationReport},
    config::{ScoringConfig, TaskKind},
    error::Result,
    input::TableInput,
    segmentation::{score_segmentation_with_progress, SegmentationReport},
};
use isic_core::{parse_csv, validate_rows, MetricRecord, Score};
use serde::Serialize;
use std::path::Path;

/// Report of either task
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "task", rename_all = "lowercase")]
pub enum TaskReport {
    /// Lesion diagnosis report
    Classification(ClassificationReport),
    /// Lesion boundary segmentation report
    Segmentation(SegmentationReport),
}

/// A labelled list of metric records, one per category or image
#[derive(Debug, Clone, Copy)]
pub struct MetricGroup<'a> {
    /// Category name or image identifier
    pub label: &'a str,
    /// Metrics of this group
    pub metrics: &'a [MetricRecord],
}

impl TaskReport {
    /// Aggregate score
    pub fn score(&self) -> Score {
        match self {
            TaskReport::Classification(report) => report.score,
            TaskReport::Segmentation(report) => report.score,
        }
    }

    /// Which task produced this report
    pub fn kind(&self) -> TaskKind {
        match self {
            TaskReport::Classification(_) => TaskKind::Classification,
            TaskReport::Segmentation(_) => TaskKind::Segmentation,
        }
    }

    /// Per-category or per-image metrics, in report order
    pub fn groups(&self) -> Vec<MetricGroup<'_>> {
        match self {
            TaskReport::Classification(report) => report
                .categories
                .iter()
                .map(|c| MetricGroup {
                    label: &c.category,
                    metrics: &c.metrics,
                })
                .collect(),
            TaskReport::Segmentation(report) => report
                .images
                .iter()
                .map(|i| MetricGroup {
                    label: &i.image,
                    metrics: &i.metrics,
                })
                .collect(),
        }
    }
}

/// Scores submissions under one configuration
#[derive(Debug, Clone)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    /// Create a scorer, validating the configuration
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a scorer with the defaults of a task
    pub fn for_task(kind: TaskKind) -> Self {
        let config = match kind {
            TaskKind::Classification => ScoringConfig::classification(),
            TaskKind::Segmentation => ScoringConfig::segmentation(),
        };
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score a submission
    ///
    /// Paths are CSV files for classification and mask directories for
    /// segmentation.
    pub fn score(&self, truth: &Path, prediction: &Path) -> Result<TaskReport> {
        self.score_with_progress(truth, prediction, |_| {})
    }

    /// Score a submission, calling `on_item` after each scored image
    ///
    /// Classification scores the whole table at once and never calls it.
    pub fn score_with_progress<F>(
        &self,
        truth: &Path,
        prediction: &Path,
        on_item: F,
    ) -> Result<TaskReport>
    where
        F: FnMut(&str),
    {
        tracing::debug!(
            task = %self.config.task_kind(),
            truth = %truth.display(),
            prediction = %prediction.display(),
            "scoring submission"
        );
        match self.config.task_kind() {
            TaskKind::Classification => self
                .score_tables(TableInput::from_file(truth), TableInput::from_file(prediction))
                .map(TaskReport::Classification),
            TaskKind::Segmentation => {
                score_segmentation_with_progress(truth, prediction, &self.config, on_item)
                    .map(TaskReport::Segmentation)
            }
        }
    }

    /// Score classification tables from any input source
    pub fn score_tables(
        &self,
        truth: TableInput,
        prediction: TableInput,
    ) -> Result<ClassificationReport> {
        score_classification(truth.into_reader()?, prediction.into_reader()?, &self.config)
    }

    /// Run the table checks without computing metrics
    ///
    /// Returns the number of rows that would be scored.
    pub fn validate_tables(&self, truth: TableInput, prediction: TableInput) -> Result<usize> {
        let schema = self.config.schema();
        let truth_source = truth.describe();
        let prediction_source = prediction.describe();

        let mut truth = parse_csv(truth.into_reader()?, &schema)?;
        let mut prediction = parse_csv(prediction.into_reader()?, &schema)?;
        truth.exclude_rows(&self.config.subsets.exclude);
        prediction.exclude_rows(&self.config.subsets.exclude);
        validate_rows(&truth, &prediction)?;

        tracing::info!(
            truth = %truth_source,
            prediction = %prediction_source,
            rows = truth.len(),
            "tables are valid"
        );
        Ok(truth.len())
    }
}

/// Builder for [`Scorer`]
#[derive(Debug, Default)]
pub struct ScorerBuilder {
    config: ScoringConfig,
}

impl ScorerBuilder {
    /// Create a builder with classification defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Set the task
    pub fn task(mut self, kind: TaskKind) -> Self {
        self.config.task.kind = kind;
        self
    }

    /// Set the category columns
    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.classification.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Set the sensitivities for specificity-at-sensitivity metrics
    pub fn sensitivity_thresholds(mut self, thresholds: Vec<f64>) -> Self {
        self.config.classification.sensitivity_thresholds = thresholds;
        self
    }

    /// Set the per-image Jaccard threshold
    pub fn jaccard_threshold(mut self, threshold: f64) -> Self {
        self.config.segmentation.jaccard_threshold = threshold;
        self
    }

    /// Set the identifiers excluded from scoring
    pub fn exclude<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.subsets.exclude = images.into_iter().map(Into::into).collect();
        self
    }

    /// Set the validation subset
    pub fn validation<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.subsets.validation = images.into_iter().map(Into::into).collect();
        self
    }

    /// Build the scorer
    pub fn build(self) -> Result<Scorer> {
        Scorer::new(self.config)
    }
}
