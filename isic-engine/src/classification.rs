//! Lesion diagnosis scoring
//!
//! Ground truth and prediction tables go through the full validation
//! pipeline, then every category is scored one-vs-rest. Binary decisions
//! come from the row-wise argmax; ranking metrics use the raw probabilities.

use crate::config::ScoringConfig;
use crate::error::Result;
use isic_core::metrics::{
    compute_auc_metrics, compute_average_precision_metrics, compute_common_metrics,
    compute_similarity_metrics, compute_spec_metrics, compute_tfpn, sensitivity,
};
use isic_core::{parse_csv, validate_rows, MetricRecord, ProbabilityTable, Score, ScoreError};
use ndarray::{Array2, ArrayView2, Axis};
use serde::Serialize;
use std::io::BufRead;

/// Metrics of one category scored against all others
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMetrics {
    /// Category column name
    pub category: String,
    /// Metric records in reporting order
    pub metrics: Vec<MetricRecord>,
}

/// Result of scoring a classification submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    /// Aggregate score (balanced multiclass accuracy)
    pub score: Score,
    /// Per-category metrics in canonical category order
    pub categories: Vec<CategoryMetrics>,
}

/// Score a prediction CSV against a ground-truth CSV
pub fn score_classification<T, P>(
    truth: T,
    prediction: P,
    config: &ScoringConfig,
) -> Result<ClassificationReport>
where
    T: BufRead,
    P: BufRead,
{
    let schema = config.schema();
    let mut truth = parse_csv(truth, &schema)?;
    let mut prediction = parse_csv(prediction, &schema)?;
    tracing::debug!(
        truth_rows = truth.len(),
        prediction_rows = prediction.len(),
        "parsed tables"
    );

    let excluded = &config.subsets.exclude;
    truth.exclude_rows(excluded);
    prediction.exclude_rows(excluded);

    validate_rows(&truth, &prediction)?;
    truth.sort_rows();
    prediction.sort_rows();

    if truth.is_empty() {
        return Err(ScoreError::InvalidInput("no images left to score".to_string()).into());
    }

    let truth_decisions = argmax_decisions(truth.values().view());
    let prediction_decisions = argmax_decisions(prediction.values().view());

    let mut categories = Vec::with_capacity(schema.categories.len());
    for (index, category) in schema.categories.iter().enumerate() {
        let truth_column = truth_decisions.column(index);
        let prediction_column = prediction_decisions.column(index);
        let labels: Vec<bool> = truth_column.to_vec();
        let scores: Vec<f64> = prediction.values().column(index).to_vec();

        let mut metrics = compute_common_metrics(&truth_column, &prediction_column)?;
        metrics.extend(compute_similarity_metrics(&truth_column, &prediction_column)?);
        metrics.extend(compute_auc_metrics(&labels, &scores)?);
        metrics.extend(compute_average_precision_metrics(&labels, &scores)?);
        for &threshold in &config.classification.sensitivity_thresholds {
            metrics.extend(compute_spec_metrics(&labels, &scores, threshold)?);
        }

        categories.push(CategoryMetrics {
            category: category.clone(),
            metrics,
        });
    }

    let overall = balanced_accuracy(&truth_decisions, &prediction_decisions)?;
    let validation = validation_score(&truth, &prediction, config)?.unwrap_or(overall);
    let score = Score::new(overall, validation);
    tracing::info!(
        images = truth.len(),
        overall = score.overall,
        validation = score.validation,
        "scored classification"
    );

    Ok(ClassificationReport { score, categories })
}

fn validation_score(
    truth: &ProbabilityTable,
    prediction: &ProbabilityTable,
    config: &ScoringConfig,
) -> Result<Option<f64>> {
    let subset = &config.subsets.validation;
    if subset.is_empty() {
        return Ok(None);
    }

    let unknown: Vec<&str> = subset
        .iter()
        .map(String::as_str)
        .filter(|image| !truth.contains(image))
        .collect();
    if !unknown.is_empty() {
        return Err(ScoreError::missing_images(unknown).into());
    }

    let truth = truth.select_rows(subset);
    let prediction = prediction.select_rows(subset);
    let value = balanced_accuracy(
        &argmax_decisions(truth.values().view()),
        &argmax_decisions(prediction.values().view()),
    )?;
    Ok(Some(value))
}

/// One-hot matrix marking each row's largest value; the first maximum wins
pub fn argmax_decisions(values: ArrayView2<'_, f64>) -> Array2<bool> {
    let mut decisions = Array2::from_elem(values.raw_dim(), false);
    for (row, mut out) in values.axis_iter(Axis(0)).zip(decisions.axis_iter_mut(Axis(0))) {
        let mut best: Option<(usize, f64)> = None;
        for (index, &value) in row.iter().enumerate() {
            if best.map_or(true, |(_, top)| value > top) {
                best = Some((index, value));
            }
        }
        if let Some((index, _)) = best {
            out[index] = true;
        }
    }
    decisions
}

/// Mean of the per-category sensitivities that are defined
pub fn balanced_accuracy(truth: &Array2<bool>, prediction: &Array2<bool>) -> Result<f64> {
    let mut total = 0.0;
    let mut defined = 0usize;
    for (truth_column, prediction_column) in truth
        .axis_iter(Axis(1))
        .zip(prediction.axis_iter(Axis(1)))
    {
        let counts = compute_tfpn(&truth_column, &prediction_column)?;
        if let Some(value) = sensitivity(&counts) {
            total += value;
            defined += 1;
        }
    }
    if defined == 0 {
        return Err(
            ScoreError::InvalidInput("no category has a positive ground truth".to_string())
                .into(),
        );
    }
    Ok(total / defined as f64)
}
