//! Scoring metrics
//!
//! All functions here are pure. Metrics that are mathematically undefined for
//! an input (for example sensitivity when the ground truth has no positives)
//! are reported as `None`, never as NaN or zero.

use serde::{Deserialize, Serialize};

pub mod common;
pub mod confusion;
pub mod ranking;
pub mod similarity;

pub use common::{accuracy, compute_common_metrics, sensitivity, specificity};
pub use confusion::{compute_tfpn, Tfpn};
pub use ranking::{
    area_under_roc, average_precision, compute_auc_metrics, compute_average_precision_metrics,
    compute_spec_metrics, roc_curve, spec_metric_name, specificity_at_sensitivity, RocCurve,
    RocPoint,
};
pub use similarity::{compute_similarity_metrics, dice, jaccard};

/// A named metric value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Metric identifier; never contains a period
    pub name: String,
    /// Metric value, `None` when undefined for the input
    pub value: Option<f64>,
}

impl MetricRecord {
    /// Create a record
    pub fn new(name: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Create a record with a defined value
    pub fn defined(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, Some(value))
    }
}

/// Look up a metric by name in a list of records
pub fn find_metric<'a>(records: &'a [MetricRecord], name: &str) -> Option<&'a MetricRecord> {
    records.iter().find(|record| record.name == name)
}

pub(crate) fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator != 0).then(|| numerator as f64 / denominator as f64)
}
