//! Accuracy, sensitivity and specificity

use super::{compute_tfpn, ratio, MetricRecord, Tfpn};
use crate::error::Result;
use ndarray::{ArrayBase, Data, Dimension};

/// (TP + TN) / total; undefined only for an empty input
pub fn accuracy(counts: &Tfpn) -> Option<f64> {
    ratio(counts.true_positive + counts.true_negative, counts.total())
}

/// TP / (TP + FN); undefined when the truth has no positives
pub fn sensitivity(counts: &Tfpn) -> Option<f64> {
    ratio(counts.true_positive, counts.truth_positives())
}

/// TN / (TN + FP); undefined when the truth has no negatives
pub fn specificity(counts: &Tfpn) -> Option<f64> {
    ratio(counts.true_negative, counts.truth_negatives())
}

/// Accuracy, sensitivity and specificity of a binary prediction
pub fn compute_common_metrics<S, T, D>(
    truth: &ArrayBase<S, D>,
    test: &ArrayBase<T, D>,
) -> Result<Vec<MetricRecord>>
where
    S: Data<Elem = bool>,
    T: Data<Elem = bool>,
    D: Dimension,
{
    let counts = compute_tfpn(truth, test)?;
    Ok(vec![
        MetricRecord::new("accuracy", accuracy(&counts)),
        MetricRecord::new("sensitivity", sensitivity(&counts)),
        MetricRecord::new("specificity", specificity(&counts)),
    ])
}
