//! Jaccard index and Dice coefficient

use super::{compute_tfpn, ratio, MetricRecord, Tfpn};
use crate::error::Result;
use ndarray::{ArrayBase, Data, Dimension};

/// TP / (TP + FN + FP); undefined when both inputs are entirely negative
pub fn jaccard(counts: &Tfpn) -> Option<f64> {
    ratio(
        counts.true_positive,
        counts.true_positive + counts.false_negative + counts.false_positive,
    )
}

/// 2TP / (|truth positives| + |test positives|); undefined when both are 0
pub fn dice(counts: &Tfpn) -> Option<f64> {
    ratio(
        2 * counts.true_positive,
        counts.truth_positives() + counts.test_positives(),
    )
}

/// Jaccard index and Dice coefficient of a binary prediction
pub fn compute_similarity_metrics<S, T, D>(
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
        MetricRecord::new("jaccard", jaccard(&counts)),
        MetricRecord::new("dice", dice(&counts)),
    ])
}
