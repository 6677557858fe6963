//! Ranking metrics over continuous scores
//!
//! These metrics consume raw prediction scores and boolean ground truth
//! directly; no thresholding or confusion matrix is involved. Curves are
//! built the standard way: samples are sorted by decreasing score and one
//! point is emitted per distinct score value, so tied scores always move
//! together.

use super::MetricRecord;
use crate::error::{Result, ScoreError};

/// A single point on the ROC curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RocPoint {
    /// Scores at or above this value are predicted positive
    pub threshold: f64,
    /// False positive rate: FP / (FP + TN)
    pub fpr: f64,
    /// True positive rate (sensitivity): TP / (TP + FN)
    pub tpr: f64,
}

/// ROC curve ordered by decreasing threshold
///
/// Starts at `(0, 0)` with an infinite threshold and ends at `(1, 1)`.
/// Intermediate points that lie on a straight segment are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct RocCurve {
    /// Curve points, first to last
    pub points: Vec<RocPoint>,
}

impl RocCurve {
    /// Area under the curve by the trapezoidal rule
    pub fn area(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| (pair[1].fpr - pair[0].fpr) * (pair[1].tpr + pair[0].tpr) / 2.0)
            .sum()
    }
}

/// Cumulative counts at each distinct score, highest score first
struct ThresholdCounts {
    thresholds: Vec<f64>,
    true_positives: Vec<usize>,
    false_positives: Vec<usize>,
}

fn threshold_counts(labels: &[bool], scores: &[f64]) -> Result<ThresholdCounts> {
    if labels.len() != scores.len() {
        return Err(ScoreError::InvalidInput(format!(
            "labels length {} != scores length {}",
            labels.len(),
            scores.len()
        )));
    }
    if scores.is_empty() {
        return Err(ScoreError::InvalidInput("empty score array".to_string()));
    }
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(ScoreError::InvalidInput(
            "scores must be finite numbers".to_string(),
        ));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut counts = ThresholdCounts {
        thresholds: Vec::new(),
        true_positives: Vec::new(),
        false_positives: Vec::new(),
    };
    let mut tp = 0;
    let mut fp = 0;
    for (position, &index) in order.iter().enumerate() {
        if labels[index] {
            tp += 1;
        } else {
            fp += 1;
        }
        let last_of_group = order
            .get(position + 1)
            .map_or(true, |&next| scores[next] != scores[index]);
        if last_of_group {
            counts.thresholds.push(scores[index]);
            counts.true_positives.push(tp);
            counts.false_positives.push(fp);
        }
    }
    Ok(counts)
}

/// Compute the ROC curve of scores against boolean labels
///
/// Fails when the labels lack a positive or a negative sample, since one of
/// the rates would be undefined.
pub fn roc_curve(labels: &[bool], scores: &[f64]) -> Result<RocCurve> {
    let counts = threshold_counts(labels, scores)?;
    let n = counts.thresholds.len();
    let positives = counts.true_positives[n - 1];
    let negatives = counts.false_positives[n - 1];
    if positives == 0 || negatives == 0 {
        return Err(ScoreError::InvalidInput(
            "ROC curve requires both positive and negative samples".to_string(),
        ));
    }

    // Keep the end points and every point where the slope changes.
    let keep = |i: usize| -> bool {
        if i == 0 || i + 1 == n {
            return true;
        }
        let tp_bend = counts.true_positives[i + 1] + counts.true_positives[i - 1]
            != 2 * counts.true_positives[i];
        let fp_bend = counts.false_positives[i + 1] + counts.false_positives[i - 1]
            != 2 * counts.false_positives[i];
        tp_bend || fp_bend
    };

    let mut points = Vec::with_capacity(n + 1);
    points.push(RocPoint {
        threshold: f64::INFINITY,
        fpr: 0.0,
        tpr: 0.0,
    });
    points.extend((0..n).filter(|&i| keep(i)).map(|i| RocPoint {
        threshold: counts.thresholds[i],
        fpr: counts.false_positives[i] as f64 / negatives as f64,
        tpr: counts.true_positives[i] as f64 / positives as f64,
    }));

    Ok(RocCurve { points })
}

/// Area under the precision-recall curve, as a step-wise weighted mean
///
/// Undefined when the labels contain no positive sample.
pub fn average_precision(labels: &[bool], scores: &[f64]) -> Result<Option<f64>> {
    let counts = threshold_counts(labels, scores)?;
    let positives = *counts.true_positives.last().unwrap_or(&0);
    if positives == 0 {
        return Ok(None);
    }

    let mut previous_recall = 0.0;
    let mut total = 0.0;
    for (&tp, &fp) in counts.true_positives.iter().zip(&counts.false_positives) {
        let precision = tp as f64 / (tp + fp) as f64;
        let recall = tp as f64 / positives as f64;
        total += (recall - previous_recall) * precision;
        previous_recall = recall;
    }
    Ok(Some(total))
}

/// Area under the ROC curve; undefined when only one class is present
pub fn area_under_roc(labels: &[bool], scores: &[f64]) -> Result<Option<f64>> {
    Ok(roc_curve_if_defined(labels, scores)?.map(|curve| curve.area()))
}

/// Specificity at the first ROC point whose sensitivity reaches `threshold`
///
/// Reports 0.0 if no point reaches it; undefined when only one class is
/// present. Truth without positives is therefore `None`, not 0.0, even
/// though no sensitivity is ever reached.
pub fn specificity_at_sensitivity(
    labels: &[bool],
    scores: &[f64],
    threshold: f64,
) -> Result<Option<f64>> {
    let Some(curve) = roc_curve_if_defined(labels, scores)? else {
        return Ok(None);
    };
    let specificity = curve
        .points
        .iter()
        .find(|point| point.tpr >= threshold)
        .map_or(0.0, |point| 1.0 - point.fpr);
    Ok(Some(specificity))
}

fn roc_curve_if_defined(labels: &[bool], scores: &[f64]) -> Result<Option<RocCurve>> {
    // Runs the input checks even when the curve ends up undefined.
    threshold_counts(labels, scores)?;
    let positives = labels.iter().filter(|&&label| label).count();
    if positives == 0 || positives == labels.len() {
        return Ok(None);
    }
    roc_curve(labels, scores).map(Some)
}

/// Name of the specificity-at-sensitivity metric for a threshold
///
/// Metric names may not contain periods, so `0.872` becomes
/// `spec_at_sens_87_2`.
pub fn spec_metric_name(threshold: f64) -> String {
    format!(
        "spec_at_sens_{}",
        format_general(threshold * 100.0).replace('.', "_")
    )
}

/// Format like C's `%g`: six significant digits, trailing zeros removed
fn format_general(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let exponent = value.abs().log10().floor() as i32;
    if !(-4..6).contains(&exponent) {
        let formatted = format!("{value:.5e}");
        let (mantissa, exp) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
        let mantissa = trim_fraction(mantissa);
        let exp: i32 = exp.parse().unwrap_or(0);
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exp.abs());
    }
    let decimals = (5 - exponent).max(0) as usize;
    trim_fraction(&format!("{value:.decimals$}")).to_string()
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// Average precision as a metric record
pub fn compute_average_precision_metrics(
    labels: &[bool],
    scores: &[f64],
) -> Result<Vec<MetricRecord>> {
    Ok(vec![MetricRecord::new(
        "average_precision",
        average_precision(labels, scores)?,
    )])
}

/// ROC AUC as a metric record
pub fn compute_auc_metrics(labels: &[bool], scores: &[f64]) -> Result<Vec<MetricRecord>> {
    Ok(vec![MetricRecord::new(
        "area_under_roc",
        area_under_roc(labels, scores)?,
    )])
}

/// Specificity at a fixed sensitivity as a metric record
pub fn compute_spec_metrics(
    labels: &[bool],
    scores: &[f64],
    sensitivity_threshold: f64,
) -> Result<Vec<MetricRecord>> {
    Ok(vec![MetricRecord::new(
        spec_metric_name(sensitivity_threshold),
        specificity_at_sensitivity(labels, scores, sensitivity_threshold)?,
    )])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_roc_curve_points() {
        let labels = [false, false, true, true];
        let scores = [0.1, 0.4, 0.35, 0.8];
        let curve = roc_curve(&labels, &scores).unwrap();

        let fpr: Vec<f64> = curve.points.iter().map(|p| p.fpr).collect();
        let tpr: Vec<f64> = curve.points.iter().map(|p| p.tpr).collect();
        let thresholds: Vec<f64> = curve.points.iter().map(|p| p.threshold).collect();

        assert_eq!(fpr, vec![0.0, 0.0, 0.5, 0.5, 1.0]);
        assert_eq!(tpr, vec![0.0, 0.5, 0.5, 1.0, 1.0]);
        assert_eq!(thresholds, vec![f64::INFINITY, 0.8, 0.4, 0.35, 0.1]);
    }

    #[test]
    fn test_roc_curve_drops_collinear_points() {
        let labels = [true, true, true, false];
        let scores = [0.9, 0.8, 0.7, 0.1];
        let curve = roc_curve(&labels, &scores).unwrap();

        let tpr: Vec<f64> = curve.points.iter().map(|p| p.tpr).collect();
        assert_eq!(tpr, vec![0.0, 1.0 / 3.0, 1.0, 1.0]);
    }

    #[test]
    fn test_roc_curve_groups_ties() {
        let labels = [true, false, true, false];
        let scores = [0.5, 0.5, 0.5, 0.5];
        let curve = roc_curve(&labels, &scores).unwrap();
        assert_eq!(curve.points.len(), 2);
        assert_eq!(curve.points[1].fpr, 1.0);
        assert_eq!(curve.points[1].tpr, 1.0);
        assert_close(curve.area(), 0.5);
    }

    #[test]
    fn test_roc_curve_requires_both_classes() {
        assert!(roc_curve(&[true, true], &[0.2, 0.3]).is_err());
        assert!(roc_curve(&[false, false], &[0.2, 0.3]).is_err());
    }

    #[test]
    fn test_area_under_roc() {
        let labels = [false, false, true, true];
        let scores = [0.1, 0.4, 0.35, 0.8];
        assert_close(area_under_roc(&labels, &scores).unwrap().unwrap(), 0.75);

        let perfect = [0.1, 0.2, 0.8, 0.9];
        assert_close(area_under_roc(&labels, &perfect).unwrap().unwrap(), 1.0);
    }

    #[test]
    fn test_area_under_roc_single_class_is_undefined() {
        assert_eq!(area_under_roc(&[true, true], &[0.1, 0.9]).unwrap(), None);
    }

    #[test]
    fn test_average_precision() {
        let labels = [false, false, true, true];
        let scores = [0.1, 0.4, 0.35, 0.8];
        assert_close(
            average_precision(&labels, &scores).unwrap().unwrap(),
            0.8333333333333333,
        );
    }

    #[test]
    fn test_average_precision_with_ties() {
        let labels = [true, false, true, false];
        let scores = [0.5, 0.5, 0.5, 0.5];
        assert_close(average_precision(&labels, &scores).unwrap().unwrap(), 0.5);
    }

    #[test]
    fn test_average_precision_without_positives_is_undefined() {
        assert_eq!(average_precision(&[false, false], &[0.3, 0.6]).unwrap(), None);
    }

    #[test]
    fn test_specificity_at_sensitivity() {
        let labels = [false, false, true, true];
        let scores = [0.1, 0.4, 0.35, 0.8];

        assert_eq!(
            specificity_at_sensitivity(&labels, &scores, 0.5).unwrap(),
            Some(1.0)
        );
        assert_eq!(
            specificity_at_sensitivity(&labels, &scores, 0.9).unwrap(),
            Some(0.5)
        );
        assert_eq!(
            specificity_at_sensitivity(&labels, &scores, 0.0).unwrap(),
            Some(1.0)
        );
    }

    #[test]
    fn test_specificity_at_unreachable_sensitivity_is_zero() {
        let labels = [false, true];
        let scores = [0.1, 0.9];
        assert_eq!(
            specificity_at_sensitivity(&labels, &scores, 1.5).unwrap(),
            Some(0.0)
        );
    }

    #[test]
    fn test_specificity_without_positives_is_undefined() {
        let labels = [false, false, false];
        let scores = [0.2, 0.5, 0.7];
        assert_eq!(specificity_at_sensitivity(&labels, &scores, 0.82).unwrap(), None);
    }

    #[test]
    fn test_input_checks() {
        assert!(average_precision(&[true], &[0.1, 0.2]).is_err());
        assert!(area_under_roc(&[], &[]).is_err());
        assert!(area_under_roc(&[true, false], &[f64::NAN, 0.2]).is_err());
    }

    #[test]
    fn test_spec_metric_name() {
        assert_eq!(spec_metric_name(0.872), "spec_at_sens_87_2");
        assert_eq!(spec_metric_name(0.95), "spec_at_sens_95");
        assert_eq!(spec_metric_name(0.82), "spec_at_sens_82");
        assert_eq!(spec_metric_name(1.0), "spec_at_sens_100");
        assert_eq!(spec_metric_name(0.0), "spec_at_sens_0");
    }

    #[test]
    fn test_format_general() {
        assert_eq!(format_general(87.2), "87.2");
        assert_eq!(format_general(0.5), "0.5");
        assert_eq!(format_general(123456.7), "123457");
        assert_eq!(format_general(1234567.0), "1.23457e+06");
        assert_eq!(format_general(0.00001), "1e-05");
    }

    #[test]
    fn test_record_builders() {
        let labels = [false, true];
        let scores = [0.2, 0.7];
        assert_eq!(
            compute_auc_metrics(&labels, &scores).unwrap(),
            vec![MetricRecord::defined("area_under_roc", 1.0)]
        );
        assert_eq!(
            compute_average_precision_metrics(&labels, &scores).unwrap(),
            vec![MetricRecord::defined("average_precision", 1.0)]
        );
        assert_eq!(
            compute_spec_metrics(&labels, &scores, 0.95).unwrap(),
            vec![MetricRecord::defined("spec_at_sens_95", 1.0)]
        );
    }
}
