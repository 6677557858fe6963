//! Binary confusion matrix counts

use crate::error::{Result, ScoreError};
use ndarray::{ArrayBase, Data, Dimension, Zip};

/// True/false positive/negative counts of a binary comparison
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tfpn {
    /// Truth and test both positive
    pub true_positive: usize,
    /// Truth and test both negative
    pub true_negative: usize,
    /// Truth negative, test positive
    pub false_positive: usize,
    /// Truth positive, test negative
    pub false_negative: usize,
}

impl Tfpn {
    /// Total number of compared samples
    pub fn total(&self) -> usize {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }

    /// Samples that are positive in the truth
    pub fn truth_positives(&self) -> usize {
        self.true_positive + self.false_negative
    }

    /// Samples that are negative in the truth
    pub fn truth_negatives(&self) -> usize {
        self.true_negative + self.false_positive
    }

    /// Samples that are positive in the test
    pub fn test_positives(&self) -> usize {
        self.true_positive + self.false_positive
    }
}

/// Count the confusion matrix of two boolean arrays of the same shape
pub fn compute_tfpn<S, T, D>(truth: &ArrayBase<S, D>, test: &ArrayBase<T, D>) -> Result<Tfpn>
where
    S: Data<Elem = bool>,
    T: Data<Elem = bool>,
    D: Dimension,
{
    if truth.shape() != test.shape() {
        return Err(ScoreError::ShapeMismatch {
            truth: truth.shape().to_vec(),
            test: test.shape().to_vec(),
        });
    }

    let mut counts = Tfpn::default();
    Zip::from(truth).and(test).for_each(|&t, &p| match (t, p) {
        (true, true) => counts.true_positive += 1,
        (false, false) => counts.true_negative += 1,
        (false, true) => counts.false_positive += 1,
        (true, false) => counts.false_negative += 1,
    });
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, array, Array2};

    #[test]
    fn test_counts() {
        let truth = arr1(&[true, true, false, false, true]);
        let test = arr1(&[true, false, true, false, true]);
        let counts = compute_tfpn(&truth, &test).unwrap();

        assert_eq!(
            counts,
            Tfpn {
                true_positive: 2,
                true_negative: 1,
                false_positive: 1,
                false_negative: 1,
            }
        );
        assert_eq!(counts.total(), 5);
        assert_eq!(counts.truth_positives(), 3);
        assert_eq!(counts.truth_negatives(), 2);
        assert_eq!(counts.test_positives(), 3);
    }

    #[test]
    fn test_two_dimensional_masks() {
        let truth = array![[true, false], [false, false]];
        let test = Array2::from_elem((2, 2), false);
        let counts = compute_tfpn(&truth, &test).unwrap();
        assert_eq!(counts.false_negative, 1);
        assert_eq!(counts.true_negative, 3);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_shape_mismatch() {
        let truth = Array2::from_elem((2, 3), true);
        let test = Array2::from_elem((3, 2), true);
        assert!(matches!(
            compute_tfpn(&truth, &test),
            Err(ScoreError::ShapeMismatch { .. })
        ));
    }
}
