//! Binary classification metrics
//!
//! Confusion-matrix based. The positive class is a "yes" response; the
//! trainer's acceptance metric is F1 on that class, which stays honest under
//! the heavy class imbalance this dataset carries.

/// Binary confusion matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryConfusion {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl BinaryConfusion {
    /// Tally predictions against ground truth
    ///
    /// Both slices must have the same length; extra elements in the longer one
    /// are ignored.
    pub fn from_predictions(y_pred: &[bool], y_true: &[bool]) -> Self {
        let mut cm = Self {
            true_positives: 0,
            false_positives: 0,
            true_negatives: 0,
            false_negatives: 0,
        };
        for (&p, &t) in y_pred.iter().zip(y_true.iter()) {
            match (p, t) {
                (true, true) => cm.true_positives += 1,
                (true, false) => cm.false_positives += 1,
                (false, false) => cm.true_negatives += 1,
                (false, true) => cm.false_negatives += 1,
            }
        }
        cm
    }

    /// Total number of tallied samples
    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    /// Fraction of correct predictions
    pub fn accuracy(&self) -> f64 {
        ratio(
            self.true_positives + self.true_negatives,
            self.total(),
        )
    }

    /// Precision on the positive class
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// Recall on the positive class
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// F1 on the positive class
    pub fn f1(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r > 0.0 {
            2.0 * p * r / (p + r)
        } else {
            0.0
        }
    }

    /// Mean of per-class recall, robust to imbalance
    pub fn balanced_accuracy(&self) -> f64 {
        let tpr = self.recall();
        let tnr = ratio(self.true_negatives, self.true_negatives + self.false_positives);
        (tpr + tnr) / 2.0
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// F1 on the positive class, straight from prediction slices
pub fn f1_score(y_pred: &[bool], y_true: &[bool]) -> f64 {
    BinaryConfusion::from_predictions(y_pred, y_true).f1()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_confusion_tallies() {
        let y_true = [true, true, false, false, true];
        let y_pred = [true, false, false, true, true];
        let cm = BinaryConfusion::from_predictions(&y_pred, &y_true);
        assert_eq!(cm.true_positives, 2);
        assert_eq!(cm.false_negatives, 1);
        assert_eq!(cm.false_positives, 1);
        assert_eq!(cm.true_negatives, 1);
        assert_eq!(cm.total(), 5);
    }

    #[test]
    fn test_perfect_predictions() {
        let y = [true, false, true, false];
        let cm = BinaryConfusion::from_predictions(&y, &y);
        assert_abs_diff_eq!(cm.accuracy(), 1.0);
        assert_abs_diff_eq!(cm.f1(), 1.0);
        assert_abs_diff_eq!(cm.balanced_accuracy(), 1.0);
    }

    #[test]
    fn test_all_negative_predictor_scores_zero_f1() {
        let y_true = [true, true, false, false];
        let y_pred = [false, false, false, false];
        let cm = BinaryConfusion::from_predictions(&y_pred, &y_true);
        assert_abs_diff_eq!(cm.f1(), 0.0);
        // but accuracy still looks fine, which is why the gate uses F1
        assert_abs_diff_eq!(cm.accuracy(), 0.5);
    }

    #[test]
    fn test_f1_matches_hand_computation() {
        let y_true = [true, true, true, false, false, false, false, false];
        let y_pred = [true, true, false, true, false, false, false, false];
        // tp=2 fp=1 fn=1 -> p=2/3 r=2/3 f1=2/3
        assert_abs_diff_eq!(f1_score(&y_pred, &y_true), 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_input() {
        let cm = BinaryConfusion::from_predictions(&[], &[]);
        assert_eq!(cm.total(), 0);
        assert_abs_diff_eq!(cm.accuracy(), 0.0);
        assert_abs_diff_eq!(cm.f1(), 0.0);
    }
}
