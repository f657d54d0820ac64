use crate::types::Class;

/// Binary classification outcomes accumulated over an evaluation pass
///
/// Phishing is the positive class. Metrics whose denominator is zero (e.g.
/// precision when nothing was classified as phishing) report 0.0 instead of
/// dividing by zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_positives: u32,
    pub true_negatives: u32,
    pub false_positives: u32,
    pub false_negatives: u32,
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally one prediction against its ground truth
    pub fn record(&mut self, predicted: Class, actual: Class) {
        match (predicted, actual) {
            (Class::Phishing, Class::Phishing) => self.true_positives += 1,
            (Class::Benign, Class::Benign) => self.true_negatives += 1,
            (Class::Phishing, Class::Benign) => self.false_positives += 1,
            (Class::Benign, Class::Phishing) => self.false_negatives += 1,
        }
    }

    /// Total number of tallied predictions
    pub fn total(&self) -> u32 {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    /// Number of correct predictions
    pub fn correct(&self) -> u32 {
        self.true_positives + self.true_negatives
    }

    /// TP / (TP + FP)
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// TP / (TP + FN)
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// (TP + TN) / total
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }

    /// Harmonic mean of precision and recall
    pub fn f_score(&self) -> f64 {
        let p = self.precision();
        let r = self.recall();
        if p + r == 0.0 {
            return 0.0;
        }
        2.0 * p * r / (p + r)
    }
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    f64::from(numerator) / f64::from(denominator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_benign_predictor_on_a_balanced_slice() {
        // Four records with truths [0, 0, 1, 1] against a predictor that
        // always answers benign
        let mut cm = ConfusionMatrix::new();
        for actual in [Class::Benign, Class::Benign, Class::Phishing, Class::Phishing] {
            cm.record(Class::Benign, actual);
        }

        assert_eq!(cm.true_positives, 0);
        assert_eq!(cm.true_negatives, 2);
        assert_eq!(cm.false_positives, 0);
        assert_eq!(cm.false_negatives, 2);
        assert_eq!(cm.accuracy(), 0.5);
        assert_eq!(cm.precision(), 0.0, "no positive predictions reports 0");
        assert_eq!(cm.recall(), 0.0);
        assert_eq!(cm.f_score(), 0.0, "degenerate F-score reports 0");
    }

    #[test]
    fn perfect_predictor() {
        let mut cm = ConfusionMatrix::new();
        cm.record(Class::Phishing, Class::Phishing);
        cm.record(Class::Benign, Class::Benign);

        assert_eq!(cm.precision(), 1.0);
        assert_eq!(cm.recall(), 1.0);
        assert_eq!(cm.accuracy(), 1.0);
        assert_eq!(cm.f_score(), 1.0);
    }

    #[test]
    fn mixed_predictions() {
        let mut cm = ConfusionMatrix::new();
        // 3 TP, 1 FP, 1 FN, 1 TN
        for _ in 0..3 {
            cm.record(Class::Phishing, Class::Phishing);
        }
        cm.record(Class::Phishing, Class::Benign);
        cm.record(Class::Benign, Class::Phishing);
        cm.record(Class::Benign, Class::Benign);

        assert_eq!(cm.total(), 6);
        assert_eq!(cm.precision(), 0.75);
        assert_eq!(cm.recall(), 0.75);
        assert_eq!(cm.f_score(), 0.75);
    }

    #[test]
    fn empty_matrix_is_all_zeros() {
        let cm = ConfusionMatrix::new();
        assert_eq!(cm.total(), 0);
        assert_eq!(cm.accuracy(), 0.0);
        assert_eq!(cm.f_score(), 0.0);
    }
}
