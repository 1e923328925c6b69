use super::{targets::TargetSets, AccessionSet};

/// Classification of the accessions hit by one primer set.
///
/// The three sets are pairwise disjoint. Sensitivity and specificity are `NaN`
/// when their denominator is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub primer_set: String,
    pub true_positives: AccessionSet,
    pub false_positives: AccessionSet,
    pub false_negatives: AccessionSet,
    pub sensitivity: f64,
    pub specificity: f64,
}

impl ClassificationResult {
    /// Builds a result from its three categories and computes the metrics.
    pub fn new(
        primer_set: impl Into<String>,
        true_positives: AccessionSet,
        false_positives: AccessionSet,
        false_negatives: AccessionSet,
    ) -> Self {
        let mut result = ClassificationResult {
            primer_set: primer_set.into(),
            true_positives,
            false_positives,
            false_negatives,
            sensitivity: f64::NAN,
            specificity: f64::NAN,
        };
        result.update_metrics();
        result
    }

    pub fn update_metrics(&mut self) {
        let tp = self.true_positives.len();
        self.sensitivity = ratio(tp, tp + self.false_negatives.len());
        self.specificity = ratio(tp, tp + self.false_positives.len());
    }

    /// Every accession named by the result, in sorted order.
    pub fn accessions(&self) -> impl Iterator<Item = &String> {
        itertools::kmerge([
            self.true_positives.iter(),
            self.false_positives.iter(),
            self.false_negatives.iter(),
        ])
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        f64::NAN
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Compares the accessions a primer set amplified with the accessions it was
/// expected to amplify.
pub fn classify(
    primer_set: impl Into<String>,
    observed: &AccessionSet,
    targets: &TargetSets,
) -> ClassificationResult {
    let (true_positives, false_positives): (AccessionSet, AccessionSet) = observed
        .iter()
        .cloned()
        .partition(|accession| targets.candidate_pool.contains(accession));
    let false_negatives = targets
        .expected_targets
        .difference(observed)
        .cloned()
        .collect();
    ClassificationResult::new(primer_set, true_positives, false_positives, false_negatives)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(accessions: &[&str]) -> AccessionSet {
        accessions.iter().map(|s| s.to_string()).collect()
    }

    fn assert_disjoint(result: &ClassificationResult) {
        assert!(result.true_positives.is_disjoint(&result.false_positives));
        assert!(result.true_positives.is_disjoint(&result.false_negatives));
        assert!(result.false_positives.is_disjoint(&result.false_negatives));
    }

    #[test]
    fn classify_observed_against_targets() {
        let targets = TargetSets {
            candidate_pool: set(&["A1", "A2", "A3"]),
            expected_targets: set(&["A1", "A2", "A3"]),
        };
        let result = classify("prim.fasta", &set(&["A1", "A4"]), &targets);
        assert_eq!(result.primer_set, "prim.fasta");
        assert_eq!(result.true_positives, set(&["A1"]));
        assert_eq!(result.false_positives, set(&["A4"]));
        assert_eq!(result.false_negatives, set(&["A2", "A3"]));
        assert!((result.sensitivity - 1.0 / 3.0).abs() < 1e-12);
        assert!((result.specificity - 0.5).abs() < 1e-12);
        assert_disjoint(&result);
    }

    #[test]
    fn pool_member_that_is_not_expected_is_true_positive() {
        let targets = TargetSets {
            candidate_pool: set(&["A1", "P1"]),
            expected_targets: set(&["A1"]),
        };
        let result = classify("p", &set(&["P1"]), &targets);
        assert_eq!(result.true_positives, set(&["P1"]));
        assert_eq!(result.false_negatives, set(&["A1"]));
        assert!((result.sensitivity - 0.5).abs() < 1e-12);
        assert_eq!(result.specificity, 1.0);
    }

    #[test]
    fn nothing_observed_gives_nan_specificity() {
        let targets = TargetSets {
            candidate_pool: set(&["A1"]),
            expected_targets: set(&["A1"]),
        };
        let result = classify("p", &AccessionSet::new(), &targets);
        assert_eq!(result.sensitivity, 0.0);
        assert!(result.specificity.is_nan());
    }

    #[test]
    fn empty_everything_gives_nan_metrics() {
        let result = classify("p", &AccessionSet::new(), &TargetSets::default());
        assert!(result.sensitivity.is_nan());
        assert!(result.specificity.is_nan());
    }

    #[test]
    fn only_false_positives() {
        let result = classify("p", &set(&["X1", "X2"]), &TargetSets::default());
        assert!(result.sensitivity.is_nan());
        assert_eq!(result.specificity, 0.0);
        assert_disjoint(&result);
    }

    #[test]
    fn accessions_are_sorted_across_categories() {
        let result = ClassificationResult::new("p", set(&["B", "D"]), set(&["A"]), set(&["C"]));
        let all: Vec<&String> = result.accessions().collect();
        assert_eq!(all, vec!["A", "B", "C", "D"]);
    }
}
