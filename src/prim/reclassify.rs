use super::{classify::ClassificationResult, distance::DistanceMatrix, AccessionSet};

#[derive(Debug, Clone, Copy)]
pub struct ReclassifyParams<'a> {
    pub reference: &'a str,
    pub threshold: f64,
    pub check_true_positives: bool,
}

/// Corrects a classification with the distance of each accession to the
/// reference strain:
///
/// - false positives within `threshold` become true positives;
/// - false negatives beyond `threshold` (or without a distance) are dropped;
/// - with `check_true_positives`, true positives beyond `threshold` become
///   false positives.
///
/// Every rule looks at the input categories only, so applying the correction
/// twice gives the same result as applying it once.
pub fn reclassify(
    result: &ClassificationResult,
    matrix: &DistanceMatrix,
    params: &ReclassifyParams,
) -> ClassificationResult {
    let distance = |acc: &String| matrix.distance(params.reference, acc);
    let within = |acc: &String| distance(acc) <= params.threshold;
    let beyond = |acc: &String| distance(acc) > params.threshold;

    let (promoted, false_positives) = split(&result.false_positives, within);
    let (false_negatives, dropped) = split(&result.false_negatives, within);
    let (demoted, mut true_positives) = if params.check_true_positives {
        split(&result.true_positives, beyond)
    } else {
        (AccessionSet::new(), result.true_positives.clone())
    };

    log::debug!(
        "{}: {} false positives promoted, {} false negatives dropped, {} true positives demoted",
        result.primer_set,
        promoted.len(),
        dropped.len(),
        demoted.len()
    );

    true_positives.extend(promoted);
    ClassificationResult::new(
        result.primer_set.clone(),
        true_positives,
        false_positives.union(&demoted).cloned().collect(),
        false_negatives,
    )
}

/// Splits `accessions` into those matching `predicate` and the rest.
fn split<F>(accessions: &AccessionSet, predicate: F) -> (AccessionSet, AccessionSet)
where
    F: Fn(&String) -> bool,
{
    accessions.iter().cloned().partition(|acc| predicate(acc))
}
