use super::{hit::Hit, AccessionSet};

#[derive(Debug, Clone, Copy)]
pub struct PairingParams {
    pub max_mismatches: i64,
    pub max_amplicon_len: i64,
}

/// Returns the accessions on which some forward hit is followed by a reverse
/// hit no further than `max_amplicon_len` away. Only hits that align the
/// whole primer with at most `max_mismatches` mismatches take part.
pub fn observed_accessions(hits: &[Hit], params: &PairingParams) -> AccessionSet {
    let mut hits: Vec<&Hit> = hits
        .iter()
        .filter(|hit| hit.is_end_to_end() && hit.mismatches <= params.max_mismatches)
        .collect();
    // Stable, so equal starts keep their input order
    hits.sort_by(|a, b| a.accession.cmp(&b.accession).then(a.start.cmp(&b.start)));

    let mut observed = AccessionSet::new();
    for (i, fwd) in hits.iter().enumerate() {
        if !fwd.is_forward() || observed.contains(&fwd.accession) {
            continue;
        }
        let paired = hits[i + 1..]
            .iter()
            .take_while(|rev| rev.accession == fwd.accession)
            .any(|rev| {
                rev.is_reverse() && amplicon_len(fwd, rev) <= params.max_amplicon_len
            });
        if paired {
            observed.insert(fwd.accession.clone());
        }
    }
    observed
}

fn amplicon_len(fwd: &Hit, rev: &Hit) -> i64 {
    rev.end - fwd.start + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(mismatches: i64, accession: &str, start: i64, end: i64) -> Hit {
        Hit {
            length: 20,
            query_len: 20,
            mismatches,
            accession: accession.to_string(),
            start,
            end,
        }
    }

    fn params(max_mismatches: i64, max_amplicon_len: i64) -> PairingParams {
        PairingParams {
            max_mismatches,
            max_amplicon_len,
        }
    }

    fn names(set: &AccessionSet) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn pair_within_max_len() {
        let hits = vec![hit(1, "A1", 100, 119), hit(0, "A1", 300, 281)];
        let observed = observed_accessions(&hits, &params(2, 250));
        assert_eq!(names(&observed), vec!["A1"]);
    }

    #[test]
    fn pair_exceeding_max_len_not_observed() {
        let hits = vec![hit(1, "A1", 100, 119), hit(0, "A1", 300, 281)];
        let observed = observed_accessions(&hits, &params(2, 100));
        assert!(observed.is_empty());
    }

    #[test]
    fn amplicon_len_boundary_is_inclusive() {
        let hits = vec![hit(0, "A1", 100, 119), hit(0, "A1", 300, 281)];
        assert_eq!(names(&observed_accessions(&hits, &params(0, 182))), vec!["A1"]);
        assert!(observed_accessions(&hits, &params(0, 181)).is_empty());
    }

    #[test]
    fn too_many_mismatches_discarded() {
        let hits = vec![hit(3, "A1", 100, 119), hit(0, "A1", 300, 281)];
        assert!(observed_accessions(&hits, &params(2, 4000)).is_empty());
    }

    #[test]
    fn partial_alignment_discarded() {
        let mut partial = hit(0, "A1", 300, 283);
        partial.length = 18;
        let hits = vec![hit(0, "A1", 100, 119), partial];
        assert!(observed_accessions(&hits, &params(5, 4000)).is_empty());
    }

    #[test]
    fn never_pairs_across_accessions() {
        let hits = vec![hit(0, "A1", 100, 119), hit(0, "A2", 300, 281)];
        assert!(observed_accessions(&hits, &params(5, 4000)).is_empty());
    }

    #[test]
    fn reverse_before_forward_not_paired() {
        let hits = vec![hit(0, "A1", 300, 281), hit(0, "A1", 400, 419)];
        assert!(observed_accessions(&hits, &params(5, 4000)).is_empty());
    }

    #[test]
    fn later_forward_hit_can_pair() {
        let hits = vec![
            hit(0, "A1", 10, 29),
            hit(0, "A1", 5000, 5019),
            hit(0, "A1", 5200, 5181),
        ];
        assert_eq!(names(&observed_accessions(&hits, &params(5, 4000))), vec!["A1"]);
    }

    #[test]
    fn independent_of_input_order() {
        let hits = vec![
            hit(0, "B2", 900, 881),
            hit(0, "A1", 300, 281),
            hit(0, "C3", 50, 69),
            hit(0, "A1", 100, 119),
            hit(0, "B2", 700, 719),
            hit(0, "C3", 9000, 8981),
        ];
        let mut reversed = hits.clone();
        reversed.reverse();
        let expected = observed_accessions(&hits, &params(5, 4000));
        assert_eq!(names(&expected), vec!["A1", "B2"]);
        assert_eq!(observed_accessions(&reversed, &params(5, 4000)), expected);
    }

    #[test]
    fn equal_starts_keep_input_order() {
        let forward = hit(0, "A1", 100, 119);
        let reverse = hit(0, "A1", 100, 81);
        let other = hit(0, "A0", 5, 24);

        let hits = vec![forward.clone(), other.clone(), reverse.clone()];
        let observed = observed_accessions(&hits, &params(0, 250));
        assert_eq!(names(&observed), vec!["A1"]);

        let hits = vec![reverse, other, forward];
        assert!(observed_accessions(&hits, &params(0, 250)).is_empty());
    }
}
