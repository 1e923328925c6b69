use super::AccessionSet;

/// Output format requested from `blastdbcmd` for the taxon listing.
pub const LISTING_OUTFMT: &str = "%a %t";

const COMPLETE_GENOME: &str = "complete genome";
const PLASMID: &str = "plasmid";

/// Accessions returned by the taxon query (`candidate_pool`) and the subset
/// that should be amplified (`expected_targets`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetSets {
    pub candidate_pool: AccessionSet,
    pub expected_targets: AccessionSet,
}

impl TargetSets {
    /// Builds the sets from `accession description` lines. An accession is an
    /// expected target when its description names a complete genome that is
    /// not a plasmid.
    pub fn from_listing(listing: &str) -> Self {
        let mut sets = TargetSets::default();
        for line in listing.lines() {
            let line = line.trim();
            let (accession, description) = match line.split_once(char::is_whitespace) {
                Some((accession, description)) => (accession, description),
                None if !line.is_empty() => (line, ""),
                None => continue,
            };
            sets.candidate_pool.insert(accession.to_string());
            if is_expected_target(description) {
                sets.expected_targets.insert(accession.to_string());
            }
        }
        sets
    }
}

fn is_expected_target(description: &str) -> bool {
    description.contains(COMPLETE_GENOME) && !description.contains(PLASMID)
}
