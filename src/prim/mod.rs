pub mod amplicon;
pub mod classify;
pub mod distance;
pub mod hit;
pub mod reclassify;
pub mod report;
pub mod targets;

use std::collections::BTreeSet;

/// Database accessions; iteration yields them in sorted order.
pub type AccessionSet = BTreeSet<String>;
