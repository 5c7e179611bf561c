//! Order-stable deduplication of merged provider results.

use std::collections::HashSet;

use claimlit_common::{normalize_title, EvidenceCandidate};

/// Drop candidates whose normalized title was already seen, keeping the
/// first occurrence. Iteration order is preserved, so whichever provider
/// comes first in the configured list wins ties.
pub fn dedupe_by_title(candidates: Vec<EvidenceCandidate>) -> Vec<EvidenceCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(normalize_title(&c.title)))
        .collect()
}
