//! Static fallback evidence used by test mode.
//!
//! These records carry no `url`: they are canned data, not
//! provider-sourced, and the trust indicator downstream keys on `url`
//! presence.

use claimlit_common::{EvidenceCandidate, EvidenceGrade};

/// Canned evidence returned when a request sets `testMode`.
pub fn static_evidence() -> Vec<EvidenceCandidate> {
    vec![
        record(
            "The effect of magnesium supplementation on primary insomnia in elderly subjects",
            "Abbasi B et al.",
            "Journal of Research in Medical Sciences",
            2012,
            46,
            "ISI reduction of 4.3 points vs placebo",
            "500 mg/day",
            "8 weeks",
            EvidenceGrade::Moderate,
            "Double-blind placebo-controlled trial reporting improved sleep \
             efficiency and sleep time in supplemented elderly subjects.",
        ),
        record(
            "An investigation into the stress-relieving and pharmacological actions of an ashwagandha extract",
            "Lopresti AL et al.",
            "Medicine",
            2019,
            60,
            "Significant reduction in HAM-A and DASS-21 scores",
            "240 mg/day",
            "60 days",
            EvidenceGrade::Moderate,
            "Randomized, double-blind, placebo-controlled study of adults with \
             self-reported high stress.",
        ),
        record(
            "Omega-3 supplementation and cardiovascular risk factors: an umbrella review",
            "Khan SU et al.",
            "Annals of Internal Medicine",
            2021,
            12800,
            "Modest triglyceride reduction; no significant mortality effect",
            "1 g/day",
            "12 months median follow-up",
            EvidenceGrade::High,
            "Umbrella review aggregating randomized trials of marine omega-3 \
             fatty acids on cardiovascular outcomes.",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn record(
    title: &str,
    authors: &str,
    journal: &str,
    year: i32,
    sample_size: u32,
    effect_size: &str,
    dosage: &str,
    duration: &str,
    grade: EvidenceGrade,
    summary: &str,
) -> EvidenceCandidate {
    let mut c = EvidenceCandidate::bare(title);
    c.authors = authors.to_string();
    c.journal = journal.to_string();
    c.year = year;
    c.sample_size = sample_size;
    c.effect_size = effect_size.to_string();
    c.dosage = dosage.to_string();
    c.duration = duration.to_string();
    c.evidence_grade = grade;
    c.summary = summary.to_string();
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_records_carry_no_url() {
        let records = static_evidence();
        assert!(!records.is_empty());
        assert!(records.iter().all(|r| r.url.is_none()));
    }

    #[test]
    fn test_fallback_titles_unique() {
        let records = static_evidence();
        let mut keys: Vec<String> = records.iter().map(|r| r.dedupe_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), records.len());
    }
}
