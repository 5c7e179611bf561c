//! Evidence candidate data model.
//!
//! An `EvidenceCandidate` is one bibliographic record surfaced by a search
//! provider or filled in by the enrichment step. Candidates live for a
//! single request; nothing here is persisted.

use serde::{Deserialize, Serialize};

/// Strength-of-evidence grade attached to a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvidenceGrade {
    High,
    Moderate,
    Low,
}

impl Default for EvidenceGrade {
    fn default() -> Self {
        EvidenceGrade::Moderate
    }
}

impl EvidenceGrade {
    /// Normalize a free-text grade ("moderately high", "LOW quality", …)
    /// into the enumerated set. Unrecognized or empty input is Moderate.
    pub fn from_free_text(text: &str) -> Self {
        let t = text.to_lowercase();
        if t.contains("high") {
            EvidenceGrade::High
        } else if t.contains("low") {
            EvidenceGrade::Low
        } else {
            EvidenceGrade::Moderate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceGrade::High => "High",
            EvidenceGrade::Moderate => "Moderate",
            EvidenceGrade::Low => "Low",
        }
    }
}

/// One bibliographic record relevant to a product claim.
///
/// `url` is present only when the record came from a real provider call.
/// The enrichment step must never set it; downstream trust indicators rely
/// on that distinction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceCandidate {
    pub title: String,
    pub authors: String,
    pub journal: String,
    pub year: i32,
    pub sample_size: u32,
    pub effect_size: String,
    pub dosage: String,
    pub duration: String,
    pub evidence_grade: EvidenceGrade,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl EvidenceCandidate {
    /// A candidate with every enrichable field at its unknown default.
    pub fn bare(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: "Unknown authors".to_string(),
            journal: String::new(),
            year: 0,
            sample_size: 0,
            effect_size: "Not specified".to_string(),
            dosage: "Not specified".to_string(),
            duration: "Not specified".to_string(),
            evidence_grade: EvidenceGrade::Moderate,
            summary: String::new(),
            details: None,
            url: None,
        }
    }

    /// Identity key used for deduplication and enrichment merging.
    pub fn dedupe_key(&self) -> String {
        normalize_title(&self.title)
    }
}

/// Case-insensitive, whitespace-normalized form of a title.
/// Sole identity key for deduplication.
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
