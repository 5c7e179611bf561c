//! claimlit-common — Shared types, errors, and the capped HTTP client used
//! across all claimlit crates.

pub mod error;
pub mod evidence;
pub mod netguard;

pub use evidence::{normalize_title, EvidenceCandidate, EvidenceGrade};
