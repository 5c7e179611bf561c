//! Evidence enrichment — one batched completion that estimates missing
//! quantitative fields for a list of candidates.
//!
//! The model must answer with a single JSON object `{"papers": [...]}`
//! where each entry echoes the input paper's title verbatim as the join
//! key. Any other shape is rejected and the pipeline falls back to the
//! un-enriched list.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use claimlit_common::{normalize_title, EvidenceCandidate, EvidenceGrade};
use claimlit_search::EvidenceEnricher;

use crate::backend::{LlmBackend, LlmError, LlmRequest, Message};

const SYSTEM_PROMPT: &str = "You are a clinical research analyst. For each paper you are given, \
estimate the study's sample size, effect size, dosage, duration, and \
evidence grade (High, Moderate, or Low), write a two-sentence summary, and \
a short methodology paragraph. Echo each paper's title back EXACTLY as \
given. Reply with a single JSON object of the form \
{\"papers\": [{\"title\": ..., \"sampleSize\": ..., \"effectSize\": ..., \
\"dosage\": ..., \"duration\": ..., \"evidenceGrade\": ..., \
\"summary\": ..., \"details\": ...}]} and nothing else.";

/// Per-paper estimates as the model reports them. Title is the join key.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperEstimate {
    pub title: String,
    #[serde(default)]
    pub sample_size: Option<u32>,
    #[serde(default)]
    pub effect_size: Option<String>,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub evidence_grade: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

/// The single accepted reply shape.
#[derive(Debug, serde::Deserialize)]
struct EnrichmentReply {
    papers: Vec<PaperEstimate>,
}

pub struct LlmEnricher {
    backend: Arc<dyn LlmBackend>,
}

impl LlmEnricher {
    pub fn new(backend: Arc<dyn LlmBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl EvidenceEnricher for LlmEnricher {
    #[instrument(skip(self, candidates))]
    async fn enrich(
        &self,
        candidates: Vec<EvidenceCandidate>,
    ) -> anyhow::Result<Vec<EvidenceCandidate>> {
        if candidates.is_empty() {
            return Ok(candidates);
        }

        let req = LlmRequest {
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: render_papers(&candidates),
                },
            ],
            model: None,
            max_tokens: Some(4096),
            temperature: Some(0.1),
        };

        let resp = self.backend.complete(req).await?;
        let estimates = parse_reply(&resp.content)?;
        debug!(
            model = self.backend.model_id(),
            n = estimates.len(),
            "Enrichment estimates received"
        );

        Ok(merge_estimates(candidates, &estimates))
    }
}

/// Render the candidate list as the user prompt.
fn render_papers(candidates: &[EvidenceCandidate]) -> String {
    let mut out = String::from("Papers:\n");
    for c in candidates {
        out.push_str(&format!(
            "- Title: {}\n  Authors: {}\n  Journal: {}\n  Year: {}\n  Abstract: {}\n",
            c.title, c.authors, c.journal, c.year, c.summary
        ));
    }
    out
}

/// Parse the model's reply into estimates, rejecting anything that is not
/// the single expected `{"papers": [...]}` object.
pub fn parse_reply(content: &str) -> Result<Vec<PaperEstimate>, LlmError> {
    let cleaned = strip_code_fences(content);
    let reply: EnrichmentReply = serde_json::from_str(cleaned)
        .map_err(|e| LlmError::BadOutput(format!("expected {{\"papers\": [...]}}: {}", e)))?;
    Ok(reply.papers)
}

/// Models frequently wrap JSON in a markdown code fence; strip it before
/// the strict parse.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Merge estimates onto candidates by normalized title.
///
/// Candidates the reply omits keep their pre-enrichment values. Identity
/// fields (title, authors, journal, year) and `url` are never overwritten:
/// `url` presence marks provider-sourced records and enrichment must not
/// forge it.
pub fn merge_estimates(
    mut candidates: Vec<EvidenceCandidate>,
    estimates: &[PaperEstimate],
) -> Vec<EvidenceCandidate> {
    for candidate in candidates.iter_mut() {
        let key = normalize_title(&candidate.title);
        let Some(est) = estimates.iter().find(|e| normalize_title(&e.title) == key) else {
            continue;
        };

        if let Some(n) = est.sample_size {
            candidate.sample_size = n;
        }
        if let Some(ref s) = est.effect_size {
            if !s.trim().is_empty() {
                candidate.effect_size = s.clone();
            }
        }
        if let Some(ref s) = est.dosage {
            if !s.trim().is_empty() {
                candidate.dosage = s.clone();
            }
        }
        if let Some(ref s) = est.duration {
            if !s.trim().is_empty() {
                candidate.duration = s.clone();
            }
        }
        if let Some(ref g) = est.evidence_grade {
            candidate.evidence_grade = EvidenceGrade::from_free_text(g);
        }
        if let Some(ref s) = est.summary {
            if !s.trim().is_empty() {
                candidate.summary = s.clone();
            }
        }
        if est.details.is_some() {
            candidate.details = est.details.clone();
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_candidate(title: &str) -> EvidenceCandidate {
        let mut c = EvidenceCandidate::bare(title);
        c.url = Some("https://pubmed.ncbi.nlm.nih.gov/1/".to_string());
        c
    }

    #[test]
    fn test_parse_reply_accepts_single_shape() {
        let content = r#"{"papers": [{"title": "A Study", "sampleSize": 120, "evidenceGrade": "High"}]}"#;
        let estimates = parse_reply(content).unwrap();
        assert_eq!(estimates.len(), 1);
        assert_eq!(estimates[0].sample_size, Some(120));
    }

    #[test]
    fn test_parse_reply_rejects_bare_array() {
        assert!(parse_reply(r#"[{"title": "A Study"}]"#).is_err());
    }

    #[test]
    fn test_parse_reply_rejects_other_keys() {
        assert!(parse_reply(r#"{"analyses": [{"title": "A Study"}]}"#).is_err());
        assert!(parse_reply(r#"{"results": []}"#).is_err());
        assert!(parse_reply("not json at all").is_err());
    }

    #[test]
    fn test_parse_reply_strips_code_fence() {
        let content = "```json\n{\"papers\": [{\"title\": \"T\"}]}\n```";
        assert_eq!(parse_reply(content).unwrap().len(), 1);
    }

    #[test]
    fn test_merge_by_title_case_insensitive() {
        let candidates = vec![provider_candidate("A Study of Magnesium")];
        let estimates = parse_reply(
            r#"{"papers": [{"title": "a study of  magnesium", "sampleSize": 80,
                "effectSize": "d = 0.4", "dosage": "500 mg/day",
                "duration": "8 weeks", "evidenceGrade": "moderately high",
                "summary": "New summary.", "details": "Double-blind RCT."}]}"#,
        )
        .unwrap();

        let merged = merge_estimates(candidates, &estimates);
        let c = &merged[0];
        assert_eq!(c.sample_size, 80);
        assert_eq!(c.effect_size, "d = 0.4");
        assert_eq!(c.dosage, "500 mg/day");
        assert_eq!(c.evidence_grade, EvidenceGrade::High);
        assert_eq!(c.summary, "New summary.");
        assert_eq!(c.details.as_deref(), Some("Double-blind RCT."));
    }

    #[test]
    fn test_merge_never_adds_url() {
        let candidates = vec![EvidenceCandidate::bare("No Url Study")];
        let estimates =
            parse_reply(r#"{"papers": [{"title": "No Url Study", "sampleSize": 50}]}"#).unwrap();
        let merged = merge_estimates(candidates, &estimates);
        assert!(merged[0].url.is_none());
    }

    #[test]
    fn test_merge_preserves_provider_url() {
        let candidates = vec![provider_candidate("Kept")];
        let estimates = parse_reply(r#"{"papers": [{"title": "Kept"}]}"#).unwrap();
        let merged = merge_estimates(candidates, &estimates);
        assert_eq!(merged[0].url.as_deref(), Some("https://pubmed.ncbi.nlm.nih.gov/1/"));
    }

    #[test]
    fn test_omitted_candidate_unchanged() {
        let candidates = vec![provider_candidate("Mentioned"), provider_candidate("Omitted")];
        let before = candidates[1].clone();
        let estimates =
            parse_reply(r#"{"papers": [{"title": "Mentioned", "sampleSize": 10}]}"#).unwrap();
        let merged = merge_estimates(candidates, &estimates);
        assert_eq!(merged[0].sample_size, 10);
        assert_eq!(merged[1], before);
    }

    #[test]
    fn test_grade_normalization_in_merge() {
        let candidates = vec![
            provider_candidate("H"),
            provider_candidate("L"),
            provider_candidate("M"),
        ];
        let estimates = parse_reply(
            r#"{"papers": [
                {"title": "H", "evidenceGrade": "moderately high"},
                {"title": "L", "evidenceGrade": "rather LOW"},
                {"title": "M", "evidenceGrade": "decent"}
            ]}"#,
        )
        .unwrap();
        let merged = merge_estimates(candidates, &estimates);
        assert_eq!(merged[0].evidence_grade, EvidenceGrade::High);
        assert_eq!(merged[1].evidence_grade, EvidenceGrade::Low);
        assert_eq!(merged[2].evidence_grade, EvidenceGrade::Moderate);
    }
}
