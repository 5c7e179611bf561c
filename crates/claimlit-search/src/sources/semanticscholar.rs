//! Semantic Scholar Academic Graph client.
//!
//! Endpoint: https://api.semanticscholar.org/graph/v1/paper/search
//!
//! An API key raises the rate limit; without one the client runs on the
//! public tier.

use async_trait::async_trait;
use claimlit_common::netguard::GuardedClient as Client;
use claimlit_common::{EvidenceCandidate, EvidenceGrade};
use tracing::{debug, instrument};

use super::{format_authors, LiteratureProvider};

const S2_SEARCH_URL: &str = "https://api.semanticscholar.org/graph/v1/paper/search";
const S2_FIELDS: &str = "title,abstract,authors,year,venue,url";

pub struct SemanticScholarClient {
    client: Client,
    api_key: Option<String>,
}

impl SemanticScholarClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new().expect("Semantic Scholar client build failed"),
            api_key,
        }
    }
}

#[async_trait]
impl LiteratureProvider for SemanticScholarClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> anyhow::Result<Vec<EvidenceCandidate>> {
        let mut req = self.client.get(S2_SEARCH_URL)?.query(&[
            ("query", query),
            ("limit", &limit.to_string()),
            ("fields", S2_FIELDS),
        ]);
        if let Some(key) = &self.api_key {
            req = req.header("x-api-key", key);
        }

        let resp: serde_json::Value = req.send().await?.json().await?;

        let papers = resp["data"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        debug!(count = papers.len(), "Semantic Scholar search returned results");

        Ok(papers.iter().filter_map(paper_to_candidate).collect())
    }

    fn name(&self) -> &'static str {
        "semanticscholar"
    }
}

/// Convert one Semantic Scholar paper object into a candidate.
/// Papers without a title are dropped (title is the dedupe identity).
fn paper_to_candidate(paper: &serde_json::Value) -> Option<EvidenceCandidate> {
    let title = paper["title"].as_str()?.trim().to_string();
    if title.is_empty() {
        return None;
    }

    let author_names: Vec<String> = paper["authors"]
        .as_array()
        .unwrap_or(&vec![])
        .iter()
        .filter_map(|a| a["name"].as_str().map(String::from))
        .collect();

    let mut candidate = EvidenceCandidate::bare(title);
    candidate.authors = format_authors(&author_names);
    candidate.journal = paper["venue"].as_str().unwrap_or("").to_string();
    candidate.year = paper["year"].as_i64().unwrap_or(0) as i32;
    candidate.evidence_grade = EvidenceGrade::Moderate;
    candidate.summary = paper["abstract"].as_str().unwrap_or("").to_string();
    candidate.url = paper["url"].as_str().map(String::from);
    Some(candidate)
}
