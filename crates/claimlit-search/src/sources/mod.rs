//! Literature provider clients.

pub mod pubmed;
pub mod semanticscholar;

use async_trait::async_trait;
use claimlit_common::EvidenceCandidate;

/// Common interface for all literature search backends.
#[async_trait]
pub trait LiteratureProvider: Send + Sync {
    /// Search for papers matching a query, returns candidate list.
    ///
    /// Implementations return `Err` on transport or parse failure; the
    /// aggregator absorbs those into an empty contribution.
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<EvidenceCandidate>>;

    /// Short backend name for logging.
    fn name(&self) -> &'static str;
}

/// Shared author-formatting rule: one author keeps the full name, several
/// collapse to `"{first author} et al."`.
pub fn format_authors(names: &[String]) -> String {
    match names {
        [] => "Unknown authors".to_string(),
        [only] => only.clone(),
        [first, ..] => format!("{} et al.", first),
    }
}
