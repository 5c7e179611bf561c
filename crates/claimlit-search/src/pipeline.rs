//! Aggregation pipeline: fan out to providers, merge, dedupe, truncate,
//! enrich.
//!
//! Failure semantics: a provider that errors or times out contributes an
//! empty list; an enrichment failure returns the pre-enrichment list.
//! The only errors surfaced to the caller are an empty claim and a
//! zero-provider configuration.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{info, instrument, warn};

use claimlit_common::EvidenceCandidate;

use crate::dedup::dedupe_by_title;
use crate::error::SearchError;
use crate::query::build_query;
use crate::sources::LiteratureProvider;

/// Optional enrichment step that backfills quantitative fields on
/// candidates. Implemented by the LLM layer; mocked in tests.
#[async_trait]
pub trait EvidenceEnricher: Send + Sync {
    async fn enrich(
        &self,
        candidates: Vec<EvidenceCandidate>,
    ) -> anyhow::Result<Vec<EvidenceCandidate>>;
}

/// Timeouts and limits for one aggregator instance.
///
/// A hung backend must not stall the whole response: each provider call
/// and the enrichment call get independent timeouts, and the pipeline
/// proceeds with whatever settled in time.
#[derive(Debug, Clone)]
pub struct AggregatorOptions {
    pub provider_timeout: Duration,
    pub enrich_timeout: Duration,
    pub default_limit: usize,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(10),
            enrich_timeout: Duration::from_secs(30),
            default_limit: 5,
        }
    }
}

pub struct LiteratureAggregator {
    providers: Vec<Arc<dyn LiteratureProvider>>,
    enricher: Option<Arc<dyn EvidenceEnricher>>,
    opts: AggregatorOptions,
}

impl LiteratureAggregator {
    /// Providers are passed explicitly; their order fixes the tie-break
    /// order of deduplication.
    pub fn new(
        providers: Vec<Arc<dyn LiteratureProvider>>,
        enricher: Option<Arc<dyn EvidenceEnricher>>,
        opts: AggregatorOptions,
    ) -> Result<Self, SearchError> {
        if providers.is_empty() {
            return Err(SearchError::NoProviders);
        }
        Ok(Self {
            providers,
            enricher,
            opts,
        })
    }

    pub fn default_limit(&self) -> usize {
        self.opts.default_limit
    }

    /// Run the full pipeline for one claim.
    #[instrument(skip(self))]
    pub async fn search_literature(
        &self,
        claim: &str,
        limit: usize,
    ) -> Result<Vec<EvidenceCandidate>, SearchError> {
        if claim.trim().is_empty() {
            return Err(SearchError::EmptyClaim);
        }

        let query = build_query(claim);
        if query.is_empty() {
            info!("Claim reduced to an empty query; returning no candidates");
            return Ok(vec![]);
        }

        // Fan out concurrently; each provider gets its own timeout so one
        // slow backend cannot block the others.
        let calls = self.providers.iter().map(|provider| {
            let provider = Arc::clone(provider);
            let query = query.clone();
            let timeout = self.opts.provider_timeout;
            async move {
                match tokio::time::timeout(timeout, provider.search(&query, limit)).await {
                    Ok(Ok(candidates)) => {
                        info!(provider = provider.name(), n = candidates.len(), "Provider results");
                        candidates
                    }
                    Ok(Err(e)) => {
                        warn!(provider = provider.name(), error = %e, "Provider search failed");
                        vec![]
                    }
                    Err(_) => {
                        warn!(provider = provider.name(), "Provider search timed out");
                        vec![]
                    }
                }
            }
        });

        let merged: Vec<EvidenceCandidate> =
            join_all(calls).await.into_iter().flatten().collect();

        let mut results = dedupe_by_title(merged);
        results.truncate(limit);

        if results.is_empty() {
            return Ok(results);
        }

        // Enrichment failure never fails the search.
        if let Some(ref enricher) = self.enricher {
            let pre = results.clone();
            match tokio::time::timeout(self.opts.enrich_timeout, enricher.enrich(results)).await {
                Ok(Ok(enriched)) => return Ok(enriched),
                Ok(Err(e)) => {
                    warn!(error = %e, "Enrichment failed; returning un-enriched candidates");
                }
                Err(_) => {
                    warn!("Enrichment timed out; returning un-enriched candidates");
                }
            }
            return Ok(pre);
        }

        Ok(results)
    }
}
