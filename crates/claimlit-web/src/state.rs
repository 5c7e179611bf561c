//! Shared application state for the web server.

use std::sync::Arc;

use claimlit_llm::backend::{LlmBackend, OpenAiBackend, OpenAiCompatibleBackend};
use claimlit_llm::LlmEnricher;
use claimlit_search::sources::pubmed::PubMedClient;
use claimlit_search::sources::semanticscholar::SemanticScholarClient;
use claimlit_search::sources::LiteratureProvider;
use claimlit_search::{AggregatorOptions, EvidenceEnricher, LiteratureAggregator};
use tracing::info;

use crate::config::Config;

/// Shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<LiteratureAggregator>,
}

impl AppState {
    pub fn new(aggregator: LiteratureAggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
        }
    }

    /// Assemble providers and the optional enricher from configuration.
    ///
    /// Semantic Scholar is first in the provider list so it wins dedupe
    /// ties, matching the configured provider order contract.
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let providers: Vec<Arc<dyn LiteratureProvider>> = vec![
            Arc::new(SemanticScholarClient::new(cfg.semantic_scholar_api_key.clone())),
            Arc::new(PubMedClient::new(cfg.pubmed_api_key.clone())),
        ];

        let enricher: Option<Arc<dyn EvidenceEnricher>> = match build_backend(cfg) {
            Some(backend) => {
                info!(model = backend.model_id(), "Evidence enrichment enabled");
                Some(Arc::new(LlmEnricher::new(backend)))
            }
            None => {
                info!("No LLM configured; evidence enrichment disabled");
                None
            }
        };

        let aggregator =
            LiteratureAggregator::new(providers, enricher, AggregatorOptions::default())?;
        Ok(Self::new(aggregator))
    }
}

fn build_backend(cfg: &Config) -> Option<Arc<dyn LlmBackend>> {
    let model = cfg.openai_model.as_deref().unwrap_or("gpt-4o-mini");
    if let Some(ref base_url) = cfg.openai_base_url {
        return Some(Arc::new(OpenAiCompatibleBackend::new(
            base_url.clone(),
            model,
            cfg.openai_api_key.clone(),
        )));
    }
    cfg.openai_api_key
        .as_ref()
        .map(|key| Arc::new(OpenAiBackend::new(key.clone(), model)) as Arc<dyn LlmBackend>)
}

pub type SharedState = Arc<AppState>;
