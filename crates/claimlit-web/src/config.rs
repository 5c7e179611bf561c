//! Environment configuration.
//!
//! Key presence toggles behavior: provider keys only raise rate limits,
//! but the LLM key's absence disables enrichment entirely. All reads
//! happen here, once, at startup.

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Semantic Scholar authentication — optional.
    pub semantic_scholar_api_key: Option<String>,
    /// NCBI E-utilities authentication — optional.
    pub pubmed_api_key: Option<String>,
    /// LLM authentication — optional; absence disables enrichment.
    pub openai_api_key: Option<String>,
    /// Alternate OpenAI-compatible endpoint (Ollama, vLLM, …).
    pub openai_base_url: Option<String>,
    pub openai_model: Option<String>,
    /// Listen address, defaults to 127.0.0.1:3001.
    pub addr: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            semantic_scholar_api_key: var("SEMANTIC_SCHOLAR_API_KEY"),
            pubmed_api_key: var("PUBMED_API_KEY"),
            openai_api_key: var("OPENAI_API_KEY"),
            openai_base_url: var("OPENAI_BASE_URL"),
            openai_model: var("OPENAI_MODEL"),
            addr: var("CLAIMLIT_ADDR"),
        }
    }

    pub fn addr(&self) -> &str {
        self.addr.as_deref().unwrap_or("127.0.0.1:3001")
    }
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
