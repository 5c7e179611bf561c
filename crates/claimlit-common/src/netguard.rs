use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

use crate::error::ClaimlitError;

/// An allowlist-capped HTTP client that only permits requests to the
/// scholarly and LLM hosts the service is configured to talk to.
#[derive(Debug, Clone)]
pub struct GuardedClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl GuardedClient {
    /// Creates a client with the default claimlit allowlist.
    pub fn new() -> Result<Self, ClaimlitError> {
        let mut allowlist = HashSet::new();
        let domains = vec![
            "api.semanticscholar.org",  // Semantic Scholar graph search
            "eutils.ncbi.nlm.nih.gov",  // PubMed E-utilities
            "pubmed.ncbi.nlm.nih.gov",  // PubMed canonical article links
            "api.openai.com",           // OpenAI completions
            "localhost",                // local OpenAI-compatible servers
            "127.0.0.1",
        ];

        for d in domains {
            allowlist.insert(d.to_string());
        }

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .user_agent("claimlit/0.1 (research)")
            .build()
            .map_err(|e| ClaimlitError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Appends the host of a full URL to the allowlist. Unparseable or
    /// host-less URLs are ignored.
    pub fn allow_url(&mut self, url: &str) {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                self.allowlist.insert(host.to_string());
            }
        }
    }

    /// Validates if a URL is permitted under the current allowlist.
    pub fn is_allowed(&self, url: &str) -> bool {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                for allowed in &self.allowlist {
                    if host == allowed || host.ends_with(&format!(".{}", allowed)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, ClaimlitError> {
        if !self.is_allowed(url) {
            return Err(ClaimlitError::Security(format!(
                "Domain not in allowlist for URL {}",
                url
            )));
        }
        Ok(self.client.get(url))
    }

    pub fn post(&self, url: &str) -> Result<reqwest::RequestBuilder, ClaimlitError> {
        if !self.is_allowed(url) {
            return Err(ClaimlitError::Security(format!(
                "Domain not in allowlist for URL {}",
                url
            )));
        }
        Ok(self.client.post(url))
    }
}
