//! claimlit-llm — LLM backends and the evidence-enrichment step.

pub mod backend;
pub mod enrich;

pub use backend::{LlmBackend, LlmError, LlmRequest, LlmResponse, Message};
pub use enrich::LlmEnricher;
