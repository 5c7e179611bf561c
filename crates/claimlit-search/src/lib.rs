//! claimlit-search — literature aggregation pipeline.
//!
//! Flow for one request:
//!   1. Build a compact boolean query from the free-text claim
//!   2. Fan out concurrently to every configured provider
//!   3. Merge, dedupe by normalized title, truncate
//!   4. Optionally enrich via the configured LLM enricher
//!
//! Stateless: every call re-queries the providers.

pub mod dedup;
pub mod error;
pub mod pipeline;
pub mod query;
pub mod sources;

pub use error::SearchError;
pub use pipeline::{AggregatorOptions, EvidenceEnricher, LiteratureAggregator};
