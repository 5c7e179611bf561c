//! claimlit-web — HTTP surface for the literature-aggregation pipeline.
//!   POST /api/literature/search — claim in, evidence candidates out
//!   GET  /health                — liveness

pub mod config;
pub mod error;
pub mod fallback;
pub mod handlers;
pub mod router;
pub mod state;
