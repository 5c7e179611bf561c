//! Literature search endpoint.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use claimlit_common::EvidenceCandidate;

use crate::error::ApiError;
use crate::fallback::static_evidence;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteratureSearchRequest {
    #[serde(default)]
    pub claim: Option<String>,
    /// Short-circuit to static fallback records, no network calls.
    #[serde(default)]
    pub test_mode: bool,
}

/// POST /api/literature/search
pub async fn literature_search(
    State(state): State<SharedState>,
    Json(req): Json<LiteratureSearchRequest>,
) -> Result<Json<Vec<EvidenceCandidate>>, ApiError> {
    if req.test_mode {
        info!("Test mode: returning static fallback evidence");
        return Ok(Json(static_evidence()));
    }

    let claim = match req.claim.as_deref().map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => return Err(ApiError::bad_request("No claim provided")),
    };

    let limit = state.aggregator.default_limit();
    let candidates = state.aggregator.search_literature(&claim, limit).await?;
    Ok(Json(candidates))
}
