//! HTTP contract tests against an in-process router with mock providers.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use claimlit_common::EvidenceCandidate;
use claimlit_search::sources::LiteratureProvider;
use claimlit_search::{AggregatorOptions, LiteratureAggregator};
use claimlit_web::router::build_router;
use claimlit_web::state::AppState;

struct FixedProvider;

#[async_trait]
impl LiteratureProvider for FixedProvider {
    async fn search(&self, _query: &str, _limit: usize) -> anyhow::Result<Vec<EvidenceCandidate>> {
        let mut c = EvidenceCandidate::bare("Magnesium and sleep: a randomized trial");
        c.url = Some("https://pubmed.ncbi.nlm.nih.gov/12345/".to_string());
        Ok(vec![c])
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

fn test_router() -> axum::Router {
    let aggregator = LiteratureAggregator::new(
        vec![Arc::new(FixedProvider)],
        None,
        AggregatorOptions::default(),
    )
    .unwrap();
    build_router(AppState::new(aggregator))
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/literature/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let resp = test_router()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_search_returns_provider_candidates() {
    let resp = test_router()
        .oneshot(post_json(r#"{"claim": "magnesium supplement improves sleep quality"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["title"], "Magnesium and sleep: a randomized trial");
    // Wire format is camelCase
    assert!(arr[0].get("sampleSize").is_some());
    assert!(arr[0].get("url").is_some());
}

struct ManyProvider;

#[async_trait]
impl LiteratureProvider for ManyProvider {
    async fn search(&self, _query: &str, limit: usize) -> anyhow::Result<Vec<EvidenceCandidate>> {
        Ok((0..limit + 5)
            .map(|i| EvidenceCandidate::bare(format!("Study number {}", i)))
            .collect())
    }

    fn name(&self) -> &'static str {
        "many"
    }
}

#[tokio::test]
async fn test_result_count_ignores_client_limit_field() {
    let aggregator = LiteratureAggregator::new(
        vec![Arc::new(ManyProvider)],
        None,
        AggregatorOptions::default(),
    )
    .unwrap();
    let router = build_router(AppState::new(aggregator));

    // "limit" is not part of the request contract; an unknown field is
    // ignored and the aggregator default applies.
    let resp = router
        .oneshot(post_json(
            r#"{"claim": "magnesium supplement improves sleep quality", "limit": 1}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_missing_claim_is_400() {
    let resp = test_router().oneshot(post_json("{}")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_json(resp).await;
    assert_eq!(json["message"], "No claim provided");
}

#[tokio::test]
async fn test_empty_claim_is_400() {
    let resp = test_router()
        .oneshot(post_json(r#"{"claim": "   "}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_test_mode_short_circuits() {
    let resp = test_router()
        .oneshot(post_json(r#"{"testMode": true}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    let arr = json.as_array().unwrap();
    assert!(!arr.is_empty());
    // Fallback records are canned, not provider-sourced: no url
    assert!(arr.iter().all(|r| r.get("url").is_none()));
}
