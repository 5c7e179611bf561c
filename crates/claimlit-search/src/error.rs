use thiserror::Error;

/// Errors the aggregation pipeline can surface to its caller.
///
/// Provider and enrichment failures are absorbed inside the pipeline and
/// never appear here.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No claim provided")]
    EmptyClaim,

    #[error("No literature providers configured")]
    NoProviders,
}
