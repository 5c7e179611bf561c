//! HTTP error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use claimlit_search::SearchError;

/// Error shape returned to API clients: `{message}` for input errors,
/// `{message, error}` for internal failures.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub error: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            error: None,
        }
    }

    pub fn internal(message: impl Into<String>, error: impl ToString) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            error: Some(error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({ "message": self.message });
        if let Some(err) = self.error {
            body["error"] = serde_json::Value::String(err);
        }
        (self.status, Json(body)).into_response()
    }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::EmptyClaim => ApiError::bad_request("No claim provided"),
            SearchError::NoProviders => {
                ApiError::internal("Literature search failed", "no providers configured")
            }
        }
    }
}
