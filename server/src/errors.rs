use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jobsearch_core::SearchError;
use serde_json::json;
use tokio::task::JoinError;

/// Each variant renders as `{"error": "message"}` with its status code.
#[derive(Debug)]
pub enum ApiError {
    /// Index not built, or outdated (409).
    NotReady(String),
    /// Missing or wrong admin token (401).
    Unauthorized(String),
    /// Malformed request (400).
    BadRequest(String),
    /// Background work failed (500).
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotReady(m) => (StatusCode::CONFLICT, m),
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m),
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<JoinError> for ApiError {
    fn from(e: JoinError) -> Self { ApiError::Internal(format!("index task failed: {e}")) }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::NotReady { .. } => ApiError::NotReady(e.to_string()),
            SearchError::InvalidDocumentId(_) => ApiError::BadRequest(e.to_string()),
        }
    }
}
