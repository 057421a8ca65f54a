use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Everything the analysis pipeline can fail with. Only the validation case
/// is the client's fault; the rest collapse to a 500 whose body carries the
/// message and nothing else, since the client's recovery is the same either
/// way: retry.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("Missing description or image_id")]
    Validation,
    #[error("failed to fetch image {id}: {reason}")]
    ImageFetch { id: String, reason: String },
    #[error("model invocation failed: {0}")]
    ModelInvocation(String),
    #[error("{0}")]
    Extraction(String),
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        let status = match self {
            AnalyzeError::Validation => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
