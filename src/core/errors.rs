use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

use crate::rag::PipelineError;

pub const QUERY_REQUIRED: &str = "Query is required";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn query_required() -> Self {
        ApiError::BadRequest(QUERY_REQUIRED.to_string())
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::EmptyQuery => ApiError::query_required(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ProviderError;
    use crate::rag::SearchError;

    #[test]
    fn empty_query_maps_to_bad_request() {
        let err: ApiError = PipelineError::EmptyQuery.into();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == QUERY_REQUIRED));
    }

    #[test]
    fn stage_failures_keep_the_underlying_message() {
        let err: ApiError =
            PipelineError::Search(SearchError::Unavailable("index unavailable".into())).into();
        assert!(matches!(err, ApiError::Internal(ref m) if m == "index unavailable"));

        let err: ApiError =
            PipelineError::Generation(ProviderError::Request("connection reset".into())).into();
        assert!(matches!(err, ApiError::Internal(ref m) if m == "connection reset"));
    }

    #[test]
    fn query_required_is_a_bad_request_response() {
        let response = ApiError::query_required().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
