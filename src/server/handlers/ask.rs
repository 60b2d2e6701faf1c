use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub query: Option<String>,
}

/// `POST /ask`. Any body that does not carry a non-blank string `query`
/// is answered with 400 before the pipeline runs.
pub async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let query = match payload {
        Ok(Json(AskRequest { query: Some(query) })) if !query.trim().is_empty() => query,
        Ok(_) => return Err(ApiError::query_required()),
        Err(rejection) => {
            tracing::debug!("Rejected /ask body: {}", rejection);
            return Err(ApiError::query_required());
        }
    };

    let answer = state.pipeline.answer(&query).await?;
    Ok(Json(json!({ "answer": answer.into_text() })))
}
