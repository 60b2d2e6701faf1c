use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    if !state.provider.health_check().await {
        return Err(ApiError::ServiceUnavailable(format!(
            "{} provider is not reachable",
            state.provider.name()
        )));
    }

    Ok(Json(json!({
        "status": "ok",
        "provider": state.provider.name(),
        "dimensions": state.provider.dimensions(),
    })))
}
