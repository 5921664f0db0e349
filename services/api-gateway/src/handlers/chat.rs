use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use validator::Validate;

use insight_utils::{validate_model, InsightError};

use super::store_error;
use crate::middleware::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 4000))]
    pub message: String,
    #[serde(default)]
    pub data: Value,
    pub analysis_id: Option<i64>,
}

/// POST /api/v1/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Json<Value>> {
    validate_model(&request)?;
    if request.message.trim().is_empty() {
        return Err(InsightError::validation("message", "Message must not be blank").into());
    }

    if let Some(analysis_id) = request.analysis_id {
        if state
            .store
            .find_analysis(analysis_id)
            .await
            .map_err(store_error)?
            .is_none()
        {
            return Err(InsightError::not_found(format!("analysis {}", analysis_id)).into());
        }
    }

    let response = state.analysis.chat(&request.message, &request.data).await?;

    if let Some(analysis_id) = request.analysis_id {
        state
            .store
            .save_chat_message(analysis_id, &request.message, &response)
            .await
            .map_err(store_error)?;
        info!(analysis_id, "Chat message saved");
    }

    Ok(Json(json!({ "success": true, "response": response })))
}

/// GET /api/v1/chat/history/:analysis_id
pub async fn chat_history(
    State(state): State<AppState>,
    Path(analysis_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let history = state
        .store
        .chat_history(analysis_id)
        .await
        .map_err(store_error)?;
    Ok(Json(json!({ "success": true, "history": history })))
}
