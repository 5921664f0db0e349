use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};
use tracing::info;

use insight_utils::InsightError;

use super::store_error;
use crate::export::ReportExporter;
use crate::middleware::ApiResult;
use crate::uploads::remove_upload;
use crate::AppState;

/// GET /api/v1/history
pub async fn list_history(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let history = state.store.list_history().await.map_err(store_error)?;
    Ok(Json(json!({ "success": true, "history": history })))
}

/// GET /api/v1/history/stats
pub async fn history_stats(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let stats = state.store.stats().await.map_err(store_error)?;
    Ok(Json(json!({ "success": true, "stats": stats })))
}

/// GET /api/v1/history/:id
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let analysis = state
        .store
        .find_analysis(id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| InsightError::not_found(format!("analysis {}", id)))?;

    Ok(Json(json!({ "success": true, "analysis": analysis })))
}

/// DELETE /api/v1/history/:id
pub async fn delete_analysis(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let analysis = state
        .store
        .find_analysis(id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| InsightError::not_found(format!("analysis {}", id)))?;

    if !state.store.delete_analysis(id).await.map_err(store_error)? {
        return Err(InsightError::not_found(format!("analysis {}", id)).into());
    }
    remove_upload(std::path::Path::new(&analysis.file_path)).await;

    info!(analysis_id = id, "Analysis deleted");
    Ok(Json(json!({ "success": true, "message": "Analysis deleted" })))
}

/// GET /api/v1/history/:id/export
pub async fn export_analysis(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let analysis = state
        .store
        .find_analysis(id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| InsightError::not_found(format!("analysis {}", id)))?;

    let html = state.exporter.render(&analysis, chrono::Utc::now())?;
    let disposition = format!("attachment; filename=\"{}\"", ReportExporter::file_name(id));

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        html,
    ))
}
