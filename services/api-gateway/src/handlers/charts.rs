use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};

use insight_models::{ChartKind, Table};
use insight_utils::InsightError;

use crate::middleware::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest {
    pub data: Table,
    pub chart_type: String,
    #[serde(default)]
    pub columns: Option<Vec<String>>,
}

/// POST /api/v1/charts
///
/// Renders one chart for caller-supplied rows.
pub async fn render_chart(
    State(state): State<AppState>,
    Json(request): Json<ChartRequest>,
) -> ApiResult<Json<Value>> {
    let kind = ChartKind::parse(&request.chart_type).ok_or_else(|| {
        InsightError::validation(
            "chartType",
            format!("Unknown chart type '{}'", request.chart_type),
        )
    })?;
    if request.data.is_empty() {
        return Err(InsightError::validation("data", "No rows to chart").into());
    }

    let columns = request.columns.unwrap_or_default();
    let chart = state
        .renderer
        .render(&request.data, kind, &columns)
        .ok_or_else(|| {
            InsightError::validation("columns", "The selected columns cannot be drawn as this chart")
        })?;

    Ok(Json(json!({ "success": true, "chart": chart })))
}
