use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers::*, AppState};

pub fn create_api_routes() -> Router<AppState> {
    Router::new()
        .route("/health/detailed", get(detailed_health_check))
        .route("/uploads", post(upload_report))
        .route("/history", get(list_history))
        .route("/history/stats", get(history_stats))
        .route("/history/:id", get(get_analysis).delete(delete_analysis))
        .route("/history/:id/export", get(export_analysis))
        .route("/chat", post(chat))
        .route("/chat/history/:analysis_id", get(chat_history))
        .route("/charts", post(render_chart))
}
