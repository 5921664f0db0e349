use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "insight-api-gateway",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn detailed_health_check(State(state): State<AppState>) -> Json<Value> {
    let store_status = match state.store.health_check().await {
        Ok(_) => json!({"status": "healthy", "backend": state.store.backend_name(), "message": "Connected"}),
        Err(e) => json!({"status": "unhealthy", "backend": state.store.backend_name(), "message": e.to_string()}),
    };
    let llm_status = if state.analysis.is_configured() {
        json!({"status": "healthy", "message": "Configured"})
    } else {
        json!({"status": "degraded", "message": "Local fallback analysis only"})
    };

    let overall = if store_status["status"] == "healthy" {
        "healthy"
    } else {
        "degraded"
    };

    Json(json!({
        "status": overall,
        "service": "insight-api-gateway",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {
            "store": store_status,
            "llm": llm_status,
        }
    }))
}
