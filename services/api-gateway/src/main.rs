use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method},
    routing::get,
    serve, Router,
};
use insight_database::{initialize_database, HistoryStore, MemoryHistoryStore, PgHistoryStore};
use insight_utils::report::ContentExtractor;
use insight_utils::{init_logging, AppConfig, StorageBackend};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

mod charts;
mod export;
mod handlers;
mod llm;
mod metrics;
mod middleware;
mod routes;
mod uploads;

use charts::ChartRenderer;
use export::ReportExporter;
use handlers::health_check;
use llm::{AnalysisService, GeminiClient, LlmClient};
use metrics::Metrics;
use middleware::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        AppConfig::default()
    });

    init_logging(&config.logging)?;
    info!("Starting Insight API Gateway");

    let store = build_store(&config).await?;
    let state = build_state(config, store)?;
    let addr: SocketAddr = format!("{}:{}", state.config.server.host, state.config.server.port)
        .parse()
        .context("Invalid server host or port")?;

    let app = create_app(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("API Gateway listening on {}", addr);

    serve(listener, app).await?;

    Ok(())
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HistoryStore>,
    pub analysis: Arc<AnalysisService>,
    pub renderer: Arc<ChartRenderer>,
    pub exporter: Arc<ReportExporter>,
    pub extractor: Arc<ContentExtractor>,
    pub metrics: Metrics,
    pub config: Arc<AppConfig>,
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn HistoryStore>> {
    match config.database.backend {
        StorageBackend::Memory => {
            warn!("Using the in-memory history store; analyses are lost on restart");
            Ok(Arc::new(MemoryHistoryStore::new()))
        }
        StorageBackend::Postgres => {
            let db_config = insight_database::DatabaseConfig {
                postgres_url: config.database.postgres_url.clone(),
                max_connections: config.database.max_connections,
                connection_timeout: Duration::from_secs(config.database.connection_timeout_seconds),
                run_migrations: config.database.run_migrations,
            };
            let pool = initialize_database(&db_config).await?;
            info!("Database connection established");
            Ok(Arc::new(PgHistoryStore::new(pool)))
        }
    }
}

fn build_state(config: AppConfig, store: Arc<dyn HistoryStore>) -> Result<AppState> {
    let metrics = Metrics::new(&config.monitoring.prometheus_namespace)
        .context("Failed to register metrics")?;

    let client = GeminiClient::from_config(&config.llm)?.map(|c| Arc::new(c) as Arc<dyn LlmClient>);
    let analysis = AnalysisService::new(
        client,
        config.llm.max_text_chars,
        metrics.llm_fallbacks.clone(),
    );

    Ok(AppState {
        store,
        analysis: Arc::new(analysis),
        renderer: Arc::new(ChartRenderer::new(config.charts.clone())),
        exporter: Arc::new(ReportExporter::new()?),
        extractor: Arc::new(ContentExtractor::new(config.heuristics.clone())),
        metrics,
        config: Arc::new(config),
    })
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let origin = if allowed.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(allowed)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

fn create_app(state: AppState) -> Router {
    let server = &state.config.server;
    // Leave room for multipart framing so oversized files reach the upload check
    let body_limit = server
        .max_request_size
        .max(state.config.upload.max_file_size + 1024 * 1024);

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .nest("/api/v1", routes::create_api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_layer(&server.cors_origins))
                .layer(TimeoutLayer::new(Duration::from_secs(server.timeout_seconds)))
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(axum::middleware::from_fn(error_handling_middleware)),
        )
        .with_state(state)
}

async fn metrics_handler(State(state): State<AppState>) -> String {
    if !state.config.monitoring.metrics_enabled {
        return String::new();
    }
    state.metrics.encode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const BOUNDARY: &str = "insight-test-boundary";

    fn test_app() -> (Router, AppState) {
        let mut config = AppConfig::default();
        config.database.backend = StorageBackend::Memory;
        config.llm.api_key = None;
        config.upload.dir = std::env::temp_dir()
            .join(format!("insight-gateway-{}", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .to_string();

        let state = build_state(config, Arc::new(MemoryHistoryStore::new())).unwrap();
        (create_app(state.clone()), state)
    }

    fn multipart(field: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n",
            b = BOUNDARY
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/uploads")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_sets_request_id() {
        let (app, _) = test_app();
        let response = app.oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(body_json(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let (app, _) = test_app();
        let request = Request::builder()
            .uri("/health")
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc-123");
    }

    #[tokio::test]
    async fn test_detailed_health_reports_store() {
        let (app, _) = test_app();
        let response = app.oneshot(get("/api/v1/health/detailed")).await.unwrap();
        let body = body_json(response).await;

        assert_eq!(body["status"], "healthy");
        assert_eq!(body["checks"]["store"]["backend"], "memory");
        assert_eq!(body["checks"]["llm"]["status"], "degraded");
    }

    #[tokio::test]
    async fn test_unsupported_upload_is_rejected() {
        let (app, _) = test_app();
        let response = app
            .oneshot(multipart("reportFile", "notes.txt", "text/plain", b"hello"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body_json(response).await["code"], "UNSUPPORTED_FORMAT");
    }

    #[tokio::test]
    async fn test_upload_without_file_is_rejected() {
        let (app, _) = test_app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/uploads")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(format!("--{}--\r\n", BOUNDARY)))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unreadable_pdf_is_analyzed_from_placeholder_data() {
        let (app, state) = test_app();
        let response = app
            .clone()
            .oneshot(multipart("reportFile", "broken.pdf", "application/pdf", b"%PDF-1.4 truncated"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["type"], "data");
        assert!(!body["charts"].as_array().unwrap().is_empty());
        let id = body["analysisId"].as_i64().unwrap();

        let response = app.clone().oneshot(get(&format!("/api/v1/history/{}", id))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let stored = body_json(response).await;
        assert_eq!(stored["analysis"]["fileName"], "broken.pdf");
        let stored_path = std::path::PathBuf::from(stored["analysis"]["filePath"].as_str().unwrap());
        assert!(stored_path.exists());

        let response = app.clone().oneshot(get("/api/v1/history")).await.unwrap();
        assert_eq!(body_json(response).await["history"].as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(get(&format!("/api/v1/history/{}/export", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert_eq!(disposition, format!("attachment; filename=\"report-{}.html\"", id));

        let response = app.clone().oneshot(get("/metrics")).await.unwrap();
        let text = String::from_utf8(to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()).unwrap();
        assert!(text.contains("insight_uploads_total{kind=\"data\"} 1"));
        assert!(text.contains("insight_llm_fallbacks_total"));

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/history/{}", id))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        assert!(!stored_path.exists());

        let response = app.oneshot(get(&format!("/api/v1/history/{}", id))).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        tokio::fs::remove_dir_all(&state.config.upload.dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_extraction_leaves_no_stored_file() {
        let (app, state) = test_app();
        let response = app
            .oneshot(multipart(
                "reportFile",
                "broken.xlsx",
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                b"not a workbook",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["code"], "EXTRACTION_FAILURE");

        let mut entries = tokio::fs::read_dir(&state.config.upload.dir).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());

        tokio::fs::remove_dir_all(&state.config.upload.dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_history_is_not_found() {
        let (app, _) = test_app();
        let response = app.clone().oneshot(get("/api/v1/history/999")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");

        let request = Request::builder()
            .method("DELETE")
            .uri("/api/v1/history/999")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_history_stats_start_empty() {
        let (app, _) = test_app();
        let response = app.oneshot(get("/api/v1/history/stats")).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["stats"]["totalAnalyses"], 0);
        assert_eq!(body["stats"]["totalCharts"], 0);
    }

    #[tokio::test]
    async fn test_chat_without_model_is_bad_gateway() {
        let (app, _) = test_app();
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/chat",
                json!({ "message": "What is the trend?", "data": [] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["code"], "EXTERNAL_SERVICE_ERROR");
    }

    #[tokio::test]
    async fn test_chat_validation() {
        let (app, _) = test_app();
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/v1/chat", json!({ "message": "" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/chat",
                json!({ "message": "Hi", "analysisId": 42 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chat_history_for_unknown_analysis_is_empty() {
        let (app, _) = test_app();
        let response = app.oneshot(get("/api/v1/chat/history/5")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["history"], json!([]));
    }

    #[tokio::test]
    async fn test_chart_endpoint() {
        let (app, _) = test_app();
        let data = json!([
            { "Region": "North", "Sales": 120 },
            { "Region": "South", "Sales": 80 },
            { "Region": "East", "Sales": 95 }
        ]);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/v1/charts",
                json!({ "data": data, "chartType": "pie", "columns": ["Region", "Sales"] }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["chart"]["type"], "pie");
        assert!(body["chart"]["image"]
            .as_str()
            .unwrap()
            .starts_with("data:image/svg+xml;base64,"));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/charts",
                json!({ "data": data, "chartType": "scatter" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["details"]["field"], "chartType");
    }
}
