//! Report Upload Handler
//!
//! Accepts one office document, extracts it and runs either the text or the
//! data analysis pipeline before persisting the result.
//!
//! POST /api/v1/uploads

use std::path::Path;

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use insight_models::{AnalysisKind, ExtractedContent, NewAnalysis, Table, TextDocument};
use insight_utils::report::{ensure_not_empty, summarize, DocumentFormat, ExtractionError};
use insight_utils::{file_extension, validate_upload, InsightError};

use super::store_error;
use crate::middleware::ApiResult;
use crate::uploads::{remove_upload, save_upload};
use crate::AppState;

const FILE_FIELD: &str = "reportFile";

struct UploadedFile {
    file_name: String,
    media_type: Option<String>,
    bytes: Bytes,
}

/// The `reportFile` field, or the first field carrying a file name.
async fn read_upload(multipart: &mut Multipart) -> ApiResult<UploadedFile> {
    let mut first_file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| InsightError::validation(FILE_FIELD, format!("Failed to read upload: {}", e)))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let is_report_field = field.name() == Some(FILE_FIELD);
        let media_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| InsightError::validation(FILE_FIELD, format!("Failed to read upload: {}", e)))?;

        let upload = UploadedFile {
            file_name,
            media_type,
            bytes,
        };
        if is_report_field {
            return Ok(upload);
        }
        first_file.get_or_insert(upload);
    }

    first_file.ok_or_else(|| InsightError::validation(FILE_FIELD, "No file was uploaded").into())
}

pub async fn upload_report(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let upload = read_upload(&mut multipart).await?;
    validate_upload(
        &upload.file_name,
        upload.media_type.as_deref(),
        upload.bytes.len(),
        &state.config.upload,
    )?;

    let path = save_upload(&state.config.upload.dir, &upload.file_name, &upload.bytes).await?;
    info!(file = %upload.file_name, size = upload.bytes.len(), path = %path.display(), "Upload stored");

    let (analysis_id, new_analysis) = match analyze_upload(&state, &upload, &path).await {
        Ok(saved) => saved,
        Err(error) => {
            remove_upload(&path).await;
            return Err(error);
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "analysisId": analysis_id,
            "fileName": new_analysis.file_name,
            "type": new_analysis.kind,
            "analysis": new_analysis.analysis,
            "textAnalysis": new_analysis.text_analysis,
            "charts": new_analysis.charts,
        })),
    ))
}

/// Extract, analyze and persist a stored upload.
async fn analyze_upload(
    state: &AppState,
    upload: &UploadedFile,
    path: &Path,
) -> ApiResult<(i64, NewAnalysis)> {
    let extension = file_extension(&upload.file_name);
    let format = DocumentFormat::detect(extension.as_deref(), upload.media_type.as_deref())
        .map(|f| f.as_str())
        .unwrap_or("unknown");

    let extractor = state.extractor.clone();
    let bytes = upload.bytes.clone();
    let media_type = upload.media_type.clone();
    let extracted = tokio::task::spawn_blocking(move || {
        extractor.extract(&bytes, media_type.as_deref(), extension.as_deref())
    })
    .await
    .map_err(|e| InsightError::internal(format!("Extraction task failed: {}", e)))?;

    let content = match extracted.and_then(ensure_not_empty) {
        Ok(content) => content,
        Err(error) => {
            state.metrics.extraction_failures.with_label_values(&[format]).inc();
            warn!(file = %upload.file_name, format, %error, "Extraction failed");
            return Err(match error {
                ExtractionError::EmptyResult => InsightError::empty_result(&upload.file_name),
                other => other.into(),
            }
            .into());
        }
    };

    let file_path = path.to_string_lossy().to_string();
    let file_size = upload.bytes.len() as i64;
    let new_analysis = match content {
        ExtractedContent::Text(document) => {
            text_pipeline(state, &upload.file_name, file_path, file_size, &document).await
        }
        ExtractedContent::Table(table) => {
            data_pipeline(state, &upload.file_name, file_path, file_size, &table).await
        }
    };

    let analysis_id = state
        .store
        .save_analysis(&new_analysis)
        .await
        .map_err(store_error)?;
    state
        .metrics
        .uploads
        .with_label_values(&[new_analysis.kind.as_str()])
        .inc();
    info!(analysis_id, kind = new_analysis.kind.as_str(), "Analysis saved");

    Ok((analysis_id, new_analysis))
}

async fn text_pipeline(
    state: &AppState,
    file_name: &str,
    file_path: String,
    file_size: i64,
    document: &TextDocument,
) -> NewAnalysis {
    let text_analysis = state.analysis.analyze_text(document).await;

    NewAnalysis {
        file_name: file_name.to_string(),
        file_path,
        file_size,
        kind: AnalysisKind::Text,
        analysis: None,
        charts: Vec::new(),
        text_analysis: Some(text_analysis),
    }
}

async fn data_pipeline(
    state: &AppState,
    file_name: &str,
    file_path: String,
    file_size: i64,
    table: &Table,
) -> NewAnalysis {
    let statistics = summarize(table);
    let data_analysis = state.analysis.suggest_charts(table, &statistics).await;
    let charts = state
        .renderer
        .render_suggestions(table, &data_analysis.suggested_charts);
    let analysis = state
        .analysis
        .analyze_charts(table, &statistics, &charts, &data_analysis)
        .await;

    NewAnalysis {
        file_name: file_name.to_string(),
        file_path,
        file_size,
        kind: AnalysisKind::Data,
        analysis: Some(analysis),
        charts,
        text_analysis: None,
    }
}
