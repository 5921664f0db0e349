//! Analysis Repository
//!
//! Stores analyses with their rendered charts and serves history listings.
//! Uses runtime SQL queries (unchecked) to avoid requiring DATABASE_URL at compile time.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use insight_models::{
    AnalysisKind, AnalysisRecord, ChartAnalysis, ChartRecord, HistoryEntry, HistoryStats,
    NewAnalysis, TextAnalysis,
};

use super::chat::ChatRepository;

pub const SUMMARY_PREVIEW_CHARS: i32 = 200;

pub struct AnalysisRepository {
    pool: PgPool,
}

impl AnalysisRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an analysis and its charts in one transaction.
    pub async fn create(&self, analysis: &NewAnalysis) -> Result<i64> {
        let text_analysis = analysis
            .text_analysis
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .context("Failed to serialize text analysis")?;
        let narrative = analysis.analysis.as_ref();

        let mut tx = self.pool.begin().await.context("Failed to begin transaction")?;

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO analysis_history
                (file_name, file_path, file_size, analysis_type, analysis_summary,
                 analysis_trends, analysis_insights, analysis_recommendations,
                 full_analysis, charts_count, text_analysis)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(&analysis.file_name)
        .bind(&analysis.file_path)
        .bind(analysis.file_size)
        .bind(analysis.kind.as_str())
        .bind(narrative.map(|a| a.summary.as_str()))
        .bind(narrative.map(|a| a.trends.as_str()))
        .bind(narrative.map(|a| a.insights.as_str()))
        .bind(narrative.map(|a| a.recommendations.as_str()))
        .bind(narrative.map(|a| a.full_analysis.as_str()))
        .bind(analysis.charts.len() as i32)
        .bind(text_analysis)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert analysis")?;

        for chart in &analysis.charts {
            sqlx::query(
                r#"
                INSERT INTO charts (analysis_id, chart_type, chart_title, chart_image, chart_description)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(id)
            .bind(chart.kind.as_str())
            .bind(&chart.title)
            .bind(&chart.image)
            .bind(&chart.description)
            .execute(&mut *tx)
            .await
            .context("Failed to insert chart")?;
        }

        tx.commit().await.context("Failed to commit analysis")?;
        Ok(id)
    }

    /// All analyses, newest first.
    pub async fn list(&self) -> Result<Vec<HistoryEntry>> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            r#"
            SELECT id, file_name, file_size, upload_date, charts_count, analysis_type,
                   LEFT(COALESCE(NULLIF(analysis_summary, ''), text_analysis::text, ''), $1)
                       AS summary_preview
            FROM analysis_history
            ORDER BY upload_date DESC, id DESC
            "#,
        )
        .bind(SUMMARY_PREVIEW_CHARS)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch analysis history")?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// One analysis with charts and chat transcript (newest message first).
    pub async fn find_by_id(&self, id: i64) -> Result<Option<AnalysisRecord>> {
        let row: Option<AnalysisRow> = sqlx::query_as(
            r#"
            SELECT id, file_name, file_path, file_size, upload_date, analysis_type,
                   analysis_summary, analysis_trends, analysis_insights,
                   analysis_recommendations, full_analysis, charts_count, text_analysis
            FROM analysis_history
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch analysis by ID")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let charts: Vec<ChartRow> = sqlx::query_as(
            r#"
            SELECT id, analysis_id, chart_type, chart_title, chart_image, chart_description
            FROM charts
            WHERE analysis_id = $1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch charts for analysis")?;

        let mut chat_history = ChatRepository::new(self.pool.clone())
            .find_by_analysis(id)
            .await?;
        chat_history.reverse();

        let mut record = row.into_record();
        record.charts = charts.into_iter().map(Into::into).collect();
        record.chat_history = chat_history;
        Ok(Some(record))
    }

    /// Delete an analysis; charts and chat messages cascade.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM analysis_history WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete analysis")?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(&self, id: i64) -> Result<bool> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM analysis_history WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .context("Failed to check analysis existence")?;
        Ok(exists)
    }

    pub async fn stats(&self) -> Result<HistoryStats> {
        let (total_analyses, total_charts, avg_file_size, last_analysis_date): (
            i64,
            i64,
            Option<f64>,
            Option<DateTime<Utc>>,
        ) = sqlx::query_as(
            r#"
            SELECT COUNT(*)::BIGINT,
                   COALESCE(SUM(charts_count), 0)::BIGINT,
                   AVG(file_size)::FLOAT8,
                   MAX(upload_date)
            FROM analysis_history
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to compute history statistics")?;

        Ok(HistoryStats {
            total_analyses,
            total_charts,
            avg_file_size,
            last_analysis_date,
        })
    }
}

/// Internal row types for SQLx mapping
#[derive(Debug, FromRow)]
struct HistoryRow {
    id: i64,
    file_name: String,
    file_size: i64,
    upload_date: DateTime<Utc>,
    charts_count: i32,
    analysis_type: String,
    summary_preview: Option<String>,
}

impl From<HistoryRow> for HistoryEntry {
    fn from(row: HistoryRow) -> Self {
        Self {
            id: row.id,
            file_name: row.file_name,
            file_size: row.file_size,
            upload_date: row.upload_date,
            charts_count: row.charts_count,
            kind: AnalysisKind::from_db(&row.analysis_type),
            summary_preview: row.summary_preview.unwrap_or_default(),
        }
    }
}

#[derive(Debug, FromRow)]
struct AnalysisRow {
    id: i64,
    file_name: String,
    file_path: String,
    file_size: i64,
    upload_date: DateTime<Utc>,
    analysis_type: String,
    analysis_summary: Option<String>,
    analysis_trends: Option<String>,
    analysis_insights: Option<String>,
    analysis_recommendations: Option<String>,
    full_analysis: Option<String>,
    charts_count: i32,
    text_analysis: Option<serde_json::Value>,
}

impl AnalysisRow {
    fn into_record(self) -> AnalysisRecord {
        let text_analysis = self.text_analysis.and_then(|value| {
            serde_json::from_value::<TextAnalysis>(value)
                .map_err(|e| tracing::warn!(id = self.id, error = %e, "Stored text analysis is malformed"))
                .ok()
        });

        AnalysisRecord {
            id: self.id,
            file_name: self.file_name,
            file_path: self.file_path,
            file_size: self.file_size,
            upload_date: self.upload_date,
            kind: AnalysisKind::from_db(&self.analysis_type),
            analysis: ChartAnalysis {
                summary: self.analysis_summary.unwrap_or_default(),
                trends: self.analysis_trends.unwrap_or_default(),
                insights: self.analysis_insights.unwrap_or_default(),
                recommendations: self.analysis_recommendations.unwrap_or_default(),
                full_analysis: self.full_analysis.unwrap_or_default(),
            },
            charts_count: self.charts_count,
            text_analysis,
            charts: Vec::new(),
            chat_history: Vec::new(),
        }
    }
}

#[derive(Debug, FromRow)]
struct ChartRow {
    id: i64,
    analysis_id: i64,
    chart_type: String,
    chart_title: Option<String>,
    chart_image: Option<String>,
    chart_description: Option<String>,
}

impl From<ChartRow> for ChartRecord {
    fn from(row: ChartRow) -> Self {
        Self {
            id: row.id,
            analysis_id: row.analysis_id,
            chart_type: row.chart_type,
            chart_title: row.chart_title,
            chart_image: row.chart_image,
            chart_description: row.chart_description,
        }
    }
}
