//! Chat Repository
//!
//! Follow-up questions and answers attached to a stored analysis.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use insight_models::ChatMessage;

pub struct ChatRepository {
    pool: PgPool,
}

impl ChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, analysis_id: i64, message: &str, response: &str) -> Result<ChatMessage> {
        let row: ChatRow = sqlx::query_as(
            r#"
            INSERT INTO chat_history (analysis_id, message, response)
            VALUES ($1, $2, $3)
            RETURNING id, analysis_id, message, response, created_at
            "#,
        )
        .bind(analysis_id)
        .bind(message)
        .bind(response)
        .fetch_one(&self.pool)
        .await
        .context("Failed to save chat message")?;

        Ok(row.into())
    }

    /// Messages for one analysis, oldest first.
    pub async fn find_by_analysis(&self, analysis_id: i64) -> Result<Vec<ChatMessage>> {
        let rows: Vec<ChatRow> = sqlx::query_as(
            r#"
            SELECT id, analysis_id, message, response, created_at
            FROM chat_history
            WHERE analysis_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(analysis_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch chat history")?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, FromRow)]
struct ChatRow {
    id: i64,
    analysis_id: i64,
    message: String,
    response: String,
    created_at: DateTime<Utc>,
}

impl From<ChatRow> for ChatMessage {
    fn from(row: ChatRow) -> Self {
        Self {
            id: row.id,
            analysis_id: row.analysis_id,
            message: row.message,
            response: row.response,
            created_at: row.created_at,
        }
    }
}
