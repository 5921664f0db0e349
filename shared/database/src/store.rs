//! History storage seam.
//!
//! Handlers talk to [`HistoryStore`]; the PostgreSQL implementation delegates
//! to the repositories and [`crate::memory::MemoryHistoryStore`] keeps
//! everything in process.

use anyhow::Result;
use async_trait::async_trait;

use insight_models::{AnalysisRecord, ChatMessage, HistoryEntry, HistoryStats, NewAnalysis};

use crate::postgres::{self, PostgresPool};
use crate::repositories::{AnalysisRepository, ChatRepository};

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persist an analysis with its charts, returning the new id.
    async fn save_analysis(&self, analysis: &NewAnalysis) -> Result<i64>;

    /// Every analysis, newest first.
    async fn list_history(&self) -> Result<Vec<HistoryEntry>>;

    /// Analysis with charts and chat transcript (newest message first).
    async fn find_analysis(&self, id: i64) -> Result<Option<AnalysisRecord>>;

    /// Returns `false` when nothing was deleted.
    async fn delete_analysis(&self, id: i64) -> Result<bool>;

    async fn stats(&self) -> Result<HistoryStats>;

    async fn save_chat_message(
        &self,
        analysis_id: i64,
        message: &str,
        response: &str,
    ) -> Result<ChatMessage>;

    /// Chat transcript, oldest first.
    async fn chat_history(&self, analysis_id: i64) -> Result<Vec<ChatMessage>>;

    async fn health_check(&self) -> Result<()>;

    fn backend_name(&self) -> &'static str;
}

pub struct PgHistoryStore {
    pool: PostgresPool,
    analyses: AnalysisRepository,
    chats: ChatRepository,
}

impl PgHistoryStore {
    pub fn new(pool: PostgresPool) -> Self {
        Self {
            analyses: AnalysisRepository::new(pool.clone()),
            chats: ChatRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn save_analysis(&self, analysis: &NewAnalysis) -> Result<i64> {
        let id = self.analyses.create(analysis).await?;
        tracing::info!(id, file_name = %analysis.file_name, charts = analysis.charts.len(), "Analysis saved");
        Ok(id)
    }

    async fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        self.analyses.list().await
    }

    async fn find_analysis(&self, id: i64) -> Result<Option<AnalysisRecord>> {
        self.analyses.find_by_id(id).await
    }

    async fn delete_analysis(&self, id: i64) -> Result<bool> {
        self.analyses.delete(id).await
    }

    async fn stats(&self) -> Result<HistoryStats> {
        self.analyses.stats().await
    }

    async fn save_chat_message(
        &self,
        analysis_id: i64,
        message: &str,
        response: &str,
    ) -> Result<ChatMessage> {
        if !self.analyses.exists(analysis_id).await? {
            anyhow::bail!("Analysis {} not found", analysis_id);
        }
        self.chats.create(analysis_id, message, response).await
    }

    async fn chat_history(&self, analysis_id: i64) -> Result<Vec<ChatMessage>> {
        self.chats.find_by_analysis(analysis_id).await
    }

    async fn health_check(&self) -> Result<()> {
        postgres::health_check(&self.pool).await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
