//! Language-model analysis with local fallbacks.

pub mod fallback;
pub mod gemini;
pub mod parse;
pub mod prompts;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use prometheus::IntCounterVec;
use tracing::{info, warn};

use insight_models::{
    ChartAnalysis, ColumnStatistics, DataAnalysis, RenderedChart, Table, TextAnalysis,
    TextDocument,
};
use insight_utils::report::{document_summary, table_summary};
use insight_utils::{InsightError, InsightResult};

pub use gemini::GeminiClient;

#[async_trait]
pub trait LlmClient: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String>;
}

pub struct AnalysisService {
    client: Option<Arc<dyn LlmClient>>,
    max_text_chars: usize,
    fallbacks: IntCounterVec,
}

impl AnalysisService {
    pub fn new(
        client: Option<Arc<dyn LlmClient>>,
        max_text_chars: usize,
        fallbacks: IntCounterVec,
    ) -> Self {
        match &client {
            Some(c) => info!(provider = c.name(), "Language model analysis enabled"),
            None => warn!("No language model configured; analyses use local fallbacks"),
        }
        Self {
            client,
            max_text_chars,
            fallbacks,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    fn record_fallback(&self, operation: &str) {
        self.fallbacks.with_label_values(&[operation]).inc();
    }

    /// Run `prompt` through the model and `parse` the reply; `None` means fall back.
    async fn ask<T>(
        &self,
        operation: &str,
        prompt: impl FnOnce() -> String,
        parse: impl FnOnce(&str) -> Result<T>,
    ) -> Option<T> {
        let Some(client) = &self.client else {
            self.record_fallback(operation);
            return None;
        };

        let result = match client.generate(&prompt()).await {
            Ok(reply) => parse(&reply),
            Err(e) => Err(e),
        };

        match result {
            Ok(value) => Some(value),
            Err(e) => {
                let message = format!("{:#}", e);
                warn!(operation, provider = client.name(), error = %message, "Language model failed, using fallback");
                self.record_fallback(operation);
                None
            }
        }
    }

    pub async fn suggest_charts(&self, table: &Table, statistics: &[ColumnStatistics]) -> DataAnalysis {
        self.ask(
            "suggest_charts",
            || prompts::chart_suggestions(&table_summary(table, statistics)),
            parse::data_analysis,
        )
        .await
        .unwrap_or_else(|| fallback::chart_suggestions(table))
    }

    pub async fn analyze_charts(
        &self,
        table: &Table,
        statistics: &[ColumnStatistics],
        charts: &[RenderedChart],
        data_analysis: &DataAnalysis,
    ) -> ChartAnalysis {
        self.ask(
            "analyze_charts",
            || prompts::chart_narrative(&table_summary(table, statistics), charts, data_analysis),
            |reply| Ok(parse::chart_analysis(reply)),
        )
        .await
        .unwrap_or_else(|| fallback::chart_analysis(table, statistics))
    }

    pub async fn analyze_text(&self, document: &TextDocument) -> TextAnalysis {
        self.ask(
            "analyze_text",
            || prompts::text_review(&document_summary(document, self.max_text_chars)),
            parse::text_analysis,
        )
        .await
        .unwrap_or_else(|| fallback::text_analysis(document))
    }

    /// Free-form question about report data. Requires a configured model.
    pub async fn chat(&self, message: &str, data: &serde_json::Value) -> InsightResult<String> {
        let client = self.client.as_ref().ok_or_else(|| {
            InsightError::external_service("LLM", "No language model is configured")
        })?;

        client
            .generate(&prompts::chat(message, data))
            .await
            .map_err(|e| InsightError::external_service(client.name(), format!("{:#}", e)))
    }
}
