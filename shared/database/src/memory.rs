//! In-process history store used when no PostgreSQL is configured.

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use insight_models::{
    AnalysisRecord, ChartRecord, ChatMessage, HistoryEntry, HistoryStats, NewAnalysis,
};

use crate::repositories::SUMMARY_PREVIEW_CHARS;
use crate::store::HistoryStore;

#[derive(Default)]
struct State {
    next_analysis_id: i64,
    next_chart_id: i64,
    next_chat_id: i64,
    analyses: BTreeMap<i64, StoredAnalysis>,
}

struct StoredAnalysis {
    record: AnalysisRecord,
    preview: String,
}

#[derive(Default)]
pub struct MemoryHistoryStore {
    state: RwLock<State>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn save_analysis(&self, analysis: &NewAnalysis) -> Result<i64> {
        let mut state = self.state.write().await;
        state.next_analysis_id += 1;
        let id = state.next_analysis_id;

        let mut charts = Vec::with_capacity(analysis.charts.len());
        for chart in &analysis.charts {
            state.next_chart_id += 1;
            charts.push(ChartRecord {
                id: state.next_chart_id,
                analysis_id: id,
                chart_type: chart.kind.as_str().to_string(),
                chart_title: Some(chart.title.clone()),
                chart_image: Some(chart.image.clone()),
                chart_description: Some(chart.description.clone()),
            });
        }

        let record = AnalysisRecord {
            id,
            file_name: analysis.file_name.clone(),
            file_path: analysis.file_path.clone(),
            file_size: analysis.file_size,
            upload_date: Utc::now(),
            kind: analysis.kind,
            analysis: analysis.analysis.clone().unwrap_or_default(),
            charts_count: charts.len() as i32,
            text_analysis: analysis.text_analysis.clone(),
            charts,
            chat_history: Vec::new(),
        };
        let preview = analysis.summary_preview(SUMMARY_PREVIEW_CHARS as usize);
        state.analyses.insert(id, StoredAnalysis { record, preview });

        tracing::debug!(id, file_name = %analysis.file_name, "Analysis saved in memory");
        Ok(id)
    }

    async fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        let state = self.state.read().await;
        let mut entries: Vec<HistoryEntry> = state
            .analyses
            .values()
            .map(|stored| HistoryEntry {
                id: stored.record.id,
                file_name: stored.record.file_name.clone(),
                file_size: stored.record.file_size,
                upload_date: stored.record.upload_date,
                charts_count: stored.record.charts_count,
                kind: stored.record.kind,
                summary_preview: stored.preview.clone(),
            })
            .collect();
        entries.sort_by(|a, b| b.upload_date.cmp(&a.upload_date).then(b.id.cmp(&a.id)));
        Ok(entries)
    }

    async fn find_analysis(&self, id: i64) -> Result<Option<AnalysisRecord>> {
        let state = self.state.read().await;
        Ok(state.analyses.get(&id).map(|stored| {
            let mut record = stored.record.clone();
            record.chat_history.reverse();
            record
        }))
    }

    async fn delete_analysis(&self, id: i64) -> Result<bool> {
        Ok(self.state.write().await.analyses.remove(&id).is_some())
    }

    async fn stats(&self) -> Result<HistoryStats> {
        let state = self.state.read().await;
        let records: Vec<&AnalysisRecord> = state.analyses.values().map(|s| &s.record).collect();

        let total_analyses = records.len() as i64;
        let avg_file_size = if records.is_empty() {
            None
        } else {
            Some(records.iter().map(|r| r.file_size as f64).sum::<f64>() / records.len() as f64)
        };

        Ok(HistoryStats {
            total_analyses,
            total_charts: records.iter().map(|r| r.charts_count as i64).sum(),
            avg_file_size,
            last_analysis_date: records.iter().map(|r| r.upload_date).max(),
        })
    }

    async fn save_chat_message(
        &self,
        analysis_id: i64,
        message: &str,
        response: &str,
    ) -> Result<ChatMessage> {
        let mut state = self.state.write().await;
        state.next_chat_id += 1;
        let id = state.next_chat_id;

        let stored = state
            .analyses
            .get_mut(&analysis_id)
            .ok_or_else(|| anyhow::anyhow!("Analysis {} not found", analysis_id))?;

        let chat = ChatMessage {
            id,
            analysis_id,
            message: message.to_string(),
            response: response.to_string(),
            created_at: Utc::now(),
        };
        stored.record.chat_history.push(chat.clone());
        Ok(chat)
    }

    async fn chat_history(&self, analysis_id: i64) -> Result<Vec<ChatMessage>> {
        let state = self.state.read().await;
        Ok(state
            .analyses
            .get(&analysis_id)
            .map(|stored| stored.record.chat_history.clone())
            .unwrap_or_default())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_models::{AnalysisKind, ChartAnalysis, ChartKind, RenderedChart, TextAnalysis};

    fn chart(kind: ChartKind) -> RenderedChart {
        RenderedChart {
            kind,
            title: format!("{} chart", kind),
            description: String::new(),
            image: "data:image/svg+xml;base64,PHN2Zy8+".to_string(),
            has_data: true,
        }
    }

    fn data_analysis(name: &str, size: i64, charts: usize) -> NewAnalysis {
        NewAnalysis {
            file_name: name.to_string(),
            file_path: format!("uploads/{}", name),
            file_size: size,
            kind: AnalysisKind::Data,
            analysis: Some(ChartAnalysis {
                summary: "Revenue grew steadily".to_string(),
                ..Default::default()
            }),
            charts: (0..charts).map(|_| chart(ChartKind::Bar)).collect(),
            text_analysis: None,
        }
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let store = MemoryHistoryStore::new();
        let id = store.save_analysis(&data_analysis("a.xlsx", 100, 2)).await.unwrap();

        let record = store.find_analysis(id).await.unwrap().unwrap();
        assert_eq!(record.file_name, "a.xlsx");
        assert_eq!(record.charts_count, 2);
        assert_eq!(record.charts.len(), 2);
        assert_eq!(record.charts[0].chart_type, "bar");
        assert_eq!(record.analysis.summary, "Revenue grew steadily");
        assert!(store.find_analysis(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let store = MemoryHistoryStore::new();
        let first = store.save_analysis(&data_analysis("a.xlsx", 100, 0)).await.unwrap();
        let second = store.save_analysis(&data_analysis("b.xlsx", 300, 1)).await.unwrap();

        let history = store.list_history().await.unwrap();
        let ids: Vec<i64> = history.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![second, first]);
        assert_eq!(history[0].summary_preview, "Revenue grew steadily");
    }

    #[tokio::test]
    async fn test_text_analysis_preview() {
        let store = MemoryHistoryStore::new();
        let mut analysis = data_analysis("notes.docx", 10, 0);
        analysis.kind = AnalysisKind::Text;
        analysis.analysis = None;
        analysis.text_analysis = Some(TextAnalysis {
            main_topic: "Hiring plan".to_string(),
            ..Default::default()
        });
        store.save_analysis(&analysis).await.unwrap();

        let history = store.list_history().await.unwrap();
        assert_eq!(history[0].kind, AnalysisKind::Text);
        assert!(history[0].summary_preview.contains("Hiring plan"));
        assert!(history[0].summary_preview.chars().count() <= 200);
    }

    #[tokio::test]
    async fn test_delete_removes_chat() {
        let store = MemoryHistoryStore::new();
        let id = store.save_analysis(&data_analysis("a.xlsx", 100, 1)).await.unwrap();
        store.save_chat_message(id, "why?", "because").await.unwrap();

        assert!(store.delete_analysis(id).await.unwrap());
        assert!(!store.delete_analysis(id).await.unwrap());
        assert!(store.chat_history(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chat_ordering() {
        let store = MemoryHistoryStore::new();
        let id = store.save_analysis(&data_analysis("a.xlsx", 100, 0)).await.unwrap();
        store.save_chat_message(id, "first", "one").await.unwrap();
        store.save_chat_message(id, "second", "two").await.unwrap();

        let history = store.chat_history(id).await.unwrap();
        assert_eq!(history[0].message, "first");

        let record = store.find_analysis(id).await.unwrap().unwrap();
        assert_eq!(record.chat_history[0].message, "second");
    }

    #[tokio::test]
    async fn test_chat_for_unknown_analysis_fails() {
        let store = MemoryHistoryStore::new();
        assert!(store.save_chat_message(42, "hi", "there").await.is_err());
    }

    #[tokio::test]
    async fn test_stats() {
        let store = MemoryHistoryStore::new();
        let empty = store.stats().await.unwrap();
        assert_eq!(empty.total_analyses, 0);
        assert_eq!(empty.avg_file_size, None);

        store.save_analysis(&data_analysis("a.xlsx", 100, 2)).await.unwrap();
        store.save_analysis(&data_analysis("b.xlsx", 300, 1)).await.unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total_analyses, 2);
        assert_eq!(stats.total_charts, 3);
        assert_eq!(stats.avg_file_size, Some(200.0));
        assert!(stats.last_analysis_date.is_some());
    }
}
