use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{ChartAnalysis, TextAnalysis};
use crate::chart::RenderedChart;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Data,
    Text,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Text => "text",
        }
    }

    /// Unknown stored values are read back as `Data`.
    pub fn from_db(value: &str) -> Self {
        match value {
            "text" => Self::Text,
            _ => Self::Data,
        }
    }
}

/// Everything persisted after one upload has been analyzed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnalysis {
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub kind: AnalysisKind,
    pub analysis: Option<ChartAnalysis>,
    pub charts: Vec<RenderedChart>,
    pub text_analysis: Option<TextAnalysis>,
}

impl NewAnalysis {
    /// Text shown in history listings, capped at `max_chars`.
    pub fn summary_preview(&self, max_chars: usize) -> String {
        let source = match (&self.analysis, &self.text_analysis) {
            (Some(a), _) if !a.summary.is_empty() => a.summary.clone(),
            (_, Some(t)) => serde_json::to_string(t).unwrap_or_default(),
            _ => String::new(),
        };
        source.chars().take(max_chars).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRecord {
    pub id: i64,
    pub analysis_id: i64,
    pub chart_type: String,
    pub chart_title: Option<String>,
    pub chart_image: Option<String>,
    pub chart_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    pub analysis_id: i64,
    pub message: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

/// A stored analysis with its charts and chat transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: i64,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub upload_date: DateTime<Utc>,
    pub kind: AnalysisKind,
    pub analysis: ChartAnalysis,
    pub charts_count: i32,
    pub text_analysis: Option<TextAnalysis>,
    pub charts: Vec<ChartRecord>,
    pub chat_history: Vec<ChatMessage>,
}

/// One line of the history listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: i64,
    pub file_name: String,
    pub file_size: i64,
    pub upload_date: DateTime<Utc>,
    pub charts_count: i32,
    pub kind: AnalysisKind,
    pub summary_preview: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total_analyses: i64,
    pub total_charts: i64,
    pub avg_file_size: Option<f64>,
    pub last_analysis_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_analysis(summary: &str, text: Option<TextAnalysis>) -> NewAnalysis {
        NewAnalysis {
            file_name: "report.xlsx".to_string(),
            file_path: "uploads/1-2.xlsx".to_string(),
            file_size: 1024,
            kind: AnalysisKind::Data,
            analysis: Some(ChartAnalysis {
                summary: summary.to_string(),
                ..Default::default()
            }),
            charts: Vec::new(),
            text_analysis: text,
        }
    }

    #[test]
    fn test_summary_preview_truncates() {
        let analysis = new_analysis(&"x".repeat(300), None);
        assert_eq!(analysis.summary_preview(200).len(), 200);
    }

    #[test]
    fn test_summary_preview_falls_back_to_text_analysis() {
        let text = TextAnalysis {
            main_topic: "Roadmap".to_string(),
            ..Default::default()
        };
        let preview = new_analysis("", Some(text)).summary_preview(200);
        assert!(preview.contains("Roadmap"));
    }

    #[test]
    fn test_kind_from_db() {
        assert_eq!(AnalysisKind::from_db("text"), AnalysisKind::Text);
        assert_eq!(AnalysisKind::from_db("data"), AnalysisKind::Data);
        assert_eq!(AnalysisKind::from_db("legacy"), AnalysisKind::Data);
    }
}
