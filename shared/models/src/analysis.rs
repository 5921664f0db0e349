use serde::{Deserialize, Serialize};

use crate::chart::ChartSuggestion;

/// First analysis pass over a table: insights plus chart proposals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataAnalysis {
    pub data_insights: String,
    pub suggested_charts: Vec<ChartSuggestion>,
}

/// Narrative written after the charts were rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartAnalysis {
    pub summary: String,
    pub trends: String,
    pub insights: String,
    pub recommendations: String,
    pub full_analysis: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub theme: String,
    pub description: String,
}

/// Structured review of a text document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextAnalysis {
    pub main_topic: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub themes: Vec<Theme>,
    pub structure: String,
    pub language: String,
    pub audience: String,
    pub purpose: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub conclusions: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_text_analysis_uses_defaults() {
        let analysis: TextAnalysis =
            serde_json::from_str(r#"{"mainTopic":"Budget","keyPoints":["a","b"]}"#).unwrap();
        assert_eq!(analysis.main_topic, "Budget");
        assert_eq!(analysis.key_points.len(), 2);
        assert!(analysis.themes.is_empty());
    }
}
