use serde::{Deserialize, Serialize};
use std::fmt;

/// Chart vocabulary shared by the analysis service and the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    Line,
    Area,
    Pie,
    Doughnut,
    MultiColumn,
    Stacked,
}

impl ChartKind {
    pub const ALL: [ChartKind; 8] = [
        Self::Bar,
        Self::HorizontalBar,
        Self::Line,
        Self::Area,
        Self::Pie,
        Self::Doughnut,
        Self::MultiColumn,
        Self::Stacked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::HorizontalBar => "horizontalBar",
            Self::Line => "line",
            Self::Area => "area",
            Self::Pie => "pie",
            Self::Doughnut => "doughnut",
            Self::MultiColumn => "multiColumn",
            Self::Stacked => "stacked",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == value)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chart proposed by the analysis step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSuggestion {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub priority: i32,
}

/// A rendered chart image plus the metadata stored with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedChart {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub title: String,
    pub description: String,
    /// `data:` URI of the image.
    pub image: String,
    pub has_data: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_match_serde() {
        for kind in ChartKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(ChartKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ChartKind::parse("scatter"), None);
    }

    #[test]
    fn test_suggestion_defaults() {
        let s: ChartSuggestion = serde_json::from_str(r#"{"type":"horizontalBar"}"#).unwrap();
        assert_eq!(s.kind, ChartKind::HorizontalBar);
        assert!(s.columns.is_empty());
        assert_eq!(s.priority, 0);
    }
}
