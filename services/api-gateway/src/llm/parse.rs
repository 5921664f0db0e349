//! Pulling structured results out of free-form model replies.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use insight_models::{ChartAnalysis, ChartSuggestion, DataAnalysis, TextAnalysis};

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*#{1,6}\s*(\d+)\.").expect("hardcoded regex pattern")
});

/// The outermost `{ ... }` span of a reply.
pub fn json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

/// Chart proposals; entries with unknown chart types are dropped.
pub fn data_analysis(reply: &str) -> Result<DataAnalysis> {
    let raw = json_object(reply).context("Reply contains no JSON object")?;
    let value: serde_json::Value =
        serde_json::from_str(raw).context("Reply JSON could not be parsed")?;

    let data_insights = value
        .get("dataInsights")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_string();

    let suggested_charts: Vec<ChartSuggestion> = value
        .get("suggestedCharts")
        .and_then(serde_json::Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default();

    Ok(DataAnalysis {
        data_insights,
        suggested_charts,
    })
}

pub fn text_analysis(reply: &str) -> Result<TextAnalysis> {
    let raw = json_object(reply).context("Reply contains no JSON object")?;
    serde_json::from_str(raw).context("Reply JSON is not a text analysis")
}

/// Body of the `## {number}.` section, up to the next numbered heading.
pub fn narrative_section(text: &str, number: u32) -> Option<String> {
    let mut body: Option<Vec<&str>> = None;

    for line in text.lines() {
        let heading = HEADING_RE
            .captures(line)
            .and_then(|caps| caps[1].parse::<u32>().ok());

        match heading {
            Some(_) if body.is_some() => break,
            Some(n) if n == number => body = Some(Vec::new()),
            Some(_) => {}
            None => {
                if let Some(lines) = body.as_mut() {
                    lines.push(line);
                }
            }
        }
    }

    body.map(|lines| lines.join("\n").trim().to_string())
        .filter(|section| !section.is_empty())
}

/// Split a numbered narrative into the stored analysis fields.
pub fn chart_analysis(text: &str) -> ChartAnalysis {
    let section = |numbers: &[u32], default: &str| {
        numbers
            .iter()
            .find_map(|n| narrative_section(text, *n))
            .unwrap_or_else(|| default.to_string())
    };

    ChartAnalysis {
        summary: section(&[1], "The data was analyzed successfully."),
        trends: section(&[2], "No clear trend was identified."),
        insights: section(&[5, 3], "Several values in the data stand out."),
        recommendations: section(&[6], "Keep monitoring the data before drawing firm conclusions."),
        full_analysis: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_models::ChartKind;

    #[test]
    fn test_json_object_is_cut_from_prose() {
        let reply = "Sure! ```json\n{\"a\": {\"b\": 1}}\n``` hope this helps";
        assert_eq!(json_object(reply), Some("{\"a\": {\"b\": 1}}"));
        assert_eq!(json_object("no json"), None);
        assert_eq!(json_object("} backwards {"), None);
    }

    #[test]
    fn test_unknown_chart_types_are_dropped() {
        let reply = r#"{
            "dataInsights": "Sales grow",
            "suggestedCharts": [
                {"type": "bar", "columns": ["Name", "Sales"], "reason": "compare", "priority": 9},
                {"type": "scatter", "columns": ["Sales"], "priority": 8},
                {"type": "doughnut", "columns": ["Name", "Sales"]}
            ]
        }"#;
        let analysis = data_analysis(reply).unwrap();
        assert_eq!(analysis.data_insights, "Sales grow");
        let kinds: Vec<ChartKind> = analysis.suggested_charts.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![ChartKind::Bar, ChartKind::Doughnut]);
    }

    #[test]
    fn test_narrative_sections() {
        let text = "Intro line\n## 1. DATA OVERVIEW\nTen rows.\nTwo columns.\n## 2. TRENDS\nUpward.\n### 3. HIGHLIGHTS\n\n## 5. KEY INSIGHTS\nSales peak in May.\n## 6. RECOMMENDATIONS\nHire.";
        assert_eq!(narrative_section(text, 1).as_deref(), Some("Ten rows.\nTwo columns."));
        assert_eq!(narrative_section(text, 3), None);
        assert_eq!(narrative_section(text, 4), None);

        let analysis = chart_analysis(text);
        assert_eq!(analysis.trends, "Upward.");
        assert_eq!(analysis.insights, "Sales peak in May.");
        assert_eq!(analysis.recommendations, "Hire.");
        assert_eq!(analysis.full_analysis, text);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let analysis = chart_analysis("Nothing structured here");
        assert_eq!(analysis.summary, "The data was analyzed successfully.");
    }
}
