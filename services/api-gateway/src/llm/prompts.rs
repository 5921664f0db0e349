//! Prompt text sent to the language model.

use insight_models::{ChartKind, DataAnalysis, RenderedChart};

pub fn chart_suggestions(table_brief: &str) -> String {
    let kinds: Vec<&str> = ChartKind::ALL.iter().map(ChartKind::as_str).collect();
    format!(
        r#"You are a data visualization expert. Analyze the data below and propose suitable charts.

DATA:
{table_brief}

Tasks:
1. Describe the structure and characteristics of the data
2. Propose the 5-8 chart types that present this data best
3. Explain why each chart fits

Reply with JSON in this format:
{{
  "dataInsights": "Preliminary analysis of the data",
  "suggestedCharts": [
    {{
      "type": "{kinds}",
      "columns": ["column_1", "column_2"],
      "reason": "Why this chart fits",
      "priority": 1-10
    }}
  ]
}}

Return only the JSON, no other text."#,
        table_brief = table_brief,
        kinds = kinds.join("|"),
    )
}

pub fn chart_narrative(
    table_brief: &str,
    charts: &[RenderedChart],
    data_analysis: &DataAnalysis,
) -> String {
    let insights = if data_analysis.data_insights.is_empty() {
        "No preliminary analysis available"
    } else {
        data_analysis.data_insights.as_str()
    };
    let charts_brief = if charts.is_empty() {
        "No charts".to_string()
    } else {
        charts
            .iter()
            .enumerate()
            .map(|(idx, chart)| format!("{}. {}: {}", idx + 1, chart.title, chart.description))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"You are a business data analyst with ten years of experience.

PRELIMINARY ANALYSIS:
{insights}

DETAILED DATA:
{table_brief}

CHARTS CREATED ({count} charts):
{charts_brief}

IMPORTANT:
- Base the analysis only on the ACTUAL DATA shown in the charts
- Do not give detailed analysis for charts without data
- If a chart is empty, say so and ask for more complete data

Write a professional analysis with exactly these headings:

## 1. DATA OVERVIEW
Scope and size of the dataset and its key figures (mean, sum, min, max).

## 2. TREND ANALYSIS
Growth or decline across time or categories and the expected direction.

## 3. HIGHLIGHTS
Top and bottom values, outliers and spread.

## 4. COMPARATIVE ANALYSIS
Differences between categories, shares and correlations.

## 5. KEY INSIGHTS
At least five findings, opportunities and risks.

## 6. RECOMMENDATIONS
At least five concrete actions in priority order, with KPIs to track.

## 7. CONCLUSION
Summary and overall assessment.

Be specific and use concrete numbers."#,
        insights = insights,
        table_brief = table_brief,
        count = charts.len(),
        charts_brief = charts_brief,
    )
}

pub fn text_review(document_brief: &str) -> String {
    format!(
        r#"You are a document analysis expert. Analyze the following document in detail.

{document_brief}

Reply with JSON in this format:
{{
  "mainTopic": "Main topic of the document",
  "summary": "Summary of the main content (3-5 sentences)",
  "keyPoints": ["Key point 1", "Key point 2", "Key point 3"],
  "themes": [
    {{ "theme": "Theme 1", "description": "Description" }}
  ],
  "structure": "Assessment of the document structure",
  "language": "Assessment of language and writing style",
  "audience": "Intended audience",
  "purpose": "Purpose of the document",
  "strengths": ["Strength 1", "Strength 2"],
  "improvements": ["Suggestion 1", "Suggestion 2"],
  "conclusions": "Overall conclusion"
}}

Return only the JSON, no other text."#,
        document_brief = document_brief,
    )
}

pub fn chat(message: &str, data: &serde_json::Value) -> String {
    let data = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
    format!(
        r#"You are a data analysis assistant. The user is looking at a report with this data:

{data}

User question: "{message}"

Answer accurately and in detail based on the data above.
If useful, suggest a specific chart (chart type and columns).
Keep the answer short and easy to follow."#,
        data = data,
        message = message,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_prompt_lists_chart_kinds() {
        let prompt = chart_suggestions("Total records: 2");
        assert!(prompt.contains("Total records: 2"));
        assert!(prompt.contains("bar|horizontalBar|line|area|pie|doughnut|multiColumn|stacked"));
    }

    #[test]
    fn test_narrative_prompt_without_charts() {
        let prompt = chart_narrative("brief", &[], &DataAnalysis::default());
        assert!(prompt.contains("No charts"));
        assert!(prompt.contains("No preliminary analysis available"));
        assert!(prompt.contains("## 6. RECOMMENDATIONS"));
    }
}
