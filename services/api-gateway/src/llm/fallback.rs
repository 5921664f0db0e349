//! Local stand-ins used when the language model is unavailable or fails.

use insight_models::{
    ChartAnalysis, ChartKind, ChartSuggestion, ColumnStatistics, DataAnalysis, Table,
    TextAnalysis, TextDocument, Theme,
};

pub const MAX_SUGGESTIONS: usize = 8;
const MAX_PIE_ROWS: usize = 10;
const KEYWORD_MIN_CHARS: usize = 5;
const TOP_KEYWORDS: usize = 5;

/// A bar and a line chart per numeric column, plus a pie for short tables.
pub fn chart_suggestions(table: &Table) -> DataAnalysis {
    let numeric = table.numeric_columns();
    let label = table.label_column().unwrap_or_default();

    let mut suggestions = Vec::new();
    for (idx, column) in numeric.iter().enumerate() {
        let columns = vec![label.clone(), column.clone()];
        suggestions.push(ChartSuggestion {
            kind: ChartKind::Bar,
            columns: columns.clone(),
            reason: "Compare values".to_string(),
            priority: 10 - idx as i32,
        });
        suggestions.push(ChartSuggestion {
            kind: ChartKind::Line,
            columns,
            reason: "Show the trend".to_string(),
            priority: 9 - idx as i32,
        });
    }

    if let Some(first) = numeric.first() {
        if table.len() <= MAX_PIE_ROWS {
            suggestions.push(ChartSuggestion {
                kind: ChartKind::Pie,
                columns: vec![label.clone(), first.clone()],
                reason: "Share of the total".to_string(),
                priority: 8,
            });
        }
    }
    suggestions.truncate(MAX_SUGGESTIONS);

    DataAnalysis {
        data_insights: format!(
            "The data has {} rows with {} numeric columns",
            table.len(),
            numeric.len()
        ),
        suggested_charts: suggestions,
    }
}

pub fn chart_analysis(table: &Table, statistics: &[ColumnStatistics]) -> ChartAnalysis {
    let numeric = table.numeric_columns();
    let first = statistics.iter().find(|s| numeric.contains(&s.column));

    let (summary, insights) = match first {
        Some(stats) => (
            format!(
                "Analyzed {} rows of data. Column \"{}\" has a mean of {:.2}.",
                table.len(),
                stats.column,
                stats.mean
            ),
            format!(
                "Highest value: {}, lowest: {}, difference: {:.2}.",
                stats.max, stats.min, stats.range
            ),
        ),
        None => (
            format!(
                "Analyzed {} rows of data with {} columns.",
                table.len(),
                table.first_row_columns().len()
            ),
            "Some values stand out and deserve attention.".to_string(),
        ),
    };
    let trends = "The data varies across the measured points.".to_string();
    let recommendations = "Keep monitoring the data before drawing firm conclusions.".to_string();

    ChartAnalysis {
        full_analysis: format!("{}\n\n{}\n\n{}\n\n{}", summary, trends, insights, recommendations),
        summary,
        trends,
        insights,
        recommendations,
    }
}

/// Most frequent words longer than four characters, most frequent first.
pub fn keywords(content: &str, limit: usize) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for word in content.split_whitespace() {
        let clean: String = word
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if clean.chars().count() < KEYWORD_MIN_CHARS {
            continue;
        }
        match counts.iter_mut().find(|(w, _)| *w == clean) {
            Some((_, count)) => *count += 1,
            None => counts.push((clean, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(word, _)| word).collect()
}

pub fn text_analysis(document: &TextDocument) -> TextAnalysis {
    let metadata = &document.metadata;
    let sentences = document
        .content
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count();
    let length = if metadata.word_count > 1000 { "long" } else { "concise" };

    TextAnalysis {
        main_topic: format!("The document has {} main sections", metadata.sections.len()),
        summary: format!(
            "The document has {} words in {} paragraphs and {} sentences. Main keywords: {}.",
            metadata.word_count,
            metadata.paragraph_count,
            sentences,
            keywords(&document.content, TOP_KEYWORDS).join(", ")
        ),
        key_points: metadata.sections.iter().take(5).map(|s| s.title.clone()).collect(),
        themes: metadata
            .sections
            .iter()
            .take(3)
            .map(|s| Theme {
                theme: s.title.clone(),
                description: format!("This section has {} words", s.word_count()),
            })
            .collect(),
        structure: format!(
            "The document is organized into {} clear sections",
            metadata.sections.len()
        ),
        language: "Formal language suited to professional documents".to_string(),
        audience: "Professional readers".to_string(),
        purpose: "Provide information and analysis".to_string(),
        strengths: vec!["Clear structure".to_string(), "Detailed content".to_string()],
        improvements: vec![
            "Could be summarized more concisely".to_string(),
            "Add illustrations".to_string(),
        ],
        conclusions: format!(
            "This is a {} document with systematically presented content.",
            length
        ),
    }
}
