//! Plain-text briefs of extracted content, used as model prompt input.

use std::fmt::Write;

use insight_models::{ColumnStatistics, Table, TextDocument};

pub const SAMPLE_ROWS: usize = 5;

fn fmt_metric(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        "n/a".to_string()
    }
}

/// Record count, column list, per-column statistics and a short row sample.
pub fn table_summary(table: &Table, statistics: &[ColumnStatistics]) -> String {
    if table.is_empty() {
        return "No data available".to_string();
    }

    let columns = table.first_row_columns();
    let mut out = String::new();
    let _ = writeln!(out, "Total records: {}", table.len());
    let _ = writeln!(out, "Column count: {}", columns.len());
    let _ = writeln!(out, "Columns: {}", columns.join(", "));

    for stats in statistics {
        let _ = writeln!(out, "\nColumn \"{}\":", stats.column);
        let _ = writeln!(out, "  - Sum: {}", fmt_metric(stats.sum));
        let _ = writeln!(out, "  - Mean: {}", fmt_metric(stats.mean));
        let _ = writeln!(out, "  - Median: {}", fmt_metric(stats.median));
        let _ = writeln!(out, "  - Max: {}", stats.max);
        let _ = writeln!(out, "  - Min: {}", stats.min);
        let _ = writeln!(out, "  - Range: {}", fmt_metric(stats.range));
        let _ = writeln!(out, "  - Standard deviation: {}", fmt_metric(stats.standard_deviation));
        let _ = writeln!(
            out,
            "  - Coefficient of variation: {}%",
            fmt_metric(stats.coefficient_of_variation)
        );
    }

    let _ = writeln!(out, "\nSample rows (first {}):", SAMPLE_ROWS);
    for (idx, row) in table.rows().iter().take(SAMPLE_ROWS).enumerate() {
        let json = serde_json::to_string(row).unwrap_or_default();
        let _ = writeln!(out, "  {}. {}", idx + 1, json);
    }

    out.trim_end().to_string()
}

/// Document metadata, section outline and the leading `max_chars` characters
/// of content.
pub fn document_summary(document: &TextDocument, max_chars: usize) -> String {
    let metadata = &document.metadata;
    let excerpt: String = document.content.chars().take(max_chars).collect();

    let mut out = String::new();
    let _ = writeln!(out, "Document information:");
    let _ = writeln!(out, "- Words: {}", metadata.word_count);
    let _ = writeln!(out, "- Paragraphs: {}", metadata.paragraph_count);
    let _ = writeln!(out, "- Characters: {}", metadata.character_count);
    let _ = writeln!(out, "\nMain sections:");
    for (idx, section) in metadata.sections.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} ({} words)",
            idx + 1,
            section.title,
            section.word_count()
        );
    }
    let _ = writeln!(
        out,
        "\nContent (first {} characters):\n\"\"\"\n{}\n\"\"\"",
        excerpt.chars().count(),
        excerpt
    );
    out.trim_end().to_string()
}
