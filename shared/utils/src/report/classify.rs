//! Prose-versus-data heuristics shared by the presentation, PDF and Word
//! readers.

use std::sync::LazyLock;

use insight_models::{Row, Table};
use regex::Regex;

use super::heuristics::HeuristicConfig;

static DIGIT_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("hardcoded regex pattern"));

static PURE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.?\d*$").expect("hardcoded regex pattern"));

static COLUMN_GAP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}|\t").expect("hardcoded regex pattern"));

pub fn token_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Digit runs per whitespace-delimited token; 0 for text without tokens.
pub fn numeric_ratio(text: &str) -> f64 {
    let tokens = token_count(text);
    if tokens == 0 {
        return 0.0;
    }
    DIGIT_RUN_RE.find_iter(text).count() as f64 / tokens as f64
}

/// Mostly words, and enough of them to be worth reading as a document.
pub fn is_prose(text: &str, min_words: usize, config: &HeuristicConfig) -> bool {
    numeric_ratio(text) < config.numeric_ratio_threshold && token_count(text) > min_words
}

pub fn non_empty_lines(text: &str) -> Vec<&str> {
    text.split('\n').filter(|line| !line.trim().is_empty()).collect()
}

/// Build a table from TAB-separated Word text, or `None` when the text should
/// be read as prose.
pub fn word_table(text: &str, config: &HeuristicConfig) -> Option<Table> {
    let lines = non_empty_lines(text);
    let has_tabular_line = lines
        .iter()
        .any(|line| line.split('\t').count() >= config.word_min_tab_fields);
    if !has_tabular_line || lines.len() < config.word_min_lines {
        return None;
    }

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for line in lines {
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        if fields.len() < 2 {
            continue;
        }
        if header.is_none() {
            header = Some(fields.iter().map(|f| f.to_string()).collect());
            continue;
        }
        let names = header.as_deref().unwrap_or_default();
        let row: Row = fields
            .iter()
            .enumerate()
            .filter_map(|(idx, value)| {
                names
                    .get(idx)
                    .filter(|name| !name.is_empty())
                    .map(|name| (name.clone(), value.to_string()))
            })
            .collect();
        if !row.is_empty() {
            rows.push(row);
        }
    }

    if rows.is_empty() {
        None
    } else {
        Some(Table::new(rows))
    }
}

/// Split a PDF text line into columns on runs of spaces or a TAB.
pub fn split_columns(line: &str) -> Vec<String> {
    COLUMN_GAP_RE
        .split(line.trim())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn looks_like_header(fields: &[String]) -> bool {
    let numeric = fields.iter().filter(|f| PURE_NUMBER_RE.is_match(f)).count();
    let textual = fields.len() - numeric;
    textual * 2 > fields.len() || fields.len() > 3
}

/// Line-based table recovery for PDF text. Rows are capped at
/// `pdf_max_rows` and are not normalized.
pub fn pdf_table(text: &str, config: &HeuristicConfig) -> Table {
    let lines = non_empty_lines(text);
    let half = lines.len() as f64 / 2.0;
    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        let fields = split_columns(line);
        if fields.len() < 2 {
            continue;
        }

        if header.is_none() && (index as f64) < half && looks_like_header(&fields) {
            header = Some(fields);
            continue;
        }

        let row: Row = match &header {
            Some(names) if names.len() == fields.len() => {
                names.iter().cloned().zip(fields).collect()
            }
            _ => fields
                .into_iter()
                .enumerate()
                .map(|(idx, value)| (format!("Column {}", idx + 1), value))
                .collect(),
        };
        rows.push(row);
        if rows.len() >= config.pdf_max_rows {
            break;
        }
    }

    Table::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_models::CellValue;

    #[test]
    fn test_numeric_ratio() {
        assert_eq!(numeric_ratio(""), 0.0);
        assert_eq!(numeric_ratio("one two three four"), 0.0);
        assert_eq!(numeric_ratio("sales 10 20"), 2.0 / 3.0);
        // "3.5" holds two digit runs.
        assert_eq!(numeric_ratio("3.5"), 2.0);
    }

    #[test]
    fn test_is_prose() {
        let config = HeuristicConfig::default();
        let prose = "word ".repeat(120);
        assert!(is_prose(&prose, config.pdf_min_words, &config));
        assert!(!is_prose("word ".repeat(80).as_str(), config.pdf_min_words, &config));
        let numbers = "7 ".repeat(200);
        assert!(!is_prose(&numbers, config.pdf_min_words, &config));
    }

    #[test]
    fn test_four_tabbed_lines_are_prose() {
        let text = "a\tb\tc\n1\t2\t3\n4\t5\t6\n7\t8\t9\n";
        assert!(word_table(text, &HeuristicConfig::default()).is_none());
    }

    #[test]
    fn test_word_table_keys_rows_by_header() {
        let text = "Quarterly figures\nRegion\tSales\tUnits\nNorth\t10\t3\nSouth\t20\t4\nEast\t30\n";
        let table = word_table(text, &HeuristicConfig::default()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[0].get("Region"), Some(&CellValue::from("North")));
        assert_eq!(table.rows()[0].get("Sales"), Some(&CellValue::from("10")));
        assert!(!table.rows()[2].contains_key("Units"));
    }

    #[test]
    fn test_word_table_drops_unnamed_positions() {
        let text = "Name\t\tScore\nA\tx\t1\nB\ty\t2\nC\tz\t3\nD\tw\t4\n";
        let table = word_table(text, &HeuristicConfig::default()).unwrap();
        assert_eq!(table.rows()[0].keys().collect::<Vec<_>>(), vec!["Name", "Score"]);
    }

    #[test]
    fn test_split_columns() {
        assert_eq!(split_columns("  Name   Value\tUnit "), vec!["Name", "Value", "Unit"]);
        assert_eq!(split_columns("single words only"), vec!["single words only"]);
    }

    #[test]
    fn test_pdf_table_header_and_generic_rows() {
        let text = "Product   Price   Stock\nWidget   10   5\nGadget   20   7\nTotal   30\n";
        let table = pdf_table(text, &HeuristicConfig::default());

        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[0].get("Product"), Some(&CellValue::from("Widget")));
        assert_eq!(table.rows()[2].get("Column 1"), Some(&CellValue::from("Total")));
    }

    #[test]
    fn test_pdf_numeric_line_is_not_header() {
        let text = "10   20\n30   40\n";
        let table = pdf_table(text, &HeuristicConfig::default());
        assert_eq!(table.len(), 2);
        assert!(table.rows()[0].contains_key("Column 1"));
    }

    #[test]
    fn test_pdf_rows_are_capped() {
        let config = HeuristicConfig {
            pdf_max_rows: 3,
            ..Default::default()
        };
        let text = "a   1\n".repeat(10);
        assert_eq!(pdf_table(&text, &config).len(), 3);
    }
}
