//! Last-resort tables for documents without recognizable structure.

use std::sync::LazyLock;

use insight_models::{Row, Table};
use regex::Regex;

use super::heuristics::HeuristicConfig;

static NUMBER_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("hardcoded regex pattern"));

static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n\r]+").expect("hardcoded regex pattern"));

const PLACEHOLDER_VALUES: [i64; 5] = [100, 150, 120, 180, 200];

/// One row per distinct number found in the text, or one row per line when
/// the text holds no numbers at all.
pub fn simple_data(text: &str, config: &HeuristicConfig) -> Table {
    let mut seen: Vec<&str> = Vec::new();
    for token in NUMBER_TOKEN_RE.find_iter(text).map(|m| m.as_str()) {
        if !seen.contains(&token) {
            seen.push(token);
        }
    }

    if !seen.is_empty() {
        let rows = seen
            .into_iter()
            .filter_map(|token| token.parse::<f64>().ok())
            .take(config.fallback_max_numbers)
            .enumerate()
            .map(|(idx, value)| {
                Row::new()
                    .with("Category", format!("Category {}", idx + 1))
                    .with("Value", value)
                    .with("Percentage", value % 100.0)
            })
            .collect();
        return Table::new(rows);
    }

    let rows = LINE_BREAK_RE
        .split(text)
        .filter(|line| !line.trim().is_empty())
        .take(config.fallback_max_lines)
        .enumerate()
        .map(|(idx, line)| {
            Row::new()
                .with("Section", format!("Section {}", idx + 1))
                .with("Words", line.split_whitespace().count())
                .with("Characters", line.chars().count())
                .with("Index", idx + 1)
        })
        .collect();
    Table::new(rows)
}

/// Fixed five-row table used when a presentation or PDF cannot be read.
/// `label` names the first column and prefixes each row label.
pub fn placeholder(label: &str) -> Table {
    let rows = PLACEHOLDER_VALUES
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            Row::new()
                .with(label, format!("{} {}", label, idx + 1))
                .with("Value", *value)
        })
        .collect();
    Table::new(rows)
}
