use serde::{Deserialize, Serialize};

use crate::cell::{CellValue, Row};

/// Ordered sequence of rows extracted from one uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names of the first row, in order.
    pub fn first_row_columns(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| row.keys().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Union of all column names in first-seen order.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for row in &self.rows {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.to_string());
                }
            }
        }
        columns
    }

    /// Columns whose first-row value is numeric.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.rows
            .first()
            .map(|row| {
                row.iter()
                    .filter(|(_, v)| v.is_number())
                    .map(|(k, _)| k.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First column whose first-row value is text, else the first column.
    pub fn label_column(&self) -> Option<String> {
        let first = self.rows.first()?;
        first
            .iter()
            .find(|(_, v)| v.is_text())
            .or_else(|| first.iter().next())
            .map(|(k, _)| k.to_string())
    }

    /// Numeric values of a column, skipping cells that are not numbers.
    pub fn numeric_values(&self, column: &str) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| row.get(column).and_then(CellValue::as_number))
            .collect()
    }

    /// True when `column` holds a number in every row.
    pub fn is_fully_numeric(&self, column: &str) -> bool {
        !self.rows.is_empty()
            && self
                .rows
                .iter()
                .all(|row| row.get(column).map(CellValue::is_number).unwrap_or(false))
    }
}

impl From<Vec<Row>> for Table {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}
