//! Per-column descriptive statistics used to brief the analysis model.

use insight_models::{ColumnStatistics, Table};

/// Statistics for every column holding at least one number, in first-row
/// column order. Non-numeric cells are excluded, not counted as zero.
pub fn summarize(table: &Table) -> Vec<ColumnStatistics> {
    table
        .first_row_columns()
        .into_iter()
        .filter_map(|column| {
            let values = table.numeric_values(&column);
            column_statistics(column, values)
        })
        .collect()
}

pub fn column_statistics(column: String, mut values: Vec<f64>) -> Option<ColumnStatistics> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));

    let count = values.len();
    let sum: f64 = values.iter().sum();
    let mean = sum / count as f64;
    let median = if count % 2 == 0 {
        (values[count / 2 - 1] + values[count / 2]) / 2.0
    } else {
        values[count / 2]
    };
    let min = values[0];
    let max = values[count - 1];
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
    let standard_deviation = variance.sqrt();

    Some(ColumnStatistics {
        column,
        count,
        sum,
        mean,
        median,
        min,
        max,
        range: max - min,
        standard_deviation,
        coefficient_of_variation: standard_deviation / mean * 100.0,
    })
}
