//! First-sheet reader for Excel workbooks.

use std::io::Cursor;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto_from_rs, DataType, Reader};
use insight_models::{CellValue, Row, Table};

const EMPTY_HEADER: &str = "__EMPTY";

/// Rows of the first worksheet keyed by its header row. Values are not
/// normalized.
pub fn read_first_sheet(bytes: &[u8]) -> Result<Table> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).context("Failed to open workbook")?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("No sheets found in workbook")?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .context("Failed to read worksheet")?
        .with_context(|| format!("Failed to parse worksheet {}", sheet_name))?;

    let mut rows_iter = range.rows();
    let Some(header_row) = rows_iter.next() else {
        return Ok(Table::default());
    };
    let headers = header_names(header_row);

    let rows = rows_iter
        .map(|cells| {
            headers
                .iter()
                .zip(cells.iter())
                .filter_map(|(name, cell)| cell_value(cell).map(|value| (name.clone(), value)))
                .collect::<Row>()
        })
        .filter(|row| !row.is_empty())
        .collect();

    Ok(Table::new(rows))
}

/// Header cell texts with blanks named `__EMPTY`, `__EMPTY_1`, ... and
/// duplicates suffixed `_1`, `_2`, ...
pub fn header_names(cells: &[DataType]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(cells.len());
    for cell in cells {
        let raw = match cell {
            DataType::Empty => String::new(),
            other => other.to_string().trim().to_string(),
        };
        let base = if raw.is_empty() {
            EMPTY_HEADER.to_string()
        } else {
            raw
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while names.contains(&candidate) {
            candidate = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        names.push(candidate);
    }
    names
}

fn cell_value(cell: &DataType) -> Option<CellValue> {
    match cell {
        DataType::Empty => None,
        DataType::String(s) if s.is_empty() => None,
        DataType::String(s) => Some(CellValue::Text(s.clone())),
        DataType::Int(i) => Some(CellValue::Number(*i as f64)),
        DataType::Float(f) => Some(CellValue::Number(*f)),
        DataType::Bool(b) => Some(CellValue::Text(b.to_string())),
        // Serial date numbers are kept as-is.
        DataType::DateTime(serial) => Some(CellValue::Number(*serial)),
        DataType::Error(e) => Some(CellValue::Text(e.to_string())),
        other => Some(CellValue::Text(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_names() {
        let cells = vec![
            DataType::String("Name".to_string()),
            DataType::Empty,
            DataType::String("Name".to_string()),
            DataType::String(" ".to_string()),
            DataType::Float(2024.0),
        ];
        assert_eq!(
            header_names(&cells),
            vec!["Name", "__EMPTY", "Name_1", "__EMPTY_1", "2024"]
        );
    }

    #[test]
    fn test_cell_values() {
        assert_eq!(cell_value(&DataType::Empty), None);
        assert_eq!(cell_value(&DataType::String(String::new())), None);
        assert_eq!(cell_value(&DataType::Int(3)), Some(CellValue::Number(3.0)));
        assert_eq!(
            cell_value(&DataType::Bool(true)),
            Some(CellValue::Text("true".to_string()))
        );
        assert_eq!(
            cell_value(&DataType::DateTime(45000.5)),
            Some(CellValue::Number(45000.5))
        );
    }

    #[test]
    fn test_invalid_workbook_is_an_error() {
        assert!(read_first_sheet(b"definitely not a workbook").is_err());
    }
}
