//! Turns tables into chart images.
//!
//! Charts are drawn as SVG and returned as `data:` URIs together with the
//! title, description and whether any plotted value is positive.

pub mod svg;

use tracing::{debug, info};

use insight_models::{CellValue, ChartKind, ChartSuggestion, RenderedChart, Row, Table};
use insight_utils::ChartsConfig;

use svg::{Frame, Series};

const DOUGHNUT_HOLE: f64 = 0.5;

pub struct ChartRenderer {
    config: ChartsConfig,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(ChartsConfig::default())
    }
}

impl ChartRenderer {
    pub fn new(config: ChartsConfig) -> Self {
        Self { config }
    }

    fn frame(&self) -> Frame {
        Frame {
            width: self.config.width as f64,
            height: self.config.height as f64,
        }
    }

    /// Render the suggested charts, best first. Charts without data are dropped;
    /// without suggestions the default set is rendered.
    pub fn render_suggestions(&self, table: &Table, suggestions: &[ChartSuggestion]) -> Vec<RenderedChart> {
        if table.is_empty() {
            return Vec::new();
        }
        if suggestions.is_empty() {
            debug!("No chart suggestions, rendering the default set");
            return self.render_default(table);
        }

        let label = table.label_column().unwrap_or_default();
        let numeric = table.numeric_columns();
        let rows = table.len();

        let mut ordered: Vec<&ChartSuggestion> = suggestions.iter().collect();
        ordered.sort_by(|a, b| b.priority.cmp(&a.priority));

        let mut charts = Vec::new();
        for suggestion in ordered {
            let value_column = suggestion
                .columns
                .get(1)
                .or_else(|| suggestion.columns.first())
                .cloned()
                .unwrap_or_default();

            let chart = match suggestion.kind {
                ChartKind::Pie if rows > self.config.max_pie_rows => None,
                ChartKind::Doughnut if rows > self.config.max_doughnut_rows => None,
                ChartKind::MultiColumn | ChartKind::Stacked if numeric.len() < 2 => None,
                ChartKind::MultiColumn | ChartKind::Stacked => {
                    Some(self.multi(suggestion.kind, table, &label, &numeric))
                }
                kind => Some(self.single(kind, table, &label, &value_column)),
            };
            charts.extend(chart);
        }

        let total = charts.len();
        charts.retain(|chart| chart.has_data);
        if charts.len() < total {
            debug!(dropped = total - charts.len(), "Dropped charts without data");
        }
        info!(charts = charts.len(), "Rendered suggested charts");
        charts
    }

    /// Every applicable chart for each numeric column, then the comparisons.
    pub fn render_default(&self, table: &Table) -> Vec<RenderedChart> {
        let numeric = table.numeric_columns();
        if table.is_empty() || numeric.is_empty() {
            return Vec::new();
        }

        let label = table.label_column().unwrap_or_default();
        let rows = table.len();
        let mut charts = Vec::new();

        for column in &numeric {
            charts.push(self.single(ChartKind::Bar, table, &label, column));
            charts.push(self.single(ChartKind::HorizontalBar, table, &label, column));
            if rows > 1 {
                charts.push(self.single(ChartKind::Line, table, &label, column));
            }
            if rows > 2 {
                charts.push(self.single(ChartKind::Area, table, &label, column));
            }
            if rows > 1 && rows <= self.config.max_pie_rows {
                charts.push(self.single(ChartKind::Pie, table, &label, column));
            }
            if rows > 1 && rows <= self.config.max_doughnut_rows {
                charts.push(self.single(ChartKind::Doughnut, table, &label, column));
            }
        }

        if numeric.len() > 1 {
            charts.push(self.multi(ChartKind::MultiColumn, table, &label, &numeric));
            if rows <= self.config.max_stacked_rows {
                charts.push(self.multi(ChartKind::Stacked, table, &label, &numeric));
            }
        }

        info!(charts = charts.len(), "Rendered default charts");
        charts
    }

    /// One chart of `kind` for posted rows. Single-series charts plot
    /// `columns[1]`, `columns[0]` or the first numeric column.
    pub fn render(&self, table: &Table, kind: ChartKind, columns: &[String]) -> Option<RenderedChart> {
        if table.is_empty() {
            return None;
        }
        let label = table.label_column().unwrap_or_default();
        let numeric = table.numeric_columns();

        match kind {
            ChartKind::MultiColumn | ChartKind::Stacked => {
                let selected: Vec<String> = if columns.is_empty() {
                    numeric
                } else {
                    columns.iter().filter(|c| **c != label).cloned().collect()
                };
                (!selected.is_empty()).then(|| self.multi(kind, table, &label, &selected))
            }
            _ => {
                let value = columns
                    .get(1)
                    .or_else(|| columns.first())
                    .or_else(|| numeric.first())?;
                Some(self.single(kind, table, &label, value))
            }
        }
    }

    fn labels(&self, table: &Table, label_column: &str) -> Vec<String> {
        table
            .rows()
            .iter()
            .enumerate()
            .map(|(idx, row)| row_label(row, label_column, idx, self.config.max_label_chars))
            .collect()
    }

    fn single(&self, kind: ChartKind, table: &Table, label: &str, column: &str) -> RenderedChart {
        let labels = self.labels(table, label);
        let values = plotted_values(table, column);
        let has_data = values.iter().any(|v| *v > 0.0);
        let series = [Series {
            name: column.to_string(),
            values: values.clone(),
        }];
        let frame = self.frame();

        let (title, description) = match kind {
            ChartKind::HorizontalBar => (
                format!("Horizontal bar chart: {}", column),
                format!("Compares {} side by side, easy to read with many items", column),
            ),
            ChartKind::Line => (
                format!("Line chart: {}", column),
                format!("Shows the trend of {}", column),
            ),
            ChartKind::Area => (
                format!("Area chart: {}", column),
                format!("Shows the trend and volume of {} over time", column),
            ),
            ChartKind::Pie => (
                format!("Pie chart: {}", column),
                format!("Shows the share of each item in {}", column),
            ),
            ChartKind::Doughnut => (
                format!("Doughnut chart: {}", column),
                format!("Shows the percentage split of {}", column),
            ),
            _ => (
                format!("Bar chart: {}", column),
                format!("Bar chart of {} by {}", column, label),
            ),
        };

        let image = match kind {
            ChartKind::HorizontalBar => svg::bars(frame, &title, &labels, &series, true, false),
            ChartKind::Line => svg::lines(frame, &title, &labels, &series, false),
            ChartKind::Area => svg::lines(frame, &title, &labels, &series, true),
            ChartKind::Pie => svg::pie(frame, &title, &labels, &values, 0.0),
            ChartKind::Doughnut => svg::pie(frame, &title, &labels, &values, DOUGHNUT_HOLE),
            _ => svg::bars(frame, &title, &labels, &series, false, false),
        };

        RenderedChart {
            kind,
            title,
            description,
            image: svg::data_uri(&image),
            has_data,
        }
    }

    fn multi(&self, kind: ChartKind, table: &Table, label: &str, columns: &[String]) -> RenderedChart {
        let labels = self.labels(table, label);
        let series: Vec<Series> = columns
            .iter()
            .map(|column| Series {
                name: column.clone(),
                values: plotted_values(table, column),
            })
            .collect();
        let has_data = series.iter().any(|s| s.values.iter().any(|v| *v > 0.0));
        let stacked = kind == ChartKind::Stacked;

        let (title, description) = if stacked {
            (
                "Stacked bar chart".to_string(),
                format!("Shows the totals and shares of {}", columns.join(", ")),
            )
        } else {
            (
                "Multi-metric comparison".to_string(),
                format!("Compares {} at once", columns.join(", ")),
            )
        };
        let image = svg::bars(self.frame(), &title, &labels, &series, false, stacked);

        RenderedChart {
            kind: if stacked { ChartKind::Stacked } else { ChartKind::MultiColumn },
            title,
            description,
            image: svg::data_uri(&image),
            has_data,
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// The label cell, else the row's first non-blank text, else `Item n`.
fn row_label(row: &Row, label_column: &str, idx: usize, max_chars: usize) -> String {
    let own = row
        .get(label_column)
        .map(CellValue::to_string)
        .filter(|label| !label.is_empty());
    if let Some(label) = own {
        return truncate(&label, max_chars);
    }

    row.values()
        .filter_map(CellValue::as_text)
        .find(|text| !text.trim().is_empty())
        .map(|text| truncate(text, max_chars))
        .unwrap_or_else(|| format!("Item {}", idx + 1))
}

/// Numbers as-is; anything else plots as zero.
fn plotted_values(table: &Table, column: &str) -> Vec<f64> {
    table
        .rows()
        .iter()
        .map(|row| {
            row.get(column)
                .and_then(CellValue::as_number)
                .filter(|v| v.is_finite())
                .unwrap_or(0.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: usize, columns: &[&str]) -> Table {
        Table::new(
            (0..rows)
                .map(|i| {
                    let mut row = Row::new().with("Name", format!("Item {}", i));
                    for (c, column) in columns.iter().enumerate() {
                        row.insert(*column, (i + c + 1) as f64);
                    }
                    row
                })
                .collect(),
        )
    }

    fn kinds(charts: &[RenderedChart]) -> Vec<ChartKind> {
        charts.iter().map(|c| c.kind).collect()
    }

    fn suggestion(kind: ChartKind, columns: &[&str], priority: i32) -> ChartSuggestion {
        ChartSuggestion {
            kind,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            reason: String::new(),
            priority,
        }
    }

    #[test]
    fn test_default_set_for_small_table() {
        let charts = ChartRenderer::default().render_default(&table(3, &["Sales", "Cost"]));
        let per_column = vec![
            ChartKind::Bar,
            ChartKind::HorizontalBar,
            ChartKind::Line,
            ChartKind::Area,
            ChartKind::Pie,
            ChartKind::Doughnut,
        ];
        let mut expected = per_column.clone();
        expected.extend(per_column);
        expected.extend([ChartKind::MultiColumn, ChartKind::Stacked]);
        assert_eq!(kinds(&charts), expected);
        assert!(charts.iter().all(|c| c.image.starts_with("data:image/svg+xml;base64,")));
    }

    #[test]
    fn test_default_set_respects_row_limits() {
        let charts = ChartRenderer::default().render_default(&table(20, &["Sales", "Cost"]));
        let rendered = kinds(&charts);
        assert!(!rendered.contains(&ChartKind::Pie));
        assert!(!rendered.contains(&ChartKind::Doughnut));
        assert!(!rendered.contains(&ChartKind::Stacked));
        assert!(rendered.contains(&ChartKind::MultiColumn));

        let single = ChartRenderer::default().render_default(&table(1, &["Sales"]));
        assert_eq!(kinds(&single), vec![ChartKind::Bar, ChartKind::HorizontalBar]);
    }

    #[test]
    fn test_suggestions_sorted_and_filtered() {
        let renderer = ChartRenderer::default();
        let data = table(9, &["Sales"]);
        let charts = renderer.render_suggestions(
            &data,
            &[
                suggestion(ChartKind::Line, &["Name", "Sales"], 3),
                suggestion(ChartKind::Doughnut, &["Name", "Sales"], 9),
                suggestion(ChartKind::Pie, &["Name", "Sales"], 8),
                suggestion(ChartKind::Stacked, &["Sales"], 7),
                suggestion(ChartKind::Bar, &["Name", "Missing"], 10),
            ],
        );
        // doughnut needs <= 8 rows, stacked needs two numeric columns,
        // the missing column plots nothing
        assert_eq!(kinds(&charts), vec![ChartKind::Pie, ChartKind::Line]);
        assert_eq!(charts[0].title, "Pie chart: Sales");
    }

    #[test]
    fn test_no_suggestions_renders_default() {
        let data = table(2, &["Sales"]);
        let renderer = ChartRenderer::default();
        assert_eq!(
            kinds(&renderer.render_suggestions(&data, &[])),
            kinds(&renderer.render_default(&data))
        );
    }

    #[test]
    fn test_labels_fall_back() {
        let row = Row::new().with("Name", "").with("Region", "North").with("Sales", 1.0);
        assert_eq!(row_label(&row, "Name", 0, 50), "North");

        let bare = Row::new().with("Sales", 1.0);
        assert_eq!(row_label(&bare, "Name", 2, 50), "Item 3");

        let long = Row::new().with("Name", "x".repeat(80));
        assert_eq!(row_label(&long, "Name", 0, 50).len(), 50);

        let year = Row::new().with("Year", 2024.0);
        assert_eq!(row_label(&year, "Year", 0, 50), "2024");
    }

    #[test]
    fn test_non_numeric_values_plot_as_zero() {
        let data = Table::new(vec![
            Row::new().with("Name", "A").with("Sales", "n/a"),
            Row::new().with("Name", "B").with("Sales", CellValue::Null),
        ]);
        assert_eq!(plotted_values(&data, "Sales"), vec![0.0, 0.0]);

        let chart = ChartRenderer::default()
            .render(&data, ChartKind::Bar, &["Name".to_string(), "Sales".to_string()])
            .unwrap();
        assert!(!chart.has_data);
    }

    #[test]
    fn test_render_single_chart() {
        let data = table(4, &["Sales", "Cost"]);
        let renderer = ChartRenderer::default();

        let area = renderer.render(&data, ChartKind::Area, &[]).unwrap();
        assert_eq!(area.title, "Area chart: Sales");
        assert!(area.has_data);

        let stacked = renderer.render(&data, ChartKind::Stacked, &[]).unwrap();
        assert_eq!(stacked.kind, ChartKind::Stacked);
        assert_eq!(stacked.description, "Shows the totals and shares of Sales, Cost");

        assert!(renderer.render(&Table::default(), ChartKind::Bar, &[]).is_none());
    }
}
