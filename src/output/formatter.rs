//! Formatting interface and plain text table rendering

use crate::models::{AddReport, CandidateList, TargetSettings};
use crate::probe::ProbeReport;
use std::path::Path;

/// Renders command results for the terminal
pub trait OutputFormatter {
    fn format_header(&self, title: &str) -> String;

    /// Outcome of `url add`
    fn format_add_report(&self, report: &AddReport) -> String;

    /// Outcome of `url rm`
    fn format_removed(&self, url: &str, removed: bool) -> String;

    /// Outcome of `url clear`
    fn format_cleared(&self, count: usize) -> String;

    /// Numbered candidate list, marking the active URL
    fn format_url_list(&self, list: &CandidateList, active: Option<&str>) -> String;

    /// Overview printed by `config list`
    fn format_settings_overview(
        &self,
        settings: &TargetSettings,
        list: &CandidateList,
        settings_path: &Path,
    ) -> String;

    /// Ranked probe results as a table
    fn format_probe_table(&self, report: &ProbeReport) -> String;

    fn format_error(&self, error: &str) -> String;

    fn format_warning(&self, warning: &str) -> String;

    fn format_success(&self, message: &str) -> String;

    fn format_info(&self, message: &str) -> String;

    /// De-emphasized hint line
    fn format_hint(&self, message: &str) -> String;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    pub enable_color: bool,
    pub verbose_mode: bool,
    pub table_borders: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub alignment: Alignment,
}

impl Column {
    pub fn new(header: &str, alignment: Alignment) -> Self {
        Self {
            header: header.to_string(),
            alignment,
        }
    }
}

/// Row data for table formatting
pub type RowData = Vec<String>;

/// Table layout: column definitions plus border settings
#[derive(Debug, Clone)]
pub struct TableFormat {
    pub columns: Vec<Column>,
    pub show_borders: bool,
}

impl TableFormat {
    pub fn new(columns: Vec<Column>, options: &FormattingOptions) -> Self {
        Self {
            columns,
            show_borders: options.table_borders,
        }
    }

    /// Render the table.
    ///
    /// `style` receives `(row, column, padded cell)` and may wrap the cell in
    /// escape codes; widths are computed on the plain text and cells are never
    /// truncated. The header row is passed as `None`.
    pub fn render<F>(&self, rows: &[RowData], style: F) -> String
    where
        F: Fn(Option<usize>, usize, String) -> String,
    {
        let widths = self.column_widths(rows);
        let mut lines = Vec::with_capacity(rows.len() + 4);

        if self.show_borders {
            lines.push(horizontal_border(&widths));
        }

        let headers: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        lines.push(self.render_row(&headers, &widths, |col, cell| style(None, col, cell)));

        if self.show_borders {
            lines.push(horizontal_border(&widths));
        }

        for (row_idx, row) in rows.iter().enumerate() {
            lines.push(self.render_row(row, &widths, |col, cell| style(Some(row_idx), col, cell)));
        }

        if self.show_borders {
            lines.push(horizontal_border(&widths));
        }

        lines.join("\n")
    }

    fn column_widths(&self, rows: &[RowData]) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let content = rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0);
                column.header.chars().count().max(content)
            })
            .collect()
    }

    fn render_row<F>(&self, cells: &[String], widths: &[usize], style: F) -> String
    where
        F: Fn(usize, String) -> String,
    {
        let mut row = String::new();
        if self.show_borders {
            row.push('|');
        }

        for (idx, &width) in widths.iter().enumerate() {
            let cell = cells.get(idx).map(String::as_str).unwrap_or("");
            let alignment = self.columns[idx].alignment;
            let padded = style(idx, align_text(cell, width, alignment));

            if self.show_borders {
                row.push(' ');
                row.push_str(&padded);
                row.push_str(" |");
            } else {
                row.push_str(&padded);
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }
}

fn horizontal_border(widths: &[usize]) -> String {
    let mut border = String::from("+");
    for &width in widths {
        border.push_str(&"-".repeat(width + 2));
        border.push('+');
    }
    border
}

/// Pad text to the given width; longer text is returned whole
pub fn align_text(text: &str, width: usize, alignment: Alignment) -> String {
    let padding = " ".repeat(width.saturating_sub(text.chars().count()));
    match alignment {
        Alignment::Left => format!("{}{}", text, padding),
        Alignment::Right => format!("{}{}", padding, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(borders: bool) -> TableFormat {
        let options = FormattingOptions {
            table_borders: borders,
            ..Default::default()
        };
        TableFormat::new(
            vec![Column::new("URL", Alignment::Left), Column::new("Latency", Alignment::Right)],
            &options,
        )
    }

    #[test]
    fn test_align_text() {
        assert_eq!(align_text("ab", 4, Alignment::Left), "ab  ");
        assert_eq!(align_text("ab", 4, Alignment::Right), "  ab");
        assert_eq!(align_text("abcdef", 3, Alignment::Left), "abcdef");
    }

    #[test]
    fn test_bordered_table() {
        let rows = vec![
            vec!["a.com".to_string(), "12ms".to_string()],
            vec!["bb.com".to_string(), "unreachable".to_string()],
        ];

        let rendered = table(true).render(&rows, |_, _, cell| cell);
        let expected = [
            "+--------+-------------+",
            "| URL    |     Latency |",
            "+--------+-------------+",
            "| a.com  |        12ms |",
            "| bb.com | unreachable |",
            "+--------+-------------+",
        ]
        .join("\n");
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_long_cells_are_not_truncated() {
        let long_url = format!("https://{}.example.com/v1", "a".repeat(90));
        let rows = vec![vec![long_url.clone(), "7ms".to_string()]];

        let rendered = table(true).render(&rows, |_, _, cell| cell);
        assert!(rendered.contains(&long_url));
    }

    #[test]
    fn test_borderless_table_trims_trailing_space() {
        let rows = vec![vec!["a.com".to_string(), "5ms".to_string()]];
        let rendered = table(false).render(&rows, |_, _, cell| cell);
        assert_eq!(rendered, "URL    Latency\na.com      5ms");
    }

    #[test]
    fn test_style_sees_header_and_rows() {
        let rows = vec![vec!["a".to_string(), "1".to_string()]];
        let rendered = table(false).render(&rows, |row, col, cell| match (row, col) {
            (None, _) => cell.to_uppercase(),
            (Some(0), 0) => format!("<{}>", cell.trim_end()),
            _ => cell,
        });
        assert!(rendered.starts_with("URL"));
        assert!(rendered.contains("<a>"));
    }
}
