//! # ASCII Table Formatter
//!
//! Renders documents as ASCII tables in a MySQL-style layout.
//!
//! ## Output Format
//!
//! ```text
//! +-----+-------+------+
//! | _id | email | team |
//! +-----+-------+------+
//! | 1   | a@x   | blue |
//! | 2   | b@x   | NULL |
//! +-----+-------+------+
//! ```
//!
//! ## Headers
//!
//! Documents of one store need not share attributes, so the header row is the
//! union of every document's keys, sorted, with the row identifier column
//! first when present. A document without a given attribute shows `NULL`.
//!
//! ## Column Width Calculation
//!
//! Column widths are the maximum of the header length and the longest value
//! in that column, counted in characters and capped at 50 (longer values are
//! truncated with "...").

use crate::config::ROW_ID_COLUMN;
use crate::types::Document;
use std::collections::BTreeSet;
use std::fmt::Write;

const MAX_COLUMN_WIDTH: usize = 50;
const NULL_DISPLAY: &str = "NULL";

pub struct TableFormatter {
    headers: Vec<String>,
    widths: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl TableFormatter {
    pub fn new(headers: Vec<String>, rows: &[Document]) -> Self {
        let mut widths: Vec<usize> = headers
            .iter()
            .map(|h| display_width(h).clamp(1, MAX_COLUMN_WIDTH))
            .collect();

        let formatted_rows: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| {
                        let formatted = row
                            .get(header)
                            .cloned()
                            .unwrap_or_else(|| NULL_DISPLAY.to_string());
                        widths[i] = widths[i].max(display_width(&formatted)).min(MAX_COLUMN_WIDTH);
                        formatted
                    })
                    .collect()
            })
            .collect();

        Self {
            headers,
            widths,
            rows: formatted_rows,
        }
    }

    /// Builds a formatter whose headers are the union of the documents' keys.
    pub fn from_documents(rows: &[Document]) -> Self {
        Self::new(union_headers(rows), rows)
    }

    pub fn render(&self) -> String {
        let mut output = String::new();

        self.write_separator(&mut output);
        self.write_row(&mut output, &self.headers);
        self.write_separator(&mut output);

        for row in &self.rows {
            self.write_row(&mut output, row);
        }

        self.write_separator(&mut output);

        output
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    fn write_separator(&self, output: &mut String) {
        output.push('+');
        for width in &self.widths {
            output.push_str(&"-".repeat(width + 2));
            output.push('+');
        }
        output.push('\n');
    }

    fn write_row(&self, output: &mut String, cells: &[String]) {
        output.push('|');
        for (i, cell) in cells.iter().enumerate() {
            let width = self.widths.get(i).copied().unwrap_or(1);
            let truncated = truncate(cell, width);
            let padding = width.saturating_sub(display_width(&truncated));
            let _ = write!(output, " {}{} |", truncated, " ".repeat(padding));
        }
        output.push('\n');
    }
}

fn union_headers(rows: &[Document]) -> Vec<String> {
    let keys: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();

    let mut headers = Vec::with_capacity(keys.len());
    if keys.contains(ROW_ID_COLUMN) {
        headers.push(ROW_ID_COLUMN.to_string());
    }
    headers.extend(
        keys.into_iter()
            .filter(|k| *k != ROW_ID_COLUMN)
            .map(String::from),
    );
    headers
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}

fn truncate(s: &str, max_len: usize) -> String {
    if display_width(s) <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let mut result: String = s.chars().take(max_len - 3).collect();
        result.push_str("...");
        result
    }
}
