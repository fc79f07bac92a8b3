//! Parsed upload representation.

use crate::dataset::Row;

/// Represents a parsed delimited-text upload.
#[derive(Debug, Clone)]
pub struct ParsedTable {
    /// Column headers in file order.
    pub headers: Vec<String>,
    /// Rows keyed by header, in file order.
    pub rows: Vec<Row>,
    /// The delimiter used.
    pub delimiter: u8,
}

impl ParsedTable {
    /// Create a new parsed table.
    pub fn new(headers: Vec<String>, rows: Vec<Row>, delimiter: u8) -> Self {
        Self {
            headers,
            rows,
            delimiter,
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Short name of the format implied by the delimiter.
    pub fn format(&self) -> &'static str {
        match self.delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
    }

    /// Consume the table, keeping only the rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}
