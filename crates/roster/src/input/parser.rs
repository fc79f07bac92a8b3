//! CSV/TSV parser with delimiter detection.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::dataset::{CellValue, Row};
use crate::error::{Result, RosterError};

use super::source::ParsedTable;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parses uploaded tabular files into rows keyed by header.
///
/// The first record is always the header. Blank lines are skipped, short
/// records are padded with empty text and long records are truncated to the
/// header width. Input with a header and no data yields zero rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a file from disk.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ParsedTable> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|e| RosterError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.parse_bytes(&contents)
    }

    /// Parse text received from an upload.
    pub fn parse_str(&self, text: &str) -> Result<ParsedTable> {
        self.parse_bytes(text.as_bytes())
    }

    /// Parse raw bytes with a detected delimiter.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<ParsedTable> {
        let delimiter = detect_delimiter(bytes);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|s| s.trim_start_matches('\u{feff}').to_string())
            .collect();

        // An empty upload has a single empty header field.
        if headers.iter().all(|h| h.is_empty()) {
            return Ok(ParsedTable::new(Vec::new(), Vec::new(), delimiter));
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row = Row::with_capacity(headers.len());
            for (i, header) in headers.iter().enumerate() {
                // Pad short records
                let value = record.get(i).unwrap_or("");
                row.insert(header.clone(), CellValue::Text(value.to_string()));
            }
            rows.push(row);
        }

        Ok(ParsedTable::new(headers, rows, delimiter))
    }
}

/// Detect the delimiter by analyzing the first few lines. Falls back to comma.
fn detect_delimiter(bytes: &[u8]) -> u8 {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let Some(&first_count) = counts.first() else {
            continue;
        };
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
        let variance = counts
            .iter()
            .map(|&c| (c as f64 - mean).powi(2))
            .sum::<f64>()
            / counts.len() as f64;

        // Higher count with lower variance wins; tab gets a slight bonus
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    best_delimiter
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
