//! Export the edited datasets and the rule set as downloadable files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::dataset::{columns_of, CellValue, Dataset, Row};
use crate::error::{Result, RosterError};
use crate::rules::RuleBook;
use crate::store::TabularStore;

pub const CSV_MIME: &str = "text/csv;charset=utf-8";
pub const JSON_MIME: &str = "application/json";
pub const RULES_FILE_NAME: &str = "rules.json";

/// One file ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub file_name: String,
    pub mime: &'static str,
    pub contents: String,
}

/// Render rows as comma-separated lines.
///
/// The header is the first row's keys joined by `,`. Every value is
/// JSON-encoded: text is quoted and escaped, numbers and booleans stay bare,
/// and null or missing cells become `""`. Lines are joined by `\n`.
pub fn rows_to_delimited(rows: &[Row]) -> Result<String> {
    let headers = columns_of(rows);
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(headers.join(","));

    for row in rows {
        let fields = headers
            .iter()
            .map(|header| encode_field(row.get(header)))
            .collect::<Result<Vec<_>>>()?;
        lines.push(fields.join(","));
    }

    Ok(lines.join("\n"))
}

fn encode_field(value: Option<&CellValue>) -> Result<String> {
    match value {
        None | Some(CellValue::Null) => Ok("\"\"".to_string()),
        Some(value) => Ok(serde_json::to_string(value)?),
    }
}

/// Export for one dataset, or `None` when it has no rows.
pub fn table_export(store: &TabularStore, dataset: Dataset) -> Result<Option<ExportFile>> {
    let rows = store.rows(dataset);
    if rows.is_empty() {
        tracing::debug!(%dataset, "skipping export of empty dataset");
        return Ok(None);
    }

    Ok(Some(ExportFile {
        file_name: format!("{}.csv", dataset),
        mime: CSV_MIME,
        contents: rows_to_delimited(&rows)?,
    }))
}

/// Exports for every non-empty dataset, in clients, workers, tasks order.
pub fn table_exports(store: &TabularStore) -> Result<Vec<ExportFile>> {
    let mut files = Vec::new();
    for dataset in Dataset::ALL {
        if let Some(file) = table_export(store, dataset)? {
            files.push(file);
        }
    }
    Ok(files)
}

/// `rules.json`: rules by ascending priority, pretty-printed.
pub fn rules_export(book: &RuleBook) -> Result<ExportFile> {
    Ok(ExportFile {
        file_name: RULES_FILE_NAME.to_string(),
        mime: JSON_MIME,
        contents: serde_json::to_string_pretty(&book.sorted_by_priority())?,
    })
}

/// Write export files into `dir`, creating it if needed.
pub fn write_exports(files: &[ExportFile], dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| RosterError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = dir.join(&file.file_name);
        fs::write(&path, &file.contents).map_err(|source| RosterError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), "export written");
        written.push(path);
    }
    Ok(written)
}
