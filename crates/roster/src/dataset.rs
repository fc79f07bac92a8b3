//! Dataset keys, cell values and rows.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::RosterError;

/// One of the three uploadable tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Clients,
    Workers,
    Tasks,
}

impl Dataset {
    /// All datasets in display and export order.
    pub const ALL: [Dataset; 3] = [Dataset::Clients, Dataset::Workers, Dataset::Tasks];

    /// Wire name of the dataset.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Clients => "clients",
            Dataset::Workers => "workers",
            Dataset::Tasks => "tasks",
        }
    }

    /// Position in [`Dataset::ALL`].
    pub(crate) fn index(&self) -> usize {
        match self {
            Dataset::Clients => 0,
            Dataset::Workers => 1,
            Dataset::Tasks => 2,
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clients" => Ok(Dataset::Clients),
            "workers" => Ok(Dataset::Workers),
            "tasks" => Ok(Dataset::Tasks),
            _ => Err(RosterError::UnknownDataset(s.to_string())),
        }
    }
}

/// A scalar cell value.
///
/// Uploaded files only ever produce [`CellValue::Text`]; the other variants
/// exist so rows posted as JSON keep their types through editing and export.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl CellValue {
    /// Whether the cell holds no value.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text shown in an editable cell. Null renders as an empty string.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n.into())
    }
}

/// One data row keyed by column name, in header order.
pub type Row = IndexMap<String, CellValue>;

/// Column names of a dataset: the first row's keys.
pub fn columns_of(rows: &[Row]) -> Vec<String> {
    rows.first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default()
}
