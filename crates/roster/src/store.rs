//! In-memory tabular store.
//!
//! Each dataset lives in its own [`watch`] channel. Every write goes through
//! [`TabularStore::update`], which runs under the channel's write lock, so
//! two edits to the same dataset are applied one after the other and neither
//! is lost. Readers either take a [`Snapshot`] or subscribe for a live view
//! that wakes on every replacement.

use std::sync::Arc;

use tokio::sync::watch;

use crate::dataset::{columns_of, CellValue, Dataset, Row};
use crate::error::{Result, RosterError};

/// Immutable view of one dataset at a point in time.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Incremented on every successful write. Starts at 0.
    pub revision: u64,
    /// The rows, shared with other readers.
    pub rows: Arc<Vec<Row>>,
}

impl Snapshot {
    /// Display columns: the first row's keys.
    pub fn columns(&self) -> Vec<String> {
        columns_of(&self.rows)
    }

    /// Whether the dataset holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Live view of a dataset.
pub type DatasetWatch = watch::Receiver<Snapshot>;

/// Single source of truth for uploaded and edited rows.
#[derive(Debug)]
pub struct TabularStore {
    slots: [watch::Sender<Snapshot>; 3],
}

impl TabularStore {
    /// Create a store with all three datasets empty.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| watch::Sender::new(Snapshot::default())),
        }
    }

    fn slot(&self, dataset: Dataset) -> &watch::Sender<Snapshot> {
        &self.slots[dataset.index()]
    }

    /// Current contents of a dataset.
    pub fn snapshot(&self, dataset: Dataset) -> Snapshot {
        self.slot(dataset).borrow().clone()
    }

    /// Current rows of a dataset.
    pub fn rows(&self, dataset: Dataset) -> Arc<Vec<Row>> {
        Arc::clone(&self.slot(dataset).borrow().rows)
    }

    /// Subscribe to every future replacement of a dataset.
    pub fn subscribe(&self, dataset: Dataset) -> DatasetWatch {
        self.slot(dataset).subscribe()
    }

    /// Replace the whole row sequence of a dataset. Returns the new revision.
    pub fn set_file_data(&self, dataset: Dataset, rows: Vec<Row>) -> u64 {
        let row_count = rows.len();
        let revision = self
            .update(dataset, move |current| {
                *current = rows;
                Ok(())
            })
            .unwrap_or_default();
        tracing::debug!(%dataset, row_count, revision, "dataset replaced");
        revision
    }

    /// Apply `edit` to a copy of the dataset and publish the result.
    ///
    /// Writes to one dataset are serialized. If `edit` fails, nothing is
    /// published and the revision does not change.
    pub fn update<F>(&self, dataset: Dataset, edit: F) -> Result<u64>
    where
        F: FnOnce(&mut Vec<Row>) -> Result<()>,
    {
        let mut outcome = Ok(0);
        self.slot(dataset).send_if_modified(|snapshot| {
            let mut rows = Vec::clone(&snapshot.rows);
            match edit(&mut rows) {
                Ok(()) => {
                    snapshot.revision += 1;
                    snapshot.rows = Arc::new(rows);
                    outcome = Ok(snapshot.revision);
                    true
                }
                Err(e) => {
                    outcome = Err(e);
                    false
                }
            }
        });
        outcome
    }

    /// Set one cell by rebuilding its row and replacing the dataset.
    ///
    /// The column must belong to the dataset's header (the first row's keys).
    pub fn set_cell(
        &self,
        dataset: Dataset,
        row: usize,
        column: &str,
        value: CellValue,
    ) -> Result<u64> {
        self.update(dataset, |rows| {
            let len = rows.len();
            if !rows.first().is_some_and(|first| first.contains_key(column)) {
                return Err(RosterError::UnknownColumn {
                    dataset,
                    column: column.to_string(),
                });
            }
            let target = rows
                .get_mut(row)
                .ok_or(RosterError::RowOutOfRange { dataset, row, len })?;
            target.insert(column.to_string(), value);
            Ok(())
        })
    }
}

impl Default for TabularStore {
    fn default() -> Self {
        Self::new()
    }
}
