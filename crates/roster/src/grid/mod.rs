//! Grid editors and the validation summary.
//!
//! Each dataset gets one [`GridEditor`]. Editors watch the shared
//! [`TabularStore`](crate::store::TabularStore), wait for edits to settle,
//! then ask a [`RowValidator`] for errors and forward the count to the
//! [`ValidationSummary`].

mod editor;
mod summary;

use std::sync::Arc;

pub use editor::{
    GridCell, GridConfig, GridEditor, GridView, ValidationReporter, DEFAULT_DEBOUNCE,
};
pub use summary::{SummaryReport, ValidationSummary};

use crate::dataset::Dataset;
use crate::gateway::RowValidator;
use crate::store::TabularStore;

/// One editor per dataset, all reporting into the same summary.
pub struct GridSet {
    editors: [GridEditor; 3],
}

impl GridSet {
    /// Spawn the three editors. Must be called inside a tokio runtime.
    pub fn spawn(
        store: Arc<TabularStore>,
        validator: Arc<dyn RowValidator>,
        config: GridConfig,
        summary: &Arc<ValidationSummary>,
    ) -> Self {
        let editors = Dataset::ALL.map(|dataset| {
            GridEditor::spawn(
                dataset,
                Arc::clone(&store),
                Arc::clone(&validator),
                config.clone(),
                Some(summary.reporter()),
            )
        });
        Self { editors }
    }

    pub fn editor(&self, dataset: Dataset) -> &GridEditor {
        &self.editors[dataset.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridEditor> {
        self.editors.iter()
    }
}
