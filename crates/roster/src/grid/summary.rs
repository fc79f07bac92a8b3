//! Per-dataset error counts for the summary panel.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::dataset::Dataset;

use super::editor::ValidationReporter;

/// Error counts as shown in the summary panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
    pub clients: usize,
    pub workers: usize,
    pub tasks: usize,
    pub total: usize,
}

/// Latest error count reported by each dataset's editor.
///
/// Counts start at zero and are replaced on every applied validation.
#[derive(Debug, Default)]
pub struct ValidationSummary {
    counts: Mutex<[usize; 3]>,
}

impl ValidationSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, dataset: Dataset, count: usize) {
        self.counts()[dataset.index()] = count;
        tracing::debug!(%dataset, count, "summary updated");
    }

    pub fn count(&self, dataset: Dataset) -> usize {
        self.counts()[dataset.index()]
    }

    pub fn total(&self) -> usize {
        self.counts().iter().sum()
    }

    pub fn report(&self) -> SummaryReport {
        let counts = *self.counts();
        SummaryReport {
            clients: counts[Dataset::Clients.index()],
            workers: counts[Dataset::Workers.index()],
            tasks: counts[Dataset::Tasks.index()],
            total: counts.iter().sum(),
        }
    }

    /// A reporter callback feeding this summary.
    pub fn reporter(self: &Arc<Self>) -> ValidationReporter {
        let summary = Arc::clone(self);
        Arc::new(move |dataset, count| summary.record(dataset, count))
    }

    fn counts(&self) -> MutexGuard<'_, [usize; 3]> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
