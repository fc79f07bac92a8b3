//! Editable view over one dataset with debounced validation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

use crate::dataset::{CellValue, Dataset, Row};
use crate::error::{Result, RosterError};
use crate::gateway::{RowValidator, ValidationError};
use crate::store::{DatasetWatch, TabularStore};

/// Default quiet period before a changed dataset is validated.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Callback receiving the error count of each applied validation.
pub type ValidationReporter = Arc<dyn Fn(Dataset, usize) + Send + Sync>;

/// Grid editor configuration.
#[derive(Debug, Clone)]
pub struct GridConfig {
    /// Quiet period after the last change before validation runs.
    pub debounce: Duration,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// One rendered cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A rendered dataset: rows × columns plus validation state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridView {
    pub dataset: Dataset,
    pub revision: u64,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<GridCell>>,
    pub errors: Vec<ValidationError>,
    pub loading: bool,
}

#[derive(Debug, Default)]
struct DisplayState {
    errors: Vec<ValidationError>,
    in_flight: usize,
    applied_seq: u64,
}

/// State shared between the editor, its watcher task and in-flight calls.
struct Shared {
    dataset: Dataset,
    validator: Arc<dyn RowValidator>,
    reporter: Option<ValidationReporter>,
    state: Mutex<DisplayState>,
    issued: AtomicU64,
}

impl Shared {
    fn new(
        dataset: Dataset,
        validator: Arc<dyn RowValidator>,
        reporter: Option<ValidationReporter>,
    ) -> Self {
        Self {
            dataset,
            validator,
            reporter,
            state: Mutex::new(DisplayState::default()),
            issued: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, DisplayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start one validation call. In-flight calls are never cancelled.
    fn dispatch(self: &Arc<Self>, rows: Arc<Vec<Row>>) -> JoinHandle<()> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state().in_flight += 1;
        tracing::debug!(dataset = %self.dataset, seq, rows = rows.len(), "validation dispatched");

        let shared = Arc::clone(self);
        tokio::spawn(async move {
            let validator = Arc::clone(&shared.validator);
            let dataset = shared.dataset;
            let outcome =
                match tokio::task::spawn_blocking(move || validator.validate(dataset, &rows)).await {
                    Ok(result) => result,
                    Err(e) => Err(RosterError::Provider(format!("validation task failed: {}", e))),
                };
            shared.apply(seq, outcome);
        })
    }

    /// Apply a finished call unless a newer one has already landed.
    ///
    /// Failures clear the error list and report zero errors.
    fn apply(&self, seq: u64, outcome: Result<Vec<ValidationError>>) {
        let count = {
            let mut state = self.state();
            state.in_flight = state.in_flight.saturating_sub(1);
            if seq < state.applied_seq {
                tracing::debug!(dataset = %self.dataset, seq, "discarding stale validation response");
                return;
            }
            state.applied_seq = seq;
            match outcome {
                Ok(errors) => state.errors = errors,
                Err(e) => {
                    tracing::warn!(dataset = %self.dataset, error = %e, "validation failed");
                    state.errors.clear();
                }
            }
            state.errors.len()
        };

        self.report(count);
    }

    /// Drop the displayed errors of a dataset that has become empty.
    ///
    /// Calls still in flight are outranked, so their replies are discarded.
    fn clear(&self) {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state();
            state.applied_seq = seq;
            state.errors.clear();
        }
        tracing::debug!(dataset = %self.dataset, seq, "dataset emptied; errors cleared");
        self.report(0);
    }

    fn report(&self, count: usize) {
        if let Some(report) = &self.reporter {
            report(self.dataset, count);
        }
    }
}

enum Wake {
    Changed { open: bool },
    Elapsed,
}

/// Restart the debounce timer on every change; validate when it runs out.
async fn watch_dataset(shared: Arc<Shared>, mut rx: DatasetWatch, debounce: Duration) {
    let mut pending = !rx.borrow_and_update().is_empty();

    loop {
        let wake = if pending {
            tokio::select! {
                changed = rx.changed() => Wake::Changed { open: changed.is_ok() },
                () = tokio::time::sleep(debounce) => Wake::Elapsed,
            }
        } else {
            Wake::Changed {
                open: rx.changed().await.is_ok(),
            }
        };

        match wake {
            Wake::Changed { open: false } => break,
            Wake::Changed { open: true } => {
                pending = !rx.borrow_and_update().is_empty();
                // Emptied: no timer, no stale errors
                if !pending {
                    shared.clear();
                }
            }
            Wake::Elapsed => {
                pending = false;
                let rows = Arc::clone(&rx.borrow().rows);
                shared.dispatch(rows);
            }
        }
    }
}

/// Editable grid over one dataset.
///
/// The editor holds no rows of its own: reads and edits go straight to the
/// [`TabularStore`]. It owns only display state (the latest validation
/// errors and whether a call is in flight). Dropping the editor stops its
/// watcher and any pending debounce timer.
pub struct GridEditor {
    dataset: Dataset,
    store: Arc<TabularStore>,
    shared: Arc<Shared>,
    watcher: JoinHandle<()>,
}

impl GridEditor {
    /// Start an editor for `dataset`. Must be called inside a tokio runtime.
    pub fn spawn(
        dataset: Dataset,
        store: Arc<TabularStore>,
        validator: Arc<dyn RowValidator>,
        config: GridConfig,
        reporter: Option<ValidationReporter>,
    ) -> Self {
        let shared = Arc::new(Shared::new(dataset, validator, reporter));
        let watcher = tokio::spawn(watch_dataset(
            Arc::clone(&shared),
            store.subscribe(dataset),
            config.debounce,
        ));

        Self {
            dataset,
            store,
            shared,
            watcher,
        }
    }

    pub fn dataset(&self) -> Dataset {
        self.dataset
    }

    /// Display columns: the first row's keys. Empty dataset has none.
    pub fn columns(&self) -> Vec<String> {
        self.store.snapshot(self.dataset).columns()
    }

    pub fn rows(&self) -> Arc<Vec<Row>> {
        self.store.rows(self.dataset)
    }

    /// Replace one cell's value with edited text.
    pub fn edit_cell(&self, row: usize, column: &str, value: impl Into<String>) -> Result<u64> {
        self.store
            .set_cell(self.dataset, row, column, CellValue::Text(value.into()))
    }

    /// Errors from the latest applied validation.
    pub fn errors(&self) -> Vec<ValidationError> {
        self.shared.state().errors.clone()
    }

    /// Message of the first error matching the cell.
    pub fn error_for(&self, row: usize, column: &str) -> Option<String> {
        self.shared
            .state()
            .errors
            .iter()
            .find(|e| e.matches(row, column))
            .map(|e| e.message.clone())
    }

    /// Whether a validation call is in flight.
    pub fn is_loading(&self) -> bool {
        self.shared.state().in_flight > 0
    }

    /// Render the dataset with per-cell errors.
    pub fn render(&self) -> GridView {
        let snapshot = self.store.snapshot(self.dataset);
        let columns = snapshot.columns();
        let state = self.shared.state();

        let rows = snapshot
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                columns
                    .iter()
                    .map(|column| GridCell {
                        value: row.get(column).map(CellValue::display_text).unwrap_or_default(),
                        error: state
                            .errors
                            .iter()
                            .find(|e| e.matches(index, column))
                            .map(|e| e.message.clone()),
                    })
                    .collect()
            })
            .collect();

        GridView {
            dataset: self.dataset,
            revision: snapshot.revision,
            columns,
            rows,
            errors: state.errors.clone(),
            loading: state.in_flight > 0,
        }
    }

    /// Validate the current rows now, bypassing the debounce.
    ///
    /// A pending debounced call is left alone. Returns the error count after
    /// this call has been applied. An empty dataset is not sent; its errors
    /// are cleared instead.
    pub async fn revalidate_now(&self) -> usize {
        let rows = self.rows();
        if rows.is_empty() {
            self.shared.clear();
            return 0;
        }
        if let Err(e) = self.shared.dispatch(rows).await {
            tracing::warn!(dataset = %self.dataset, error = %e, "revalidation task failed");
        }
        self.shared.state().errors.len()
    }
}

impl Drop for GridEditor {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopValidator;

    impl RowValidator for NoopValidator {
        fn validate(&self, _: Dataset, _: &[Row]) -> Result<Vec<ValidationError>> {
            Ok(Vec::new())
        }
    }

    fn shared_with_reports() -> (Arc<Shared>, Arc<Mutex<Vec<usize>>>) {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reports);
        let reporter: ValidationReporter = Arc::new(move |_, count| {
            sink.lock().unwrap().push(count);
        });
        let shared = Arc::new(Shared::new(
            Dataset::Clients,
            Arc::new(NoopValidator),
            Some(reporter),
        ));
        (shared, reports)
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let (shared, reports) = shared_with_reports();
        shared.state().in_flight = 2;

        shared.apply(2, Ok(vec![ValidationError::new(0, "email", "newer")]));
        shared.apply(
            1,
            Ok(vec![
                ValidationError::new(0, "id", "older"),
                ValidationError::new(1, "id", "older"),
            ]),
        );

        let state = shared.state();
        assert_eq!(state.errors.len(), 1);
        assert_eq!(state.errors[0].message, "newer");
        assert_eq!(state.in_flight, 0);
        assert_eq!(*reports.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_failure_reports_zero_and_clears() {
        let (shared, reports) = shared_with_reports();
        shared.apply(1, Ok(vec![ValidationError::new(0, "email", "x")]));
        shared.apply(2, Err(RosterError::MalformedResponse("prose".into())));

        assert!(shared.state().errors.is_empty());
        assert_eq!(*reports.lock().unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_clear_outranks_in_flight_calls() {
        let (shared, reports) = shared_with_reports();
        shared.apply(1, Ok(vec![ValidationError::new(0, "email", "x")]));
        shared.state().in_flight = 1;
        let in_flight = shared.issued.fetch_add(1, Ordering::SeqCst) + 1;

        shared.clear();
        shared.apply(in_flight, Ok(vec![ValidationError::new(0, "id", "late")]));

        let state = shared.state();
        assert!(state.errors.is_empty());
        assert_eq!(state.in_flight, 0);
        assert_eq!(*reports.lock().unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_default_debounce() {
        assert_eq!(GridConfig::default().debounce, Duration::from_millis(500));
    }
}
