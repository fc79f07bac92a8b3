//! The process-wide session: datasets, rules and error counts.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::export::{self, ExportFile};
use crate::grid::ValidationSummary;
use crate::input::{ParsedTable, Parser};
use crate::rules::{Rule, RuleBook, RuleBuilder, RuleKind};
use crate::store::TabularStore;

/// What an upload put into the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    pub dataset: Dataset,
    pub rows: usize,
    pub columns: Vec<String>,
}

/// Everything one session owns. Nothing outlives the process.
#[derive(Default)]
pub struct Session {
    store: Arc<TabularStore>,
    rules: RwLock<RuleBook>,
    summary: Arc<ValidationSummary>,
    parser: Parser,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &Arc<TabularStore> {
        &self.store
    }

    pub fn summary(&self) -> &Arc<ValidationSummary> {
        &self.summary
    }

    /// Parse uploaded text and replace the dataset with its rows.
    ///
    /// A parse failure leaves the dataset untouched.
    pub fn load_text(&self, dataset: Dataset, text: &str) -> Result<UploadSummary> {
        let table = self.parser.parse_str(text)?;
        Ok(self.install(dataset, table))
    }

    /// Parse a file from disk and replace the dataset with its rows.
    pub fn load_file(&self, dataset: Dataset, path: impl AsRef<Path>) -> Result<UploadSummary> {
        let table = self.parser.parse_file(path)?;
        Ok(self.install(dataset, table))
    }

    fn install(&self, dataset: Dataset, table: ParsedTable) -> UploadSummary {
        tracing::info!(
            %dataset,
            rows = table.row_count(),
            columns = table.column_count(),
            format = table.format(),
            "dataset loaded"
        );
        let columns = table.headers.clone();
        let rows = table.row_count();
        self.store.set_file_data(dataset, table.into_rows());
        UploadSummary {
            dataset,
            rows,
            columns,
        }
    }

    /// Rules in insertion order.
    pub async fn rules(&self) -> Vec<Rule> {
        self.rules.read().await.rules().to_vec()
    }

    /// Submit a manual rule form. Returns the appended rule.
    pub async fn submit_form(&self, mut form: RuleBuilder) -> Result<Rule> {
        let mut book = self.rules.write().await;
        form.submit(&mut book)
    }

    /// Append a generated rule with `priority`.
    pub async fn accept_generated(&self, kind: RuleKind, priority: i64) -> Result<Rule> {
        let mut form = RuleBuilder {
            priority,
            ..RuleBuilder::default()
        };
        let mut book = self.rules.write().await;
        form.accept_generated(kind, &mut book)
    }

    pub async fn rules_export(&self) -> Result<ExportFile> {
        export::rules_export(&*self.rules.read().await)
    }

    pub fn table_export(&self, dataset: Dataset) -> Result<Option<ExportFile>> {
        export::table_export(&self.store, dataset)
    }

    /// Every export file: non-empty datasets, then `rules.json`.
    pub async fn exports(&self) -> Result<Vec<ExportFile>> {
        let mut files = export::table_exports(&self.store)?;
        files.push(self.rules_export().await?);
        Ok(files)
    }
}
