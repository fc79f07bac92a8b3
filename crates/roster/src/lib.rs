//! Roster: LLM-assisted data intake for scheduling datasets.
//!
//! Roster loads three tabular datasets (clients, workers and tasks), lets
//! them be edited cell by cell, and asks a text-generation service to flag
//! field-level problems while editing settles down. Scheduling rules are
//! authored alongside, either from a typed form or from a plain-English
//! sentence, and everything can be exported as files.
//!
//! # Core Principles
//!
//! - **Advisory validation**: errors are display state and never modify rows
//! - **One write funnel**: every dataset change goes through the store
//! - **Strict extraction**: free-form answers are parsed fully or rejected
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use roster::{Dataset, GridConfig, GridSet, MockProvider, Session, ValidationGateway};
//!
//! # async fn example() -> roster::Result<()> {
//! let session = Session::new();
//! session.load_text(Dataset::Clients, "id,email\n1,\n")?;
//!
//! let gateway = Arc::new(ValidationGateway::new(Arc::new(MockProvider::new())));
//! let grids = GridSet::spawn(
//!     session.store().clone(),
//!     gateway,
//!     GridConfig::default(),
//!     session.summary(),
//! );
//!
//! let errors = grids.editor(Dataset::Clients).revalidate_now().await;
//! println!("Errors: {}", errors);
//! # Ok(())
//! # }
//! ```

pub mod dataset;
pub mod error;
pub mod export;
pub mod extract;
pub mod gateway;
pub mod grid;
pub mod input;
pub mod llm;
pub mod rules;
pub mod session;
pub mod store;

pub use dataset::{CellValue, Dataset, Row};
pub use error::{Result, RosterError};
pub use export::ExportFile;
pub use gateway::{RowValidator, RuleGenerationGateway, ValidationError, ValidationGateway};
pub use grid::{
    GridCell, GridConfig, GridEditor, GridSet, GridView, SummaryReport, ValidationSummary,
};
pub use input::{ParsedTable, Parser};
pub use llm::{
    AnthropicProvider, GeminiProvider, LlmConfig, LlmProvider, MockProvider, api_key_from_env,
};
pub use rules::{Rule, RuleBook, RuleBuilder, RuleKind, RuleType};
pub use session::{Session, UploadSummary};
pub use store::{Snapshot, TabularStore};
