//! High-level async API of the regularization workflow engine.
//!
//! [`Workflow`] is the entry point for every boundary layer. Each operation
//! accepts a parameter struct from [`crate::params`], validates it, and runs
//! the database work on a blocking thread with a fresh connection:
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │  Core Params    │───▶│  Workflow ops    │───▶│    Database     │
//! │ (params module) │    │ (validate, spawn │    │   (via db/)     │
//! │                 │    │  blocking task)  │    │                 │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: configures the database path and clock
//! - [`property_ops`]: property registry with ledger bootstrap
//! - [`catalog_ops`]: step catalog maintenance and reordering
//! - [`ledger_ops`]: step-progress entries and status transitions
//! - [`document_ops`]: document metadata
//! - [`report_ops`]: progress summaries, overdue lists and dashboard reports
//!
//! # Examples
//!
//! ```rust,no_run
//! use regula_core::{params::CreateProperty, WorkflowBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let workflow = WorkflowBuilder::new()
//!     .with_database_path(Some("/tmp/regula.db"))
//!     .build()
//!     .await?;
//!
//! let property = workflow
//!     .create_property(
//!         &CreateProperty {
//!             address_street: "Rua das Flores".to_string(),
//!             municipal_code: Some("MM-0001".to_string()),
//!             ..Default::default()
//!         },
//!         Some(1),
//!     )
//!     .await?;
//! println!("{} step records created", property.steps.len());
//! # Ok(())
//! # }
//! ```

use std::{path::PathBuf, sync::Arc};

use tokio::task;

use crate::{
    clock::SharedClock,
    db::Database,
    error::{Result, WorkflowError},
};

pub mod builder;
pub mod catalog_ops;
pub mod document_ops;
pub mod ledger_ops;
pub mod property_ops;
pub mod report_ops;


pub use builder::WorkflowBuilder;

/// Main interface of the workflow engine.
#[derive(Debug, Clone)]
pub struct Workflow {
    pub(crate) db_path: PathBuf,
    pub(crate) clock: SharedClock,
}

impl Workflow {
    /// Creates a workflow over the database at `db_path`.
    pub(crate) fn new(db_path: PathBuf, clock: SharedClock) -> Self {
        Self { db_path, clock }
    }

    /// Path of the SQLite database file.
    pub fn database_path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Clock providing "today" for transitions and overdue evaluation.
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Runs `op` against a fresh connection on the blocking thread pool.
    pub(crate) async fn with_database<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db_path = self.db_path.clone();
        let clock = Arc::clone(&self.clock);

        task::spawn_blocking(move || {
            let mut db = Database::with_clock(&db_path, clock)?;
            op(&mut db)
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
