//! Builder for creating and configuring Workflow instances.

use std::path::{Path, PathBuf};

use tokio::task;

use super::Workflow;
use crate::{
    clock::{system_clock, SharedClock},
    db::Database,
    error::{Result, WorkflowError},
};

/// Builder for creating and configuring Workflow instances.
#[derive(Debug, Clone)]
pub struct WorkflowBuilder {
    database_path: Option<PathBuf>,
    clock: Option<SharedClock>,
}

impl WorkflowBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
            clock: None,
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/regula/regula.db` or `~/.local/share/regula/regula.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the clock used for "today". Defaults to the system clock.
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the configured workflow, creating the database and its schema
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::FileSystem` if the database directory cannot
    /// be created, `WorkflowError::XdgDirectory` if no default location can
    /// be determined and `WorkflowError::Database` if schema initialization
    /// fails.
    pub async fn build(self) -> Result<Workflow> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };
        let clock = self.clock.unwrap_or_else(system_clock);

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| WorkflowError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        log::debug!("Opening workflow database at {}", db_path.display());

        let db_path_clone = db_path.clone();
        let clock_clone = clock.clone();
        task::spawn_blocking(move || {
            let _db = Database::with_clock(&db_path_clone, clock_clone)?;
            Ok::<(), WorkflowError>(())
        })
        .await
        .map_err(|e| WorkflowError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(Workflow::new(db_path, clock))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("regula")
            .place_data_file("regula.db")
            .map_err(|e| WorkflowError::XdgDirectory(e.to_string()))
    }
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}
