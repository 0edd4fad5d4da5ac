//! SQLite persistence for the step catalog, properties, the step-progress
//! ledger and document metadata.
//!
//! [`Database`] owns one connection. Every mutating method runs in a single
//! transaction, so a failed call leaves no partial state behind. Queries are
//! split by entity across the `*_queries` modules, each adding an
//! `impl Database` block.

use std::path::Path;

use rusqlite::Connection;

use crate::{
    clock::{system_clock, SharedClock},
    error::{DatabaseResultExt, Result},
};

pub mod catalog_queries;
pub mod document_queries;
pub mod ledger_queries;
pub mod migrations;
pub mod property_queries;
pub mod report_queries;
pub mod utils;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
    clock: SharedClock,
}

impl Database {
    /// Opens the database at `path` and initializes the schema, using the
    /// system clock for dates and audit timestamps.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_clock(path, system_clock())
    }

    /// Opens the database at `path` with an explicit clock.
    pub fn with_clock<P: AsRef<Path>>(path: P, clock: SharedClock) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection, clock };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Clock used for "today" and audit timestamps.
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }
}
