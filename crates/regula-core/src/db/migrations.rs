//! Database schema initialization and migrations.

use crate::error::{DatabaseResultExt, Result};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        // Cascades and the catalog delete guard depend on this, per connection
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        self.apply_migrations()?;

        Ok(())
    }

    /// Brings databases created by earlier releases up to date.
    fn apply_migrations(&self) -> Result<()> {
        if !self.has_column("properties", "polygon_geometry")? {
            log::info!("Adding polygon_geometry column to properties");
            self.connection
                .execute("ALTER TABLE properties ADD COLUMN polygon_geometry TEXT", [])
                .db_context("Failed to add polygon_geometry column to properties table")?;
        }

        if !self.has_column("step_progress", "created_by")? {
            log::info!("Adding created_by column to step_progress");
            self.connection
                .execute("ALTER TABLE step_progress ADD COLUMN created_by INTEGER", [])
                .db_context("Failed to add created_by column to step_progress table")?;
        }

        Ok(())
    }

    fn has_column(&self, table: &str, column: &str) -> Result<bool> {
        self.connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
                [table, column],
                |row| row.get::<_, i64>(0),
            )
            .map(|count| count > 0)
            .db_context("Failed to inspect table columns")
    }
}
