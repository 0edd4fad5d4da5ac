//! Error types for the workflow engine.

use std::path::PathBuf;

use rusqlite::ErrorCode;
use thiserror::Error;

/// Comprehensive error type for all workflow operations.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Property not found for the given ID
    #[error("Property with ID {id} not found")]
    PropertyNotFound { id: u64 },
    /// Step definition not found for the given ID
    #[error("Step definition with ID {id} not found")]
    StepDefinitionNotFound { id: u64 },
    /// Ledger entry not found for the given ID
    #[error("Step progress record with ID {id} not found")]
    StepProgressNotFound { id: u64 },
    /// Document not found for the given ID
    #[error("Document with ID {id} not found")]
    DocumentNotFound { id: u64 },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Uniqueness violations
    #[error("Conflict on '{field}': {reason}")]
    Conflict { field: String, reason: String },
    /// Deletion blocked by existing references
    #[error("Cannot delete {entity} {id}: referenced by {references} record(s)")]
    ReferentialIntegrity {
        entity: String,
        id: u64,
        references: u64,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Coarse classification of a [`WorkflowError`], stable across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    ReferentialIntegrity,
    Internal,
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> WorkflowError {
        WorkflowError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> WorkflowError {
        WorkflowError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl WorkflowError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a uniqueness conflict error.
    pub fn conflict(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Conflict {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Classifies the error for callers that only care about its kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::Validation,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::PropertyNotFound { .. }
            | Self::StepDefinitionNotFound { .. }
            | Self::StepProgressNotFound { .. }
            | Self::DocumentNotFound { .. } => ErrorKind::NotFound,
            Self::ReferentialIntegrity { .. } => ErrorKind::ReferentialIntegrity,
            Self::Database { .. }
            | Self::FileSystem { .. }
            | Self::XdgDirectory(_)
            | Self::Serialization { .. }
            | Self::Configuration { .. } => ErrorKind::Internal,
        }
    }
}

/// Returns true when the SQLite error is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;

    /// Map UNIQUE violations to a conflict on `field`, other errors as
    /// database errors with a message.
    fn unique_context(self, field: &str, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| WorkflowError::database(message).with_source(e))
    }

    fn unique_context(self, field: &str, message: &str) -> Result<T> {
        self.map_err(|e| {
            if is_unique_violation(&e) {
                WorkflowError::conflict(field, "value is already in use")
            } else {
                WorkflowError::database(message).with_source(e)
            }
        })
    }
}

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            WorkflowError::invalid_input("status")
                .with_reason("bad")
                .kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            WorkflowError::conflict("municipal_code", "taken").kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            WorkflowError::StepProgressNotFound { id: 3 }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            WorkflowError::ReferentialIntegrity {
                entity: "step definition".into(),
                id: 1,
                references: 2,
            }
            .kind(),
            ErrorKind::ReferentialIntegrity
        );
    }

    #[test]
    fn test_referential_integrity_message() {
        let err = WorkflowError::ReferentialIntegrity {
            entity: "step definition".into(),
            id: 7,
            references: 3,
        };
        assert_eq!(
            err.to_string(),
            "Cannot delete step definition 7: referenced by 3 record(s)"
        );
    }
}
