//! Document metadata operations.

use rusqlite::{params, Connection, OptionalExtension};

use super::utils::{
    ensure_exists, get_id, get_optional_id, get_timestamp, like_pattern, not_found_or,
    param_refs, push_conditions, push_pagination, SqlParams,
};
use crate::{
    error::{DatabaseResultExt, Result, WorkflowError},
    models::{Document, DocumentFilter, DocumentPatch, NewDocument},
};

const DOCUMENT_COLUMNS: &str = "id, step_progress_id, filename, file_path, file_size, file_type, document_type, description, uploaded_by, created_at";
const INSERT_DOCUMENT_SQL: &str = "INSERT INTO documents (step_progress_id, filename, file_path, file_size, file_type, document_type, description, uploaded_by, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";
const CHECK_STEP_PROGRESS_EXISTS_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM step_progress WHERE id = ?1)";
const UPDATE_DOCUMENT_SQL: &str =
    "UPDATE documents SET document_type = ?1, description = ?2 WHERE id = ?3";
const DELETE_DOCUMENT_SQL: &str = "DELETE FROM documents WHERE id = ?1";

impl super::Database {
    fn build_document_from_row(row: &rusqlite::Row) -> rusqlite::Result<Document> {
        Ok(Document {
            id: get_id(row, 0)?,
            step_progress_id: get_id(row, 1)?,
            filename: row.get(2)?,
            file_path: row.get(3)?,
            file_size: get_optional_id(row, 4)?,
            file_type: row.get(5)?,
            document_type: row.get(6)?,
            description: row.get(7)?,
            uploaded_by: get_optional_id(row, 8)?,
            created_at: get_timestamp(row, 9)?,
        })
    }

    fn query_document(conn: &Connection, id: u64) -> Result<Document> {
        conn.query_row(
            &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"),
            params![id as i64],
            Self::build_document_from_row,
        )
        .map_err(|e| {
            not_found_or(
                e,
                WorkflowError::DocumentNotFound { id },
                "Failed to query document",
            )
        })
    }

    /// Records a document attached to a ledger entry.
    pub fn attach_document(
        &mut self,
        new: &NewDocument,
        uploaded_by: Option<u64>,
    ) -> Result<Document> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(
                CHECK_STEP_PROGRESS_EXISTS_SQL,
                params![new.step_progress_id as i64],
                |row| row.get(0),
            )
            .db_context("Failed to check step progress existence")?;
        ensure_exists(
            exists,
            WorkflowError::StepProgressNotFound {
                id: new.step_progress_id,
            },
        )?;

        let now = self.clock.now();
        tx.execute(
            INSERT_DOCUMENT_SQL,
            params![
                new.step_progress_id as i64,
                &new.filename,
                &new.file_path,
                new.file_size.map(|size| size as i64),
                &new.file_type,
                &new.document_type,
                &new.description,
                uploaded_by.map(|id| id as i64),
                now.to_string()
            ],
        )
        .db_context("Failed to insert document")?;

        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Document {
            id,
            step_progress_id: new.step_progress_id,
            filename: new.filename.clone(),
            file_path: new.file_path.clone(),
            file_size: new.file_size,
            file_type: new.file_type.clone(),
            document_type: new.document_type.clone(),
            description: new.description.clone(),
            uploaded_by,
            created_at: now,
        })
    }

    /// Retrieves a single document by its ID.
    pub fn get_document(&self, id: u64) -> Result<Option<Document>> {
        let mut stmt = self
            .connection
            .prepare(&format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"))
            .db_context("Failed to prepare query")?;

        stmt.query_row(params![id as i64], Self::build_document_from_row)
            .optional()
            .db_context("Failed to get document")
    }

    /// Lists documents, newest first.
    pub fn list_documents(&self, filter: &DocumentFilter) -> Result<Vec<Document>> {
        let mut query = format!("SELECT {DOCUMENT_COLUMNS} FROM documents");
        let mut conditions = Vec::new();
        let mut params_vec: SqlParams = Vec::new();

        if let Some(step_progress_id) = filter.step_progress_id {
            conditions.push("step_progress_id = ?");
            params_vec.push(Box::new(step_progress_id as i64));
        }

        if let Some(ref document_type) = filter.document_type {
            conditions.push("LOWER(COALESCE(document_type, '')) LIKE ?");
            params_vec.push(Box::new(like_pattern(document_type)));
        }

        push_conditions(&mut query, &conditions);
        query.push_str(" ORDER BY created_at DESC, id DESC");
        push_pagination(&mut query, &mut params_vec, filter.pagination);

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let documents = stmt
            .query_map(&param_refs(&params_vec)[..], Self::build_document_from_row)
            .db_context("Failed to query documents")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch documents")?;

        Ok(documents)
    }

    /// Updates the type and description of a document.
    pub fn update_document(&mut self, id: u64, patch: &DocumentPatch) -> Result<Document> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let current = Self::query_document(&tx, id)?;
        let updated = Document {
            document_type: patch
                .document_type
                .clone()
                .unwrap_or(current.document_type),
            description: patch.description.clone().unwrap_or(current.description),
            ..current
        };

        tx.execute(
            UPDATE_DOCUMENT_SQL,
            params![&updated.document_type, &updated.description, id as i64],
        )
        .db_context("Failed to update document")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(updated)
    }

    /// Deletes a document record. Returns the removed record.
    pub fn remove_document(&mut self, id: u64) -> Result<Document> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let document = Self::query_document(&tx, id)?;

        tx.execute(DELETE_DOCUMENT_SQL, params![id as i64])
            .db_context("Failed to delete document")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(document)
    }
}
