//! Step catalog CRUD operations and reordering.

use rusqlite::{params, Connection, OptionalExtension};

use super::utils::{get_id, get_optional_days, get_timestamp, not_found_or};
use crate::{
    clock::SharedClock,
    error::{DatabaseResultExt, Result, WorkflowError},
    models::{NewStepDefinition, StepDefinition, StepDefinitionPatch},
};

const STEP_DEFINITION_COLUMNS: &str = "id, name, description, order_sequence, estimated_duration_days, required_documents, active, created_at, updated_at";
const INSERT_STEP_DEFINITION_SQL: &str = "INSERT INTO step_definitions (name, description, order_sequence, estimated_duration_days, required_documents, active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const SELECT_ORDER_OWNER_SQL: &str = "SELECT id FROM step_definitions WHERE order_sequence = ?1";
const UPDATE_STEP_DEFINITION_SQL: &str = "UPDATE step_definitions SET name = ?1, description = ?2, order_sequence = ?3, estimated_duration_days = ?4, required_documents = ?5, active = ?6, updated_at = ?7 WHERE id = ?8";
const CHECK_STEP_DEFINITION_EXISTS_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM step_definitions WHERE id = ?1)";
const COUNT_STEP_REFERENCES_SQL: &str = "SELECT COUNT(*) FROM step_progress WHERE step_id = ?1";
const DELETE_STEP_DEFINITION_SQL: &str = "DELETE FROM step_definitions WHERE id = ?1";
const SELECT_ORDER_SQL: &str = "SELECT order_sequence FROM step_definitions WHERE id = ?1";
const SELECT_ORDER_BOUNDS_SQL: &str =
    "SELECT COALESCE(MIN(order_sequence), 0), COALESCE(MAX(order_sequence), 0) FROM step_definitions";
const UPDATE_ORDER_SQL: &str =
    "UPDATE step_definitions SET order_sequence = ?1, updated_at = ?2 WHERE id = ?3";

impl super::Database {
    /// Helper function to construct a StepDefinition from a database row
    fn build_step_definition_from_row(row: &rusqlite::Row) -> rusqlite::Result<StepDefinition> {
        Ok(StepDefinition {
            id: get_id(row, 0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            order_sequence: row.get(3)?,
            estimated_duration_days: get_optional_days(row, 4)?,
            required_documents: row.get(5)?,
            active: row.get(6)?,
            created_at: get_timestamp(row, 7)?,
            updated_at: get_timestamp(row, 8)?,
        })
    }

    fn query_step_definition(conn: &Connection, id: u64) -> Result<StepDefinition> {
        conn.query_row(
            &format!("SELECT {STEP_DEFINITION_COLUMNS} FROM step_definitions WHERE id = ?1"),
            params![id as i64],
            Self::build_step_definition_from_row,
        )
        .map_err(|e| {
            not_found_or(
                e,
                WorkflowError::StepDefinitionNotFound { id },
                "Failed to query step definition",
            )
        })
    }

    /// Fails with a conflict if `order_sequence` belongs to a definition
    /// other than `except`.
    fn ensure_order_available(
        conn: &Connection,
        order_sequence: i64,
        except: Option<u64>,
    ) -> Result<()> {
        let owner: Option<i64> = conn
            .query_row(SELECT_ORDER_OWNER_SQL, params![order_sequence], |row| {
                row.get(0)
            })
            .optional()
            .db_context("Failed to check order sequence")?;

        match owner {
            Some(owner) if Some(owner as u64) != except => Err(WorkflowError::conflict(
                "order_sequence",
                format!("Order sequence {order_sequence} is already used by step definition {owner}"),
            )),
            _ => Ok(()),
        }
    }

    fn insert_step_definition(
        conn: &Connection,
        clock: &SharedClock,
        new: &NewStepDefinition,
    ) -> Result<StepDefinition> {
        Self::ensure_order_available(conn, new.order_sequence, None)?;

        let now = clock.now();
        let now_str = now.to_string();

        conn.execute(
            INSERT_STEP_DEFINITION_SQL,
            params![
                &new.name,
                &new.description,
                new.order_sequence,
                new.estimated_duration_days,
                &new.required_documents,
                new.active,
                &now_str,
                &now_str
            ],
        )
        .unique_context("order_sequence", "Failed to insert step definition")?;

        Ok(StepDefinition {
            id: conn.last_insert_rowid() as u64,
            name: new.name.clone(),
            description: new.description.clone(),
            order_sequence: new.order_sequence,
            estimated_duration_days: new.estimated_duration_days,
            required_documents: new.required_documents.clone(),
            active: new.active,
            created_at: now,
            updated_at: now,
        })
    }

    /// Adds a definition to the catalog.
    ///
    /// Fails with a conflict when `order_sequence` is already taken.
    pub fn create_step_definition(&mut self, new: &NewStepDefinition) -> Result<StepDefinition> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let definition = Self::insert_step_definition(&tx, &self.clock, new)?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(definition)
    }

    /// Adds a batch of definitions in one transaction; either all are
    /// created or none.
    pub fn import_step_definitions(
        &mut self,
        batch: &[NewStepDefinition],
    ) -> Result<Vec<StepDefinition>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let definitions = batch
            .iter()
            .map(|new| Self::insert_step_definition(&tx, &self.clock, new))
            .collect::<Result<Vec<_>>>()?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(definitions)
    }

    /// Retrieves a single step definition by its ID.
    pub fn get_step_definition(&self, id: u64) -> Result<Option<StepDefinition>> {
        let mut stmt = self
            .connection
            .prepare(&format!(
                "SELECT {STEP_DEFINITION_COLUMNS} FROM step_definitions WHERE id = ?1"
            ))
            .db_context("Failed to prepare query")?;

        stmt.query_row(params![id as i64], Self::build_step_definition_from_row)
            .optional()
            .db_context("Failed to get step definition")
    }

    /// Lists the catalog ordered by `order_sequence`.
    pub fn list_step_definitions(&self, active_only: bool) -> Result<Vec<StepDefinition>> {
        let mut query = format!("SELECT {STEP_DEFINITION_COLUMNS} FROM step_definitions");
        if active_only {
            query.push_str(" WHERE active = 1");
        }
        query.push_str(" ORDER BY order_sequence");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let definitions = stmt
            .query_map([], Self::build_step_definition_from_row)
            .db_context("Failed to query step definitions")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch step definitions")?;

        Ok(definitions)
    }

    /// Applies a partial update to a definition.
    ///
    /// A changed `order_sequence` must not be used by another definition.
    pub fn update_step_definition(
        &mut self,
        id: u64,
        patch: &StepDefinitionPatch,
    ) -> Result<StepDefinition> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let current = Self::query_step_definition(&tx, id)?;
        if patch.is_empty() {
            return Ok(current);
        }

        let order_sequence = patch.order_sequence.unwrap_or(current.order_sequence);
        if order_sequence != current.order_sequence {
            Self::ensure_order_available(&tx, order_sequence, Some(id))?;
        }

        let now = self.clock.now();
        let updated = StepDefinition {
            name: patch.name.clone().unwrap_or(current.name),
            description: patch.description.clone().unwrap_or(current.description),
            order_sequence,
            estimated_duration_days: patch
                .estimated_duration_days
                .unwrap_or(current.estimated_duration_days),
            required_documents: patch
                .required_documents
                .clone()
                .unwrap_or(current.required_documents),
            active: patch.active.unwrap_or(current.active),
            updated_at: now,
            ..current
        };

        tx.execute(
            UPDATE_STEP_DEFINITION_SQL,
            params![
                &updated.name,
                &updated.description,
                updated.order_sequence,
                updated.estimated_duration_days,
                &updated.required_documents,
                updated.active,
                now.to_string(),
                id as i64
            ],
        )
        .unique_context("order_sequence", "Failed to update step definition")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(updated)
    }

    /// Removes a definition from the catalog.
    ///
    /// Definitions still referenced by ledger entries cannot be deleted.
    pub fn delete_step_definition(&mut self, id: u64) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(CHECK_STEP_DEFINITION_EXISTS_SQL, params![id as i64], |row| {
                row.get(0)
            })
            .db_context("Failed to check step definition existence")?;

        if !exists {
            return Err(WorkflowError::StepDefinitionNotFound { id });
        }

        let references: i64 = tx
            .query_row(COUNT_STEP_REFERENCES_SQL, params![id as i64], |row| {
                row.get(0)
            })
            .db_context("Failed to count step references")?;

        if references > 0 {
            return Err(WorkflowError::ReferentialIntegrity {
                entity: "step definition".into(),
                id,
                references: references as u64,
            });
        }

        tx.execute(DELETE_STEP_DEFINITION_SQL, params![id as i64])
            .db_context("Failed to delete step definition")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(())
    }

    /// Temporary order values for `count` steps: above the current maximum,
    /// or below the minimum when the maximum sits at the top of the range.
    fn parking_slots(min_order: i64, max_order: i64, count: usize) -> Result<Vec<i64>> {
        let count = i64::try_from(count).unwrap_or(i64::MAX);

        if max_order.checked_add(count).is_some() {
            Ok((1..=count).map(|offset| max_order + offset).collect())
        } else if min_order.checked_sub(count).is_some() {
            Ok((1..=count).map(|offset| min_order - offset).collect())
        } else {
            Err(WorkflowError::invalid_input("ids").with_reason(
                "Order sequences span the whole integer range; no room to reorder",
            ))
        }
    }

    /// Permutes the listed definitions within the sequence slots they
    /// already occupy: the first ID receives the smallest slot, the second
    /// the next one, and so on. Unlisted definitions keep their position.
    ///
    /// `ids` must be non-empty and free of duplicates. Returns the whole
    /// catalog in its new order.
    pub fn reorder_step_definitions(&mut self, ids: &[u64]) -> Result<Vec<StepDefinition>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let mut slots = ids
            .iter()
            .map(|id| {
                tx.query_row(SELECT_ORDER_SQL, params![*id as i64], |row| {
                    row.get::<_, i64>(0)
                })
                .map_err(|e| {
                    not_found_or(
                        e,
                        WorkflowError::StepDefinitionNotFound { id: *id },
                        "Failed to query step order",
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;
        slots.sort_unstable();

        let (min_order, max_order): (i64, i64) = tx
            .query_row(SELECT_ORDER_BOUNDS_SQL, [], |row| Ok((row.get(0)?, row.get(1)?)))
            .db_context("Failed to get step order bounds")?;
        let parking = Self::parking_slots(min_order, max_order, ids.len())?;

        let now_str = self.clock.now().to_string();

        // Park every listed step outside the used range to avoid unique
        // constraint violations while slots are reassigned
        for (slot, id) in parking.iter().zip(ids) {
            tx.execute(UPDATE_ORDER_SQL, params![*slot, &now_str, *id as i64])
                .db_context("Failed to park step order")?;
        }

        for (slot, id) in slots.iter().zip(ids) {
            tx.execute(UPDATE_ORDER_SQL, params![*slot, &now_str, *id as i64])
                .db_context("Failed to update step order")?;
        }

        tx.commit().db_context("Failed to commit transaction")?;

        self.list_step_definitions(false)
    }
}
