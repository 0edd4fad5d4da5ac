//! Step-progress ledger operations.

use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use super::utils::{
    ensure_exists, get_id, get_optional_date, get_optional_days, get_optional_id, get_status,
    get_timestamp, not_found_or, param_refs, push_conditions, push_pagination, SqlParams,
};
use crate::{
    error::{DatabaseResultExt, Result, WorkflowError},
    models::{
        format_address, OverdueEntry, ProgressStatus, StepProgress, StepProgressFilter,
        StepProgressPatch,
    },
    overdue,
};

pub(super) const STEP_PROGRESS_SELECT: &str = "SELECT sp.id, sp.property_id, sp.step_id, sd.name, sd.order_sequence, sd.estimated_duration_days, sp.status, sp.start_date, sp.end_date, sp.responsible_user_id, sp.completion_percentage, sp.observations, sp.created_by, sp.created_at, sp.updated_at FROM step_progress sp JOIN step_definitions sd ON sd.id = sp.step_id";
pub(super) const INSERT_STEP_PROGRESS_SQL: &str = "INSERT INTO step_progress (property_id, step_id, status, completion_percentage, created_by, created_at, updated_at) VALUES (?1, ?2, ?3, 0, ?4, ?5, ?6)";
const CHECK_PROPERTY_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM properties WHERE id = ?1)";
const CHECK_STEP_DEFINITION_EXISTS_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM step_definitions WHERE id = ?1)";
const CHECK_PAIR_EXISTS_SQL: &str =
    "SELECT EXISTS(SELECT 1 FROM step_progress WHERE property_id = ?1 AND step_id = ?2)";
const UPDATE_STEP_PROGRESS_SQL: &str = "UPDATE step_progress SET status = ?1, start_date = ?2, end_date = ?3, responsible_user_id = ?4, completion_percentage = ?5, observations = ?6, updated_at = ?7 WHERE id = ?8";
const SELECT_OVERDUE_CANDIDATES_SQL: &str = "SELECT sp.id, sp.property_id, p.municipal_code, p.address_street, p.address_number, p.address_neighborhood, p.address_city, sp.step_id, sd.name, sp.start_date, sd.estimated_duration_days, sp.responsible_user_id FROM step_progress sp JOIN step_definitions sd ON sd.id = sp.step_id JOIN properties p ON p.id = sp.property_id WHERE sp.status = 'in_progress' AND sp.start_date IS NOT NULL AND sd.estimated_duration_days IS NOT NULL";

/// Inputs of the overdue predicate for one in-progress entry, with the
/// property context needed for reporting.
struct OverdueCandidate {
    step_progress_id: u64,
    property_id: u64,
    municipal_code: Option<String>,
    property_address: String,
    step_id: u64,
    step_name: String,
    start_date: Option<jiff::civil::Date>,
    estimated_duration_days: Option<u32>,
    responsible_user_id: Option<u64>,
}

impl super::Database {
    /// Helper function to construct a StepProgress from a row of
    /// [`STEP_PROGRESS_SELECT`].
    pub(super) fn build_step_progress_from_row(
        row: &rusqlite::Row,
    ) -> rusqlite::Result<StepProgress> {
        let percentage: i64 = row.get(10)?;

        Ok(StepProgress {
            id: get_id(row, 0)?,
            property_id: get_id(row, 1)?,
            step_id: get_id(row, 2)?,
            step_name: row.get(3)?,
            order_sequence: row.get(4)?,
            estimated_duration_days: get_optional_days(row, 5)?,
            status: get_status(row, 6)?,
            start_date: get_optional_date(row, 7)?,
            end_date: get_optional_date(row, 8)?,
            responsible_user_id: get_optional_id(row, 9)?,
            completion_percentage: percentage.clamp(0, 100) as u8,
            observations: row.get(11)?,
            created_by: get_optional_id(row, 12)?,
            created_at: get_timestamp(row, 13)?,
            updated_at: get_timestamp(row, 14)?,
        })
    }

    fn query_step_progress(conn: &Connection, id: u64) -> Result<StepProgress> {
        conn.query_row(
            &format!("{STEP_PROGRESS_SELECT} WHERE sp.id = ?1"),
            params![id as i64],
            Self::build_step_progress_from_row,
        )
        .map_err(|e| {
            not_found_or(
                e,
                WorkflowError::StepProgressNotFound { id },
                "Failed to query step progress",
            )
        })
    }

    /// Ledger entries of a property ordered by step sequence.
    pub fn steps_for_property(&self, property_id: u64) -> Result<Vec<StepProgress>> {
        let mut stmt = self
            .connection
            .prepare(&format!(
                "{STEP_PROGRESS_SELECT} WHERE sp.property_id = ?1 ORDER BY sd.order_sequence"
            ))
            .db_context("Failed to prepare query")?;

        let steps = stmt
            .query_map(params![property_id as i64], Self::build_step_progress_from_row)
            .db_context("Failed to query step progress")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch step progress")?;

        Ok(steps)
    }

    /// Retrieves a single ledger entry by its ID.
    pub fn get_step_progress(&self, id: u64) -> Result<Option<StepProgress>> {
        let mut stmt = self
            .connection
            .prepare(&format!("{STEP_PROGRESS_SELECT} WHERE sp.id = ?1"))
            .db_context("Failed to prepare query")?;

        stmt.query_row(params![id as i64], Self::build_step_progress_from_row)
            .optional()
            .db_context("Failed to get step progress")
    }

    /// Lists ledger entries ordered by property, then step sequence.
    pub fn list_step_progress(&self, filter: &StepProgressFilter) -> Result<Vec<StepProgress>> {
        let mut query = STEP_PROGRESS_SELECT.to_string();
        let mut conditions = Vec::new();
        let mut params_vec: SqlParams = Vec::new();

        if let Some(property_id) = filter.property_id {
            conditions.push("sp.property_id = ?");
            params_vec.push(Box::new(property_id as i64));
        }

        if let Some(step_id) = filter.step_id {
            conditions.push("sp.step_id = ?");
            params_vec.push(Box::new(step_id as i64));
        }

        if let Some(status) = filter.status {
            conditions.push("sp.status = ?");
            params_vec.push(Box::new(status.as_str()));
        }

        if let Some(user_id) = filter.responsible_user_id {
            conditions.push("sp.responsible_user_id = ?");
            params_vec.push(Box::new(user_id as i64));
        }

        push_conditions(&mut query, &conditions);
        query.push_str(" ORDER BY sp.property_id, sd.order_sequence");
        push_pagination(&mut query, &mut params_vec, filter.pagination);

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let entries = stmt
            .query_map(&param_refs(&params_vec)[..], Self::build_step_progress_from_row)
            .db_context("Failed to query step progress")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch step progress")?;

        Ok(entries)
    }

    /// Adds a ledger entry for an existing property and step definition.
    ///
    /// Fails with a conflict when the property already tracks the step.
    pub fn create_step_progress(
        &mut self,
        property_id: u64,
        step_id: u64,
        created_by: Option<u64>,
    ) -> Result<StepProgress> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let property_exists: bool = tx
            .query_row(CHECK_PROPERTY_EXISTS_SQL, params![property_id as i64], |row| {
                row.get(0)
            })
            .db_context("Failed to check property existence")?;
        ensure_exists(
            property_exists,
            WorkflowError::PropertyNotFound { id: property_id },
        )?;

        let step_exists: bool = tx
            .query_row(CHECK_STEP_DEFINITION_EXISTS_SQL, params![step_id as i64], |row| {
                row.get(0)
            })
            .db_context("Failed to check step definition existence")?;
        ensure_exists(
            step_exists,
            WorkflowError::StepDefinitionNotFound { id: step_id },
        )?;

        let pair_exists: bool = tx
            .query_row(
                CHECK_PAIR_EXISTS_SQL,
                params![property_id as i64, step_id as i64],
                |row| row.get(0),
            )
            .db_context("Failed to check existing step progress")?;
        if pair_exists {
            return Err(WorkflowError::conflict(
                "step_id",
                format!("Property {property_id} already has a record for step {step_id}"),
            ));
        }

        let now_str = self.clock.now().to_string();
        tx.execute(
            INSERT_STEP_PROGRESS_SQL,
            params![
                property_id as i64,
                step_id as i64,
                ProgressStatus::NotStarted.as_str(),
                created_by.map(|id| id as i64),
                &now_str,
                &now_str
            ],
        )
        .unique_context("step_id", "Failed to insert step progress")?;

        let entry = Self::query_step_progress(&tx, tx.last_insert_rowid() as u64)?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(entry)
    }

    /// Applies a status-transition patch to a ledger entry.
    ///
    /// The patch is evaluated against the stored entry with
    /// [`StepProgressPatch::apply_to`] using the database clock's date. Any
    /// validation failure leaves the entry unchanged.
    pub fn update_step_progress(
        &mut self,
        id: u64,
        patch: &StepProgressPatch,
    ) -> Result<StepProgress> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let current = Self::query_step_progress(&tx, id)?;
        if patch.is_empty() {
            return Ok(current);
        }

        let mut next = patch.apply_to(&current, self.clock.today())?;
        next.updated_at = self.clock.now();

        debug!(
            "Step progress {id}: {} -> {}",
            current.status.as_str(),
            next.status.as_str()
        );

        tx.execute(
            UPDATE_STEP_PROGRESS_SQL,
            params![
                next.status.as_str(),
                next.start_date.map(|d| d.to_string()),
                next.end_date.map(|d| d.to_string()),
                next.responsible_user_id.map(|id| id as i64),
                i64::from(next.completion_percentage),
                &next.observations,
                next.updated_at.to_string(),
                id as i64
            ],
        )
        .db_context("Failed to update step progress")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(next)
    }

    /// Overdue ledger entries, most overdue first.
    ///
    /// SQL only narrows the candidates to in-progress entries with a start
    /// date and an estimated duration; lateness is evaluated in Rust against
    /// the database clock's date.
    pub fn list_overdue(&self, property_id: Option<u64>) -> Result<Vec<OverdueEntry>> {
        let mut query = SELECT_OVERDUE_CANDIDATES_SQL.to_string();
        let mut params_vec: SqlParams = Vec::new();

        if let Some(property_id) = property_id {
            query.push_str(" AND sp.property_id = ?");
            params_vec.push(Box::new(property_id as i64));
        }
        query.push_str(" ORDER BY sp.property_id, sd.order_sequence");

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let candidates = stmt
            .query_map(&param_refs(&params_vec)[..], |row| {
                let street: String = row.get(3)?;
                let number: Option<String> = row.get(4)?;
                let neighborhood: Option<String> = row.get(5)?;
                let city: Option<String> = row.get(6)?;

                Ok(OverdueCandidate {
                    step_progress_id: get_id(row, 0)?,
                    property_id: get_id(row, 1)?,
                    municipal_code: row.get(2)?,
                    property_address: format_address(
                        &street,
                        number.as_deref(),
                        neighborhood.as_deref(),
                        city.as_deref(),
                    ),
                    step_id: get_id(row, 7)?,
                    step_name: row.get(8)?,
                    start_date: get_optional_date(row, 9)?,
                    estimated_duration_days: get_optional_days(row, 10)?,
                    responsible_user_id: get_optional_id(row, 11)?,
                })
            })
            .db_context("Failed to query overdue candidates")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch overdue candidates")?;

        let today = self.clock.today();
        let mut overdue: Vec<OverdueEntry> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let lateness = overdue::evaluate(
                    ProgressStatus::InProgress,
                    candidate.start_date,
                    candidate.estimated_duration_days,
                    today,
                )?;
                Some(OverdueEntry {
                    step_progress_id: candidate.step_progress_id,
                    property_id: candidate.property_id,
                    municipal_code: candidate.municipal_code,
                    property_address: candidate.property_address,
                    step_id: candidate.step_id,
                    step_name: candidate.step_name,
                    start_date: candidate.start_date?,
                    expected_end_date: lateness.expected_end_date,
                    days_overdue: lateness.days_overdue,
                    responsible_user_id: candidate.responsible_user_id,
                })
            })
            .collect();

        overdue.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue));
        Ok(overdue)
    }
}
