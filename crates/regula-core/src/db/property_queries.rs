//! Property registry operations, including ledger bootstrap on creation.

use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use super::{
    ledger_queries::INSERT_STEP_PROGRESS_SQL,
    utils::{
        get_id, get_optional_id, get_status, get_timestamp, like_pattern, not_found_or,
        param_refs, push_conditions, push_pagination, SqlParams,
    },
};
use crate::{
    error::{DatabaseResultExt, Result, WorkflowError},
    models::{NewProperty, ProgressStatus, Property, PropertyFilter, PropertyPatch},
};

const PROPERTY_COLUMNS: &str = "id, municipal_code, registry_number, address_street, address_number, address_neighborhood, address_city, address_zipcode, area_total, area_built, property_type, current_use, current_owner, regularization_status, description, geometry, polygon_geometry, created_by, created_at, updated_at";
const INSERT_PROPERTY_SQL: &str = "INSERT INTO properties (municipal_code, registry_number, address_street, address_number, address_neighborhood, address_city, address_zipcode, area_total, area_built, property_type, current_use, current_owner, regularization_status, description, geometry, polygon_geometry, created_by, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)";
const UPDATE_PROPERTY_SQL: &str = "UPDATE properties SET municipal_code = ?1, registry_number = ?2, address_street = ?3, address_number = ?4, address_neighborhood = ?5, address_city = ?6, address_zipcode = ?7, area_total = ?8, area_built = ?9, property_type = ?10, current_use = ?11, current_owner = ?12, regularization_status = ?13, description = ?14, geometry = ?15, polygon_geometry = ?16, updated_at = ?17 WHERE id = ?18";
const SELECT_CODE_OWNER_SQL: &str = "SELECT id FROM properties WHERE municipal_code = ?1";
const SELECT_ACTIVE_STEP_IDS_SQL: &str =
    "SELECT id FROM step_definitions WHERE active = 1 ORDER BY order_sequence";
const CHECK_PROPERTY_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM properties WHERE id = ?1)";
const DELETE_PROPERTY_SQL: &str = "DELETE FROM properties WHERE id = ?1";
const SELECT_NEIGHBORHOODS_SQL: &str = "SELECT DISTINCT address_neighborhood FROM properties WHERE address_neighborhood IS NOT NULL AND address_neighborhood != '' ORDER BY address_neighborhood";

impl super::Database {
    /// Helper function to construct a Property (without its ledger) from a
    /// database row
    fn build_property_from_row(row: &rusqlite::Row) -> rusqlite::Result<Property> {
        Ok(Property {
            id: get_id(row, 0)?,
            municipal_code: row.get(1)?,
            registry_number: row.get(2)?,
            address_street: row.get(3)?,
            address_number: row.get(4)?,
            address_neighborhood: row.get(5)?,
            address_city: row.get(6)?,
            address_zipcode: row.get(7)?,
            area_total: row.get(8)?,
            area_built: row.get(9)?,
            property_type: row.get(10)?,
            current_use: row.get(11)?,
            current_owner: row.get(12)?,
            regularization_status: get_status(row, 13)?,
            description: row.get(14)?,
            geometry: row.get(15)?,
            polygon_geometry: row.get(16)?,
            created_by: get_optional_id(row, 17)?,
            created_at: get_timestamp(row, 18)?,
            updated_at: get_timestamp(row, 19)?,
            steps: Vec::new(),
        })
    }

    fn query_property(conn: &Connection, id: u64) -> Result<Property> {
        conn.query_row(
            &format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = ?1"),
            params![id as i64],
            Self::build_property_from_row,
        )
        .map_err(|e| {
            not_found_or(
                e,
                WorkflowError::PropertyNotFound { id },
                "Failed to query property",
            )
        })
    }

    /// Fails with a conflict if `code` belongs to a property other than
    /// `except`.
    fn ensure_code_available(conn: &Connection, code: &str, except: Option<u64>) -> Result<()> {
        let owner: Option<i64> = conn
            .query_row(SELECT_CODE_OWNER_SQL, params![code], |row| row.get(0))
            .optional()
            .db_context("Failed to check municipal code")?;

        match owner {
            Some(owner) if Some(owner as u64) != except => Err(WorkflowError::conflict(
                "municipal_code",
                format!("Municipal code {code} is already registered to property {owner}"),
            )),
            _ => Ok(()),
        }
    }

    /// Registers a property and bootstraps its ledger.
    ///
    /// Within one transaction the property is inserted and one
    /// `not_started` entry at 0% is created for every active step
    /// definition, in `order_sequence` order, attributed to `created_by`.
    pub fn create_property(
        &mut self,
        new: &NewProperty,
        created_by: Option<u64>,
    ) -> Result<Property> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        if let Some(code) = &new.municipal_code {
            Self::ensure_code_available(&tx, code, None)?;
        }

        let now_str = self.clock.now().to_string();
        let created_by = created_by.map(|id| id as i64);

        tx.execute(
            INSERT_PROPERTY_SQL,
            params![
                &new.municipal_code,
                &new.registry_number,
                &new.address_street,
                &new.address_number,
                &new.address_neighborhood,
                &new.address_city,
                &new.address_zipcode,
                new.area_total,
                new.area_built,
                &new.property_type,
                &new.current_use,
                &new.current_owner,
                new.regularization_status.as_str(),
                &new.description,
                &new.geometry,
                &new.polygon_geometry,
                created_by,
                &now_str,
                &now_str
            ],
        )
        .unique_context("municipal_code", "Failed to insert property")?;

        let id = tx.last_insert_rowid() as u64;

        let step_ids: Vec<i64> = {
            let mut stmt = tx
                .prepare(SELECT_ACTIVE_STEP_IDS_SQL)
                .db_context("Failed to prepare query")?;
            let ids = stmt
                .query_map([], |row| row.get(0))
                .db_context("Failed to query active step definitions")?
                .collect::<std::result::Result<Vec<_>, _>>()
                .db_context("Failed to fetch active step definitions")?;
            ids
        };

        for step_id in &step_ids {
            tx.execute(
                INSERT_STEP_PROGRESS_SQL,
                params![
                    id as i64,
                    step_id,
                    ProgressStatus::NotStarted.as_str(),
                    created_by,
                    &now_str,
                    &now_str
                ],
            )
            .unique_context("step_id", "Failed to bootstrap step progress")?;
        }

        debug!("Property {id} created with {} step records", step_ids.len());

        tx.commit().db_context("Failed to commit transaction")?;

        self.get_property(id)?
            .ok_or(WorkflowError::PropertyNotFound { id })
    }

    /// Retrieves a property with its ledger ordered by step sequence.
    pub fn get_property(&self, id: u64) -> Result<Option<Property>> {
        let mut stmt = self
            .connection
            .prepare(&format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = ?1"))
            .db_context("Failed to prepare query")?;

        let mut property = stmt
            .query_row(params![id as i64], Self::build_property_from_row)
            .optional()
            .db_context("Failed to get property")?;

        if let Some(ref mut property) = property {
            property.steps = self.steps_for_property(property.id)?;
        }

        Ok(property)
    }

    /// Applies a partial update to a property.
    ///
    /// A changed municipal code is checked for uniqueness against every
    /// other property. Returns the property with its ledger.
    pub fn update_property(&mut self, id: u64, patch: &PropertyPatch) -> Result<Property> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let current = Self::query_property(&tx, id)?;
        if patch.is_empty() {
            drop(tx);
            return self
                .get_property(id)?
                .ok_or(WorkflowError::PropertyNotFound { id });
        }

        let municipal_code = patch
            .municipal_code
            .clone()
            .unwrap_or(current.municipal_code.clone());
        if let Some(code) = &municipal_code {
            if current.municipal_code.as_ref() != Some(code) {
                Self::ensure_code_available(&tx, code, Some(id))?;
            }
        }

        let updated = Property {
            municipal_code,
            registry_number: patch
                .registry_number
                .clone()
                .unwrap_or(current.registry_number),
            address_street: patch
                .address_street
                .clone()
                .unwrap_or(current.address_street),
            address_number: patch.address_number.clone().unwrap_or(current.address_number),
            address_neighborhood: patch
                .address_neighborhood
                .clone()
                .unwrap_or(current.address_neighborhood),
            address_city: patch.address_city.clone().unwrap_or(current.address_city),
            address_zipcode: patch
                .address_zipcode
                .clone()
                .unwrap_or(current.address_zipcode),
            area_total: patch.area_total.unwrap_or(current.area_total),
            area_built: patch.area_built.unwrap_or(current.area_built),
            property_type: patch.property_type.clone().unwrap_or(current.property_type),
            current_use: patch.current_use.clone().unwrap_or(current.current_use),
            current_owner: patch.current_owner.clone().unwrap_or(current.current_owner),
            regularization_status: patch
                .regularization_status
                .unwrap_or(current.regularization_status),
            description: patch.description.clone().unwrap_or(current.description),
            geometry: patch.geometry.clone().unwrap_or(current.geometry),
            polygon_geometry: patch
                .polygon_geometry
                .clone()
                .unwrap_or(current.polygon_geometry),
            updated_at: self.clock.now(),
            ..current
        };

        tx.execute(
            UPDATE_PROPERTY_SQL,
            params![
                &updated.municipal_code,
                &updated.registry_number,
                &updated.address_street,
                &updated.address_number,
                &updated.address_neighborhood,
                &updated.address_city,
                &updated.address_zipcode,
                updated.area_total,
                updated.area_built,
                &updated.property_type,
                &updated.current_use,
                &updated.current_owner,
                updated.regularization_status.as_str(),
                &updated.description,
                &updated.geometry,
                &updated.polygon_geometry,
                updated.updated_at.to_string(),
                id as i64
            ],
        )
        .unique_context("municipal_code", "Failed to update property")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Property {
            steps: self.steps_for_property(id)?,
            ..updated
        })
    }

    /// Deletes a property. Its ledger entries and their documents are
    /// removed by cascade.
    pub fn delete_property(&mut self, id: u64) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(CHECK_PROPERTY_EXISTS_SQL, params![id as i64], |row| row.get(0))
            .db_context("Failed to check property existence")?;

        if !exists {
            return Err(WorkflowError::PropertyNotFound { id });
        }

        tx.execute(DELETE_PROPERTY_SQL, params![id as i64])
            .db_context("Failed to delete property")?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(())
    }

    /// Lists properties, newest first, each with its ledger.
    pub fn list_properties(&self, filter: &PropertyFilter) -> Result<Vec<Property>> {
        let mut query = format!("SELECT {PROPERTY_COLUMNS} FROM properties");
        let mut conditions = Vec::new();
        let mut params_vec: SqlParams = Vec::new();

        if let Some(ref search) = filter.search {
            conditions.push(
                "(LOWER(COALESCE(municipal_code, '')) LIKE ? OR LOWER(address_street) LIKE ? OR LOWER(COALESCE(current_owner, '')) LIKE ?)",
            );
            let pattern = like_pattern(search);
            params_vec.push(Box::new(pattern.clone()));
            params_vec.push(Box::new(pattern.clone()));
            params_vec.push(Box::new(pattern));
        }

        if let Some(status) = filter.status {
            conditions.push("regularization_status = ?");
            params_vec.push(Box::new(status.as_str()));
        }

        if let Some(ref neighborhood) = filter.neighborhood {
            conditions.push("LOWER(COALESCE(address_neighborhood, '')) LIKE ?");
            params_vec.push(Box::new(like_pattern(neighborhood)));
        }

        push_conditions(&mut query, &conditions);
        query.push_str(" ORDER BY created_at DESC, id DESC");
        push_pagination(&mut query, &mut params_vec, filter.pagination);

        let mut stmt = self
            .connection
            .prepare(&query)
            .db_context("Failed to prepare query")?;

        let mut properties = stmt
            .query_map(&param_refs(&params_vec)[..], Self::build_property_from_row)
            .db_context("Failed to query properties")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch properties")?;

        for property in &mut properties {
            property.steps = self.steps_for_property(property.id)?;
        }

        Ok(properties)
    }

    /// Distinct non-empty neighborhoods, sorted.
    pub fn list_neighborhoods(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_NEIGHBORHOODS_SQL)
            .db_context("Failed to prepare query")?;

        let neighborhoods = stmt
            .query_map([], |row| row.get(0))
            .db_context("Failed to query neighborhoods")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch neighborhoods")?;

        Ok(neighborhoods)
    }
}
