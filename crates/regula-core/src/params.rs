//! Parameter structures for workflow operations.
//!
//! These structures are shared by every interface in front of the engine.
//! They carry loosely typed input (statuses and dates as strings, empty
//! strings meaning "clear") and have no framework derives beyond serde.
//! Interface layers wrap them with their own derives and convert with
//! `.into()`:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌──────────────────┐
//! │   CLI Args      │───▶│  Core Params    │───▶│ Validated models │
//! │  (clap derives) │    │ (serde derives) │    │   (TryFrom)      │
//! └─────────────────┘    └─────────────────┘    └──────────────────┘
//! ```
//!
//! Validation happens in the `TryFrom` conversions into the request and
//! filter types of [`crate::models`], before any transaction is opened.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorkflowError};

fn default_true() -> bool {
    true
}

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for registering a new property.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProperty {
    /// Street address (required)
    pub address_street: String,
    /// Municipal registration code, unique when given
    pub municipal_code: Option<String>,
    pub registry_number: Option<String>,
    pub address_number: Option<String>,
    pub address_neighborhood: Option<String>,
    /// Defaults to the municipality's own city
    pub address_city: Option<String>,
    pub address_zipcode: Option<String>,
    /// Total area in square meters
    pub area_total: Option<f64>,
    /// Built area in square meters
    pub area_built: Option<f64>,
    pub property_type: Option<String>,
    pub current_use: Option<String>,
    pub current_owner: Option<String>,
    /// One of 'pending', 'in_progress', 'municipal_registered',
    /// 'registry_completed'; defaults to 'pending'
    pub regularization_status: Option<String>,
    pub description: Option<String>,
    /// Opaque point geometry
    pub geometry: Option<String>,
    /// Opaque polygon geometry
    pub polygon_geometry: Option<String>,
}

/// Parameters for updating a property.
///
/// Absent fields are left untouched. An empty string clears an optional
/// field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProperty {
    /// Property ID to update (required)
    pub id: u64,
    pub address_street: Option<String>,
    pub municipal_code: Option<String>,
    pub registry_number: Option<String>,
    pub address_number: Option<String>,
    pub address_neighborhood: Option<String>,
    pub address_city: Option<String>,
    pub address_zipcode: Option<String>,
    pub area_total: Option<f64>,
    pub area_built: Option<f64>,
    pub property_type: Option<String>,
    pub current_use: Option<String>,
    pub current_owner: Option<String>,
    pub regularization_status: Option<String>,
    pub description: Option<String>,
    pub geometry: Option<String>,
    pub polygon_geometry: Option<String>,
}

/// Parameters for deleting a property and its ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteProperty {
    pub id: u64,
    /// Must be true; deletion cascades to ledger entries and documents
    #[serde(default)]
    pub confirmed: bool,
}

impl DeleteProperty {
    /// Rejects unconfirmed deletions.
    pub fn validate(&self) -> Result<()> {
        if !self.confirmed {
            return Err(WorkflowError::invalid_input("confirmed").with_reason(
                "Deleting a property removes its step records and documents; confirmation is required",
            ));
        }
        Ok(())
    }
}

/// Parameters for listing properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListProperties {
    /// Matches municipal code, street or owner (case-insensitive)
    pub search: Option<String>,
    /// Regularization status to filter by
    pub status: Option<String>,
    /// Neighborhood substring (case-insensitive)
    pub neighborhood: Option<String>,
    /// 1-based page number, used with `per_page`
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Parameters for creating a step definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStepDefinition {
    /// Display name (required)
    pub name: String,
    pub description: Option<String>,
    /// Position in the workflow, unique across the catalog
    pub order_sequence: i64,
    /// Expected duration in days, non-negative
    pub estimated_duration_days: Option<i64>,
    /// Free-text list of required documents
    pub required_documents: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl Default for CreateStepDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            order_sequence: 0,
            estimated_duration_days: None,
            required_documents: None,
            active: true,
        }
    }
}

/// Parameters for updating a step definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStepDefinition {
    /// Step definition ID to update (required)
    pub id: u64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub order_sequence: Option<i64>,
    /// Number of days; an empty string clears the estimate
    pub estimated_duration_days: Option<String>,
    pub required_documents: Option<String>,
    pub active: Option<bool>,
}

/// Parameters for listing the step catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListStepDefinitions {
    /// Only return active definitions
    #[serde(default)]
    pub active_only: bool,
}

/// Parameters for reordering the step catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReorderSteps {
    /// Step definition IDs in their new relative order
    pub ids: Vec<u64>,
}

impl ReorderSteps {
    /// Checks the list is non-empty and free of duplicates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use regula_core::params::ReorderSteps;
    ///
    /// assert!(ReorderSteps { ids: vec![2, 1] }.validate().is_ok());
    /// assert!(ReorderSteps { ids: vec![] }.validate().is_err());
    /// assert!(ReorderSteps { ids: vec![1, 2, 1] }.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.ids.is_empty() {
            return Err(WorkflowError::invalid_input("ids")
                .with_reason("At least one step definition ID is required"));
        }

        let mut seen = HashSet::new();
        if let Some(duplicate) = self.ids.iter().find(|id| !seen.insert(**id)) {
            return Err(WorkflowError::invalid_input("ids")
                .with_reason(format!("Step definition {duplicate} is listed more than once")));
        }

        Ok(())
    }
}

/// A batch of step definitions read from a JSON array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportCatalog {
    pub definitions: Vec<CreateStepDefinition>,
}

impl ImportCatalog {
    /// Parses a JSON array of step definitions.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use regula_core::params::ImportCatalog;
    ///
    /// let batch = ImportCatalog::from_json(
    ///     r#"[{"name": "Survey", "order_sequence": 1, "estimated_duration_days": 15}]"#,
    /// )?;
    /// assert_eq!(batch.definitions.len(), 1);
    /// assert!(batch.definitions[0].active);
    /// # Ok::<(), regula_core::WorkflowError>(())
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Parameters for adding a ledger entry to an existing property.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateStepProgress {
    pub property_id: u64,
    pub step_id: u64,
}

/// Parameters for updating a ledger entry.
///
/// Dates use `YYYY-MM-DD`. An empty string clears a date, the responsible
/// user or the observations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStepProgress {
    /// Ledger entry ID to update (required)
    pub id: u64,
    /// One of 'not_started', 'in_progress', 'completed', 'blocked'
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// User ID; an empty string clears it
    pub responsible_user_id: Option<String>,
    pub observations: Option<String>,
    /// Percentage in `0..=100`; forced to 100 when completing
    pub completion_percentage: Option<i64>,
}

/// Parameters for listing ledger entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListStepProgress {
    pub property_id: Option<u64>,
    pub step_id: Option<u64>,
    pub status: Option<String>,
    pub responsible_user_id: Option<u64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Parameters for recording a document attached to a ledger entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttachDocument {
    pub step_progress_id: u64,
    /// Original file name; must carry an allowed extension
    pub filename: String,
    /// Location of the stored file
    pub file_path: String,
    pub file_size: Option<u64>,
    /// MIME type
    pub file_type: Option<String>,
    pub document_type: Option<String>,
    pub description: Option<String>,
}

/// Parameters for editing document metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDocument {
    pub id: u64,
    pub document_type: Option<String>,
    pub description: Option<String>,
}

/// Parameters for listing documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListDocuments {
    pub step_progress_id: Option<u64>,
    /// Document type substring (case-insensitive)
    pub document_type: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Parameters for the overdue report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOverdue {
    /// Restrict to one property; fleet-wide when absent
    pub property_id: Option<u64>,
}

/// Parameters for the recent activity report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentActivity {
    /// Number of entries, 10 when absent
    pub limit: Option<u32>,
}

impl RecentActivity {
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_delete_property_requires_confirmation() {
        let params = DeleteProperty {
            id: 1,
            confirmed: false,
        };
        match params.validate().unwrap_err() {
            WorkflowError::InvalidInput { field, .. } => assert_eq!(field, "confirmed"),
            other => panic!("Expected InvalidInput error, got {other:?}"),
        }

        assert!(DeleteProperty {
            id: 1,
            confirmed: true
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn test_reorder_rejects_duplicates() {
        let err = ReorderSteps { ids: vec![3, 1, 3] }.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("Step definition 3"));
    }

    #[test]
    fn test_import_catalog_defaults() {
        let batch = ImportCatalog::from_json(
            r#"[
                {"name": "Survey", "order_sequence": 1},
                {"name": "Archive", "order_sequence": 9, "active": false}
            ]"#,
        )
        .unwrap();

        assert_eq!(batch.definitions.len(), 2);
        assert!(batch.definitions[0].active);
        assert_eq!(batch.definitions[0].estimated_duration_days, None);
        assert!(!batch.definitions[1].active);
    }

    #[test]
    fn test_import_catalog_rejects_malformed_json() {
        let err = ImportCatalog::from_json(r#"{"name": "Survey"}"#).unwrap_err();
        assert!(matches!(err, WorkflowError::Serialization { .. }));
    }

    #[test]
    fn test_recent_activity_default_limit() {
        assert_eq!(RecentActivity::default().limit(), 10);
        assert_eq!(RecentActivity { limit: Some(3) }.limit(), 3);
    }
}
