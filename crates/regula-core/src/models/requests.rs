//! Validated request types for creating and updating models.
//!
//! Interface-facing parameters in [`crate::params`] carry loosely typed
//! values (strings for statuses and dates). They are converted into the
//! types below with `TryFrom`, which performs all input validation before a
//! transaction is opened.

use std::str::FromStr;

use jiff::civil::Date;

use super::{
    document::is_allowed_filename, ProgressStatus, RegularizationStatus, StepProgress,
    DEFAULT_CITY,
};
use crate::{
    error::{Result, WorkflowError},
    params,
};

/// Fields of a new property.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProperty {
    pub municipal_code: Option<String>,
    pub registry_number: Option<String>,
    pub address_street: String,
    pub address_number: Option<String>,
    pub address_neighborhood: Option<String>,
    pub address_city: Option<String>,
    pub address_zipcode: Option<String>,
    pub area_total: Option<f64>,
    pub area_built: Option<f64>,
    pub property_type: Option<String>,
    pub current_use: Option<String>,
    pub current_owner: Option<String>,
    pub regularization_status: RegularizationStatus,
    pub description: Option<String>,
    pub geometry: Option<String>,
    pub polygon_geometry: Option<String>,
}

/// Partial update of a property. `None` leaves a field untouched; for
/// optional columns `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyPatch {
    pub municipal_code: Option<Option<String>>,
    pub registry_number: Option<Option<String>>,
    pub address_street: Option<String>,
    pub address_number: Option<Option<String>>,
    pub address_neighborhood: Option<Option<String>>,
    pub address_city: Option<Option<String>>,
    pub address_zipcode: Option<Option<String>>,
    pub area_total: Option<Option<f64>>,
    pub area_built: Option<Option<f64>>,
    pub property_type: Option<Option<String>>,
    pub current_use: Option<Option<String>>,
    pub current_owner: Option<Option<String>>,
    pub regularization_status: Option<RegularizationStatus>,
    pub description: Option<Option<String>>,
    pub geometry: Option<Option<String>>,
    pub polygon_geometry: Option<Option<String>>,
}

impl TryFrom<params::CreateProperty> for NewProperty {
    type Error = WorkflowError;

    /// Validates a property registration.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::InvalidInput` - When the street is empty, the status
    ///   is unknown or an area is negative
    fn try_from(params: params::CreateProperty) -> Result<Self> {
        let address_street = required_text("address_street", &params.address_street)?;
        let regularization_status = match params.regularization_status.as_deref() {
            Some(raw) => parse_status::<RegularizationStatus>("regularization_status", raw)?,
            None => RegularizationStatus::default(),
        };

        Ok(Self {
            municipal_code: optional_text(params.municipal_code),
            registry_number: optional_text(params.registry_number),
            address_street,
            address_number: optional_text(params.address_number),
            address_neighborhood: optional_text(params.address_neighborhood),
            address_city: optional_text(params.address_city)
                .or_else(|| Some(DEFAULT_CITY.to_string())),
            address_zipcode: optional_text(params.address_zipcode),
            area_total: params
                .area_total
                .map(|a| validate_area("area_total", a))
                .transpose()?,
            area_built: params
                .area_built
                .map(|a| validate_area("area_built", a))
                .transpose()?,
            property_type: optional_text(params.property_type),
            current_use: optional_text(params.current_use),
            current_owner: optional_text(params.current_owner),
            regularization_status,
            description: optional_text(params.description),
            geometry: params.geometry.filter(|g| !g.trim().is_empty()),
            polygon_geometry: params.polygon_geometry.filter(|g| !g.trim().is_empty()),
        })
    }
}

impl TryFrom<params::UpdateProperty> for PropertyPatch {
    type Error = WorkflowError;

    fn try_from(params: params::UpdateProperty) -> Result<Self> {
        let address_street = params
            .address_street
            .as_deref()
            .map(|street| required_text("address_street", street))
            .transpose()?;
        let regularization_status = params
            .regularization_status
            .as_deref()
            .map(|raw| parse_status::<RegularizationStatus>("regularization_status", raw))
            .transpose()?;

        Ok(Self {
            municipal_code: clearable(params.municipal_code),
            registry_number: clearable(params.registry_number),
            address_street,
            address_number: clearable(params.address_number),
            address_neighborhood: clearable(params.address_neighborhood),
            address_city: clearable(params.address_city),
            address_zipcode: clearable(params.address_zipcode),
            area_total: params
                .area_total
                .map(|a| validate_area("area_total", a).map(Some))
                .transpose()?,
            area_built: params
                .area_built
                .map(|a| validate_area("area_built", a).map(Some))
                .transpose()?,
            property_type: clearable(params.property_type),
            current_use: clearable(params.current_use),
            current_owner: clearable(params.current_owner),
            regularization_status,
            description: clearable(params.description),
            // Geometry is opaque: only an empty value clears it
            geometry: params
                .geometry
                .map(|g| if g.trim().is_empty() { None } else { Some(g) }),
            polygon_geometry: params
                .polygon_geometry
                .map(|g| if g.trim().is_empty() { None } else { Some(g) }),
        })
    }
}

impl PropertyPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Fields of a new step definition.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStepDefinition {
    pub name: String,
    pub description: Option<String>,
    pub order_sequence: i64,
    pub estimated_duration_days: Option<u32>,
    pub required_documents: Option<String>,
    pub active: bool,
}

impl TryFrom<params::CreateStepDefinition> for NewStepDefinition {
    type Error = WorkflowError;

    fn try_from(params: params::CreateStepDefinition) -> Result<Self> {
        Ok(Self {
            name: required_text("name", &params.name)?,
            description: optional_text(params.description),
            order_sequence: params.order_sequence,
            estimated_duration_days: params
                .estimated_duration_days
                .map(validate_duration)
                .transpose()?,
            required_documents: optional_text(params.required_documents),
            active: params.active,
        })
    }
}

/// Partial update of a step definition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepDefinitionPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub order_sequence: Option<i64>,
    pub estimated_duration_days: Option<Option<u32>>,
    pub required_documents: Option<Option<String>>,
    pub active: Option<bool>,
}

impl StepDefinitionPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl TryFrom<params::UpdateStepDefinition> for StepDefinitionPatch {
    type Error = WorkflowError;

    fn try_from(params: params::UpdateStepDefinition) -> Result<Self> {
        let estimated_duration_days = match params.estimated_duration_days.as_deref().map(str::trim)
        {
            None => None,
            Some("") => Some(None),
            Some(raw) => {
                let days = raw.parse::<i64>().map_err(|_| {
                    WorkflowError::invalid_input("estimated_duration_days")
                        .with_reason(format!("Invalid number of days: {raw}"))
                })?;
                Some(Some(validate_duration(days)?))
            }
        };

        Ok(Self {
            name: params
                .name
                .as_deref()
                .map(|name| required_text("name", name))
                .transpose()?,
            description: clearable(params.description),
            order_sequence: params.order_sequence,
            estimated_duration_days,
            required_documents: clearable(params.required_documents),
            active: params.active,
        })
    }
}

/// Partial update of a ledger entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepProgressPatch {
    pub status: Option<ProgressStatus>,
    pub start_date: Option<Option<Date>>,
    pub end_date: Option<Option<Date>>,
    pub responsible_user_id: Option<Option<u64>>,
    pub observations: Option<Option<String>>,
    pub completion_percentage: Option<u8>,
}

impl StepProgressPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Applies the patch to `entry` and returns the resulting entry.
    ///
    /// Status side effects:
    ///
    /// - `in_progress` sets `start_date` to `today` when the entry had none;
    ///   an explicit `start_date` in the same patch, including a clear, wins;
    /// - `completed` sets `end_date` to `today` when it is unset after the
    ///   explicit values are applied, and forces
    ///   `completion_percentage` to 100, overriding any percentage in the
    ///   same patch.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidInput` when the resulting start date
    /// falls after the end date. `entry` is never modified.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use regula_core::models::{ProgressStatus, StepProgress, StepProgressPatch};
    /// # use jiff::{civil::date, Timestamp};
    /// # let entry = StepProgress {
    /// #     id: 1, property_id: 1, step_id: 1, step_name: "Survey".into(),
    /// #     order_sequence: 1, estimated_duration_days: None,
    /// #     status: ProgressStatus::NotStarted, start_date: None, end_date: None,
    /// #     responsible_user_id: None, completion_percentage: 0, observations: None,
    /// #     created_by: None, created_at: Timestamp::UNIX_EPOCH,
    /// #     updated_at: Timestamp::UNIX_EPOCH,
    /// # };
    /// let patch = StepProgressPatch {
    ///     status: Some(ProgressStatus::Completed),
    ///     completion_percentage: Some(40),
    ///     ..Default::default()
    /// };
    /// let updated = patch.apply_to(&entry, date(2024, 5, 2))?;
    /// assert_eq!(updated.completion_percentage, 100);
    /// assert_eq!(updated.end_date, Some(date(2024, 5, 2)));
    /// # Ok::<(), regula_core::WorkflowError>(())
    /// ```
    pub fn apply_to(&self, entry: &StepProgress, today: Date) -> Result<StepProgress> {
        let mut next = entry.clone();

        // Decided on the prior start date; explicit dates below override it
        if self.status == Some(ProgressStatus::InProgress) && entry.start_date.is_none() {
            next.start_date = Some(today);
        }

        if let Some(start_date) = self.start_date {
            next.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            next.end_date = end_date;
        }
        if let Some(responsible) = self.responsible_user_id {
            next.responsible_user_id = responsible;
        }
        if let Some(observations) = &self.observations {
            next.observations = observations.clone();
        }
        if let Some(percentage) = self.completion_percentage {
            next.completion_percentage = percentage;
        }

        if let Some(status) = self.status {
            next.status = status;
            if status == ProgressStatus::Completed {
                next.end_date.get_or_insert(today);
                next.completion_percentage = 100;
            }
        }

        if let (Some(start), Some(end)) = (next.start_date, next.end_date) {
            if start > end {
                return Err(WorkflowError::invalid_input("start_date").with_reason(format!(
                    "Start date {start} cannot be after end date {end}"
                )));
            }
        }

        Ok(next)
    }
}

impl TryFrom<params::UpdateStepProgress> for StepProgressPatch {
    type Error = WorkflowError;

    /// Parses and range-checks a ledger update.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::InvalidInput` - When the status is not one of the
    ///   four ledger statuses, a date is malformed, the responsible user is
    ///   not a number or the percentage is outside `0..=100`
    fn try_from(params: params::UpdateStepProgress) -> Result<Self> {
        let status = params
            .status
            .as_deref()
            .map(|raw| parse_status::<ProgressStatus>("status", raw))
            .transpose()?;

        let responsible_user_id = match params.responsible_user_id.as_deref().map(str::trim) {
            None => None,
            Some("") => Some(None),
            Some(raw) => Some(Some(raw.parse::<u64>().map_err(|_| {
                WorkflowError::invalid_input("responsible_user_id")
                    .with_reason(format!("Invalid user ID: {raw}"))
            })?)),
        };

        Ok(Self {
            status,
            start_date: clearable_date("start_date", params.start_date.as_deref())?,
            end_date: clearable_date("end_date", params.end_date.as_deref())?,
            responsible_user_id,
            observations: clearable(params.observations),
            completion_percentage: params
                .completion_percentage
                .map(validate_percentage)
                .transpose()?,
        })
    }
}

/// Fields of a new document record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewDocument {
    pub step_progress_id: u64,
    pub filename: String,
    pub file_path: String,
    pub file_size: Option<u64>,
    pub file_type: Option<String>,
    pub document_type: Option<String>,
    pub description: Option<String>,
}

impl TryFrom<params::AttachDocument> for NewDocument {
    type Error = WorkflowError;

    fn try_from(params: params::AttachDocument) -> Result<Self> {
        let filename = required_text("filename", &params.filename)?;
        if !is_allowed_filename(&filename) {
            return Err(WorkflowError::invalid_input("filename")
                .with_reason(format!("File type not allowed: {filename}")));
        }

        Ok(Self {
            step_progress_id: params.step_progress_id,
            filename,
            file_path: required_text("file_path", &params.file_path)?,
            file_size: params.file_size,
            file_type: optional_text(params.file_type),
            document_type: optional_text(params.document_type),
            description: optional_text(params.description),
        })
    }
}

/// Partial update of a document record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentPatch {
    pub document_type: Option<Option<String>>,
    pub description: Option<Option<String>>,
}

impl From<params::UpdateDocument> for DocumentPatch {
    fn from(params: params::UpdateDocument) -> Self {
        Self {
            document_type: clearable(params.document_type),
            description: clearable(params.description),
        }
    }
}

/// Parses a status string, reporting the accepted values on failure.
pub(crate) fn parse_status<S>(field: &str, raw: &str) -> Result<S>
where
    S: FromStr<Err = String> + StatusValues,
{
    raw.trim().parse::<S>().map_err(|_| {
        WorkflowError::invalid_input(field).with_reason(format!(
            "Invalid status: {raw}. Must be one of {}",
            S::accepted()
        ))
    })
}

/// Status enums that can list their accepted string values.
pub(crate) trait StatusValues {
    fn accepted() -> String;
}

impl StatusValues for ProgressStatus {
    fn accepted() -> String {
        quoted(ProgressStatus::ALL.iter().map(|s| s.as_str()))
    }
}

impl StatusValues for RegularizationStatus {
    fn accepted() -> String {
        quoted(RegularizationStatus::ALL.iter().map(|s| s.as_str()))
    }
}

fn quoted<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Trimmed text that must not be empty.
fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(WorkflowError::invalid_input(field).with_reason("Value is required"));
    }
    Ok(trimmed.to_string())
}

/// Trimmed text, `None` when absent or empty.
fn optional_text(value: Option<String>) -> Option<String> {
    clearable(value).flatten()
}

fn validate_area(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(WorkflowError::invalid_input(field)
            .with_reason(format!("Area must be a non-negative number, got {value}")));
    }
    Ok(value)
}

/// Turns an interface string into a patch value: `None` when absent,
/// `Some(None)` when empty (clear), `Some(Some(v))` otherwise.
pub(crate) fn clearable(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parses an optional ISO date where an empty string clears the value.
pub(crate) fn clearable_date(field: &str, value: Option<&str>) -> Result<Option<Option<Date>>> {
    match value.map(str::trim) {
        None => Ok(None),
        Some("") => Ok(Some(None)),
        Some(raw) => raw.parse::<Date>().map(|d| Some(Some(d))).map_err(|_| {
            WorkflowError::invalid_input(field)
                .with_reason(format!("Invalid date '{raw}'. Expected YYYY-MM-DD"))
        }),
    }
}

/// Checks a percentage is within `0..=100`.
pub(crate) fn validate_percentage(value: i64) -> Result<u8> {
    u8::try_from(value)
        .ok()
        .filter(|p| *p <= 100)
        .ok_or_else(|| {
            WorkflowError::invalid_input("completion_percentage")
                .with_reason(format!("Percentage must be between 0 and 100, got {value}"))
        })
}

/// Checks an estimated duration is non-negative and representable.
pub(crate) fn validate_duration(value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        WorkflowError::invalid_input("estimated_duration_days")
            .with_reason(format!("Duration must be a non-negative number of days, got {value}"))
    })
}
