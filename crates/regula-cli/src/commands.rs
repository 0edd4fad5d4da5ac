//! Clap argument wrappers for every command.
//!
//! Core parameter types in [`regula_core::params`] stay free of clap
//! derives. Each wrapper below adds flags and help text and converts into its
//! core counterpart with `From`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Workflow
//! ```

use std::{fmt, path::PathBuf};

use clap::{Args, Subcommand, ValueEnum};
use regula_core::params::*;

// ============================================================================
// Shared value types
// ============================================================================

/// Ledger entry status accepted by `--status`
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum ProgressStatusArg {
    NotStarted,
    InProgress,
    Completed,
    Blocked,
}

impl fmt::Display for ProgressStatusArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressStatusArg::NotStarted => write!(f, "not_started"),
            ProgressStatusArg::InProgress => write!(f, "in_progress"),
            ProgressStatusArg::Completed => write!(f, "completed"),
            ProgressStatusArg::Blocked => write!(f, "blocked"),
        }
    }
}

/// Property regularization status accepted by `--status`
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum RegularizationStatusArg {
    Pending,
    InProgress,
    MunicipalRegistered,
    RegistryCompleted,
}

impl fmt::Display for RegularizationStatusArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegularizationStatusArg::Pending => write!(f, "pending"),
            RegularizationStatusArg::InProgress => write!(f, "in_progress"),
            RegularizationStatusArg::MunicipalRegistered => write!(f, "municipal_registered"),
            RegularizationStatusArg::RegistryCompleted => write!(f, "registry_completed"),
        }
    }
}

/// A single record ID
#[derive(Args)]
pub struct IdArgs {
    pub id: u64,
}

impl From<IdArgs> for Id {
    fn from(val: IdArgs) -> Self {
        Id { id: val.id }
    }
}

/// Page window for list commands
#[derive(Args)]
pub struct PageArgs {
    /// 1-based page number, used with --per-page
    #[arg(long)]
    pub page: Option<u32>,
    /// Number of records per page
    #[arg(long)]
    pub per_page: Option<u32>,
}

// ============================================================================
// Property commands
// ============================================================================

/// Descriptive fields shared by property create and update
#[derive(Args)]
pub struct PropertyFields {
    /// Municipal registration code, unique across properties
    #[arg(long)]
    pub municipal_code: Option<String>,
    /// Land registry number
    #[arg(long)]
    pub registry_number: Option<String>,
    /// Street number
    #[arg(long)]
    pub number: Option<String>,
    #[arg(long)]
    pub neighborhood: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub zipcode: Option<String>,
    /// Total lot area in square meters
    #[arg(long)]
    pub area_total: Option<f64>,
    /// Built area in square meters
    #[arg(long)]
    pub area_built: Option<f64>,
    #[arg(long = "type")]
    pub property_type: Option<String>,
    #[arg(long = "use")]
    pub current_use: Option<String>,
    #[arg(long)]
    pub owner: Option<String>,
    #[arg(short, long)]
    pub status: Option<RegularizationStatusArg>,
    #[arg(short, long)]
    pub description: Option<String>,
    /// Geometry as opaque text (e.g. GeoJSON)
    #[arg(long)]
    pub geometry: Option<String>,
    #[arg(long)]
    pub polygon_geometry: Option<String>,
}

/// Register a new property
#[derive(Args)]
pub struct CreatePropertyArgs {
    /// Street of the property address
    pub street: String,
    #[command(flatten)]
    pub fields: PropertyFields,
}

impl From<CreatePropertyArgs> for CreateProperty {
    fn from(val: CreatePropertyArgs) -> Self {
        let fields = val.fields;
        CreateProperty {
            address_street: val.street,
            municipal_code: fields.municipal_code,
            registry_number: fields.registry_number,
            address_number: fields.number,
            address_neighborhood: fields.neighborhood,
            address_city: fields.city,
            address_zipcode: fields.zipcode,
            area_total: fields.area_total,
            area_built: fields.area_built,
            property_type: fields.property_type,
            current_use: fields.current_use,
            current_owner: fields.owner,
            regularization_status: fields.status.map(|s| s.to_string()),
            description: fields.description,
            geometry: fields.geometry,
            polygon_geometry: fields.polygon_geometry,
        }
    }
}

/// Update a property
///
/// Only the given fields change. Pass an empty string to clear an optional
/// field.
#[derive(Args)]
pub struct UpdatePropertyArgs {
    pub id: u64,
    #[arg(long)]
    pub street: Option<String>,
    #[command(flatten)]
    pub fields: PropertyFields,
}

impl From<UpdatePropertyArgs> for UpdateProperty {
    fn from(val: UpdatePropertyArgs) -> Self {
        let fields = val.fields;
        UpdateProperty {
            id: val.id,
            address_street: val.street,
            municipal_code: fields.municipal_code,
            registry_number: fields.registry_number,
            address_number: fields.number,
            address_neighborhood: fields.neighborhood,
            address_city: fields.city,
            address_zipcode: fields.zipcode,
            area_total: fields.area_total,
            area_built: fields.area_built,
            property_type: fields.property_type,
            current_use: fields.current_use,
            current_owner: fields.owner,
            regularization_status: fields.status.map(|s| s.to_string()),
            description: fields.description,
            geometry: fields.geometry,
            polygon_geometry: fields.polygon_geometry,
        }
    }
}

/// Delete a property with its step records and documents
#[derive(Args)]
pub struct DeletePropertyArgs {
    pub id: u64,
    /// Confirm the deletion (required to prevent accidental deletion)
    #[arg(long)]
    pub confirm: bool,
}

impl From<DeletePropertyArgs> for DeleteProperty {
    fn from(val: DeletePropertyArgs) -> Self {
        DeleteProperty {
            id: val.id,
            confirmed: val.confirm,
        }
    }
}

/// List properties, newest first
#[derive(Args)]
pub struct ListPropertiesArgs {
    /// Match municipal code, street or owner
    #[arg(short = 'q', long)]
    pub search: Option<String>,
    #[arg(short, long)]
    pub status: Option<RegularizationStatusArg>,
    #[arg(long)]
    pub neighborhood: Option<String>,
    #[command(flatten)]
    pub page: PageArgs,
}

impl From<ListPropertiesArgs> for ListProperties {
    fn from(val: ListPropertiesArgs) -> Self {
        ListProperties {
            search: val.search,
            status: val.status.map(|s| s.to_string()),
            neighborhood: val.neighborhood,
            page: val.page.page,
            per_page: val.page.per_page,
        }
    }
}

#[derive(Subcommand)]
pub enum PropertyCommands {
    /// Register a new property
    #[command(alias = "c")]
    Create(CreatePropertyArgs),
    /// List properties
    #[command(aliases = ["l", "ls"])]
    List(ListPropertiesArgs),
    /// Show a property with its step records
    #[command(alias = "s")]
    Show(IdArgs),
    /// Update a property
    #[command(alias = "u")]
    Update(UpdatePropertyArgs),
    /// Delete a property permanently
    #[command(aliases = ["d", "rm"])]
    Delete(DeletePropertyArgs),
    /// List the neighborhoods in use
    Neighborhoods,
}

// ============================================================================
// Catalog commands
// ============================================================================

/// Add a step definition to the catalog
#[derive(Args)]
pub struct AddStepDefinitionArgs {
    pub name: String,
    /// Position in the workflow, unique across the catalog
    #[arg(short, long)]
    pub order: i64,
    /// Estimated duration in days
    #[arg(long)]
    pub duration: Option<i64>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(long)]
    pub required_documents: Option<String>,
    /// Create the definition as inactive
    #[arg(long)]
    pub inactive: bool,
}

impl From<AddStepDefinitionArgs> for CreateStepDefinition {
    fn from(val: AddStepDefinitionArgs) -> Self {
        CreateStepDefinition {
            name: val.name,
            description: val.description,
            order_sequence: val.order,
            estimated_duration_days: val.duration,
            required_documents: val.required_documents,
            active: !val.inactive,
        }
    }
}

/// Update a step definition
#[derive(Args)]
pub struct UpdateStepDefinitionArgs {
    pub id: u64,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(short, long)]
    pub order: Option<i64>,
    /// Estimated duration in days, empty to clear
    #[arg(long)]
    pub duration: Option<String>,
    #[arg(long)]
    pub required_documents: Option<String>,
    /// Whether new properties track this step
    #[arg(long)]
    pub active: Option<bool>,
}

impl From<UpdateStepDefinitionArgs> for UpdateStepDefinition {
    fn from(val: UpdateStepDefinitionArgs) -> Self {
        UpdateStepDefinition {
            id: val.id,
            name: val.name,
            description: val.description,
            order_sequence: val.order,
            estimated_duration_days: val.duration,
            required_documents: val.required_documents,
            active: val.active,
        }
    }
}

#[derive(Args)]
pub struct ListStepDefinitionsArgs {
    /// Only list active definitions
    #[arg(long)]
    pub active_only: bool,
}

impl From<ListStepDefinitionsArgs> for ListStepDefinitions {
    fn from(val: ListStepDefinitionsArgs) -> Self {
        ListStepDefinitions {
            active_only: val.active_only,
        }
    }
}

/// Reorder step definitions
///
/// The listed definitions are permuted within the positions they already
/// occupy: the first ID takes the lowest position.
#[derive(Args)]
pub struct ReorderStepsArgs {
    /// Step definition IDs in their new order, comma-separated
    #[arg(value_delimiter = ',', required = true)]
    pub ids: Vec<u64>,
}

impl From<ReorderStepsArgs> for ReorderSteps {
    fn from(val: ReorderStepsArgs) -> Self {
        ReorderSteps { ids: val.ids }
    }
}

/// Import step definitions from a JSON array
#[derive(Args)]
pub struct ImportCatalogArgs {
    /// JSON file with an array of step definitions
    pub file: PathBuf,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Add a step definition
    #[command(alias = "a")]
    Add(AddStepDefinitionArgs),
    /// List the catalog in workflow order
    #[command(aliases = ["l", "ls"])]
    List(ListStepDefinitionsArgs),
    /// Show a step definition
    #[command(alias = "s")]
    Show(IdArgs),
    /// Update a step definition
    #[command(alias = "u")]
    Update(UpdateStepDefinitionArgs),
    /// Delete a step definition no property tracks
    #[command(aliases = ["d", "rm"])]
    Delete(IdArgs),
    /// Reorder step definitions
    Reorder(ReorderStepsArgs),
    /// Import step definitions from a JSON file
    Import(ImportCatalogArgs),
}

// ============================================================================
// Ledger commands
// ============================================================================

/// Start tracking a step on a property
#[derive(Args)]
pub struct TrackStepArgs {
    pub property_id: u64,
    pub step_id: u64,
}

impl From<TrackStepArgs> for CreateStepProgress {
    fn from(val: TrackStepArgs) -> Self {
        CreateStepProgress {
            property_id: val.property_id,
            step_id: val.step_id,
        }
    }
}

/// Update a step record
///
/// `in_progress` sets the start date to today when unset. `completed` sets
/// the end date to today when unset and the completion to 100%.
#[derive(Args)]
pub struct UpdateStepProgressArgs {
    pub id: u64,
    #[arg(short, long)]
    pub status: Option<ProgressStatusArg>,
    /// Start date (YYYY-MM-DD), empty to clear
    #[arg(long)]
    pub start_date: Option<String>,
    /// End date (YYYY-MM-DD), empty to clear
    #[arg(long)]
    pub end_date: Option<String>,
    /// ID of the responsible user, empty to clear
    #[arg(short, long)]
    pub responsible: Option<String>,
    #[arg(long)]
    pub observations: Option<String>,
    /// Completion percentage between 0 and 100
    #[arg(short, long)]
    pub percentage: Option<i64>,
}

impl From<UpdateStepProgressArgs> for UpdateStepProgress {
    fn from(val: UpdateStepProgressArgs) -> Self {
        UpdateStepProgress {
            id: val.id,
            status: val.status.map(|s| s.to_string()),
            start_date: val.start_date,
            end_date: val.end_date,
            responsible_user_id: val.responsible,
            observations: val.observations,
            completion_percentage: val.percentage,
        }
    }
}

#[derive(Args)]
pub struct ListStepProgressArgs {
    #[arg(long)]
    pub property: Option<u64>,
    #[arg(long)]
    pub step: Option<u64>,
    #[arg(short, long)]
    pub status: Option<ProgressStatusArg>,
    #[arg(short, long)]
    pub responsible: Option<u64>,
    #[command(flatten)]
    pub page: PageArgs,
}

impl From<ListStepProgressArgs> for ListStepProgress {
    fn from(val: ListStepProgressArgs) -> Self {
        ListStepProgress {
            property_id: val.property,
            step_id: val.step,
            status: val.status.map(|s| s.to_string()),
            responsible_user_id: val.responsible,
            page: val.page.page,
            per_page: val.page.per_page,
        }
    }
}

#[derive(Subcommand)]
pub enum LedgerCommands {
    /// Start tracking a step on a property
    #[command(alias = "t")]
    Track(TrackStepArgs),
    /// Update a step record
    #[command(alias = "u")]
    Update(UpdateStepProgressArgs),
    /// Show a step record
    #[command(alias = "s")]
    Show(IdArgs),
    /// List step records
    #[command(aliases = ["l", "ls"])]
    List(ListStepProgressArgs),
    /// List the accepted step statuses
    Statuses,
}

// ============================================================================
// Document commands
// ============================================================================

/// Record a document attached to a step record
#[derive(Args)]
pub struct AttachDocumentArgs {
    pub step_progress_id: u64,
    /// Original file name; the extension must be an allowed type
    pub filename: String,
    /// Where the file is stored
    pub file_path: String,
    /// File size in bytes
    #[arg(long)]
    pub size: Option<u64>,
    /// MIME type
    #[arg(long)]
    pub file_type: Option<String>,
    /// Document category, e.g. deed or survey
    #[arg(long = "type")]
    pub document_type: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
}

impl From<AttachDocumentArgs> for AttachDocument {
    fn from(val: AttachDocumentArgs) -> Self {
        AttachDocument {
            step_progress_id: val.step_progress_id,
            filename: val.filename,
            file_path: val.file_path,
            file_size: val.size,
            file_type: val.file_type,
            document_type: val.document_type,
            description: val.description,
        }
    }
}

#[derive(Args)]
pub struct UpdateDocumentArgs {
    pub id: u64,
    /// Document category, empty to clear
    #[arg(long = "type")]
    pub document_type: Option<String>,
    /// Description, empty to clear
    #[arg(short, long)]
    pub description: Option<String>,
}

impl From<UpdateDocumentArgs> for UpdateDocument {
    fn from(val: UpdateDocumentArgs) -> Self {
        UpdateDocument {
            id: val.id,
            document_type: val.document_type,
            description: val.description,
        }
    }
}

#[derive(Args)]
pub struct ListDocumentsArgs {
    #[arg(long)]
    pub step_progress: Option<u64>,
    #[arg(long = "type")]
    pub document_type: Option<String>,
    #[command(flatten)]
    pub page: PageArgs,
}

impl From<ListDocumentsArgs> for ListDocuments {
    fn from(val: ListDocumentsArgs) -> Self {
        ListDocuments {
            step_progress_id: val.step_progress,
            document_type: val.document_type,
            page: val.page.page,
            per_page: val.page.per_page,
        }
    }
}

#[derive(Subcommand)]
pub enum DocumentCommands {
    /// Record a document attached to a step record
    #[command(alias = "a")]
    Attach(AttachDocumentArgs),
    /// List documents, newest first
    #[command(aliases = ["l", "ls"])]
    List(ListDocumentsArgs),
    /// Show a document
    #[command(alias = "s")]
    Show(IdArgs),
    /// Edit the type and description of a document
    #[command(alias = "u")]
    Update(UpdateDocumentArgs),
    /// Remove a document record
    #[command(aliases = ["d", "rm"])]
    Remove(IdArgs),
}

// ============================================================================
// Report commands
// ============================================================================

#[derive(Args)]
pub struct OverdueArgs {
    /// Restrict to one property; omit for the whole fleet
    #[arg(long)]
    pub property: Option<u64>,
}

impl From<OverdueArgs> for ListOverdue {
    fn from(val: OverdueArgs) -> Self {
        ListOverdue {
            property_id: val.property,
        }
    }
}

#[derive(Args)]
pub struct ActivityArgs {
    /// Number of entries to show
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,
}

impl From<ActivityArgs> for RecentActivity {
    fn from(val: ActivityArgs) -> Self {
        RecentActivity { limit: val.limit }
    }
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Completion summary and overdue steps of a property
    #[command(alias = "p")]
    Progress(IdArgs),
    /// Steps in progress past their estimated duration
    #[command(alias = "o")]
    Overdue(OverdueArgs),
    /// Status distribution across properties and steps
    Statistics,
    /// Headline counters
    Overview,
    /// Neighborhoods with most properties
    Neighborhoods,
    /// Completed steps per month over the last year
    Monthly,
    /// Recently updated step records
    Activity(ActivityArgs),
    /// Average step durations and completion rate
    Performance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_args_match_core_values() {
        use regula_core::{ProgressStatus, RegularizationStatus};

        for (arg, status) in [
            (ProgressStatusArg::NotStarted, ProgressStatus::NotStarted),
            (ProgressStatusArg::InProgress, ProgressStatus::InProgress),
            (ProgressStatusArg::Completed, ProgressStatus::Completed),
            (ProgressStatusArg::Blocked, ProgressStatus::Blocked),
        ] {
            assert_eq!(arg.to_string(), status.as_str());
        }

        assert_eq!(
            RegularizationStatusArg::MunicipalRegistered.to_string(),
            RegularizationStatus::MunicipalRegistered.as_str()
        );
    }

    #[test]
    fn test_add_step_definition_conversion() {
        let params = CreateStepDefinition::from(AddStepDefinitionArgs {
            name: "Survey".to_string(),
            order: 2,
            duration: Some(15),
            description: None,
            required_documents: None,
            inactive: true,
        });

        assert_eq!(params.order_sequence, 2);
        assert_eq!(params.estimated_duration_days, Some(15));
        assert!(!params.active);
    }
}
