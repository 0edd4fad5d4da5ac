//! Data models for the regularization workflow.
//!
//! This module contains the domain models of the engine: the step catalog
//! ([`StepDefinition`]), the property registry ([`Property`]), the
//! step-progress ledger ([`StepProgress`]) and supporting [`Document`]
//! metadata. Display implementations live in [`crate::display::models`].
//!
//! Validated request types ([`requests`]) sit between the loosely typed
//! interface parameters in [`crate::params`] and the database layer; report
//! records produced by the aggregator are in [`summary`].
//!
//! # Examples
//!
//! ```rust
//! use regula_core::models::{ProgressStatus, RegularizationStatus};
//!
//! assert_eq!("in_progress".parse::<ProgressStatus>(), Ok(ProgressStatus::InProgress));
//! assert_eq!(RegularizationStatus::default(), RegularizationStatus::Pending);
//! ```

pub mod document;
pub mod filters;
pub mod property;
pub mod requests;
pub mod status;
pub mod step_definition;
pub mod step_progress;
pub mod summary;

#[cfg(test)]
mod tests;

pub use document::Document;
pub use filters::{DocumentFilter, Pagination, PropertyFilter, StepProgressFilter};
pub use property::{format_address, Property, DEFAULT_CITY};
pub use requests::{
    DocumentPatch, NewDocument, NewProperty, NewStepDefinition, PropertyPatch,
    StepDefinitionPatch, StepProgressPatch,
};
pub use status::{ProgressStatus, RegularizationStatus};
pub use step_definition::StepDefinition;
pub use step_progress::StepProgress;
pub use summary::{
    MonthlyCompletion, NeighborhoodCount, OverdueEntry, Overview, PerformanceMetrics,
    ProgressSummary, PropertyProgress, RecentActivity, Statistics, StatusCount,
    StepDurationAverage, StepStatusBreakdown,
};
