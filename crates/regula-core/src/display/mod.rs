//! Markdown formatting for domain models, collections, operation results and
//! reports.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]).
//! Collections are wrapped in newtypes that handle the empty case, and
//! mutations are wrapped in result types that prefix a confirmation line:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  Domain Models  │    │   Collections   │    │    Markdown     │
//! │ (Property, ...) │───▶│ & Result Types  │───▶│     Output      │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! - [`collections`]: `Properties`, `StepDefinitions`, `StepRecords`,
//!   `Documents`, `OverdueEntries`
//! - [`results`]: `CreateResult`, `UpdateResult`, `DeleteResult`
//! - [`reports`]: progress summaries and dashboard reports
//! - [`status`]: `OperationStatus`
//! - [`datetime`]: timestamp and date formatting
//!
//! # Examples
//!
//! ```rust
//! use regula_core::display::{OperationStatus, Properties};
//!
//! assert_eq!(Properties(vec![]).to_string(), "No properties found.\n");
//!
//! let status = OperationStatus::success("Catalog imported".to_string());
//! assert_eq!(status.to_string(), "Success: Catalog imported\n");
//! ```

pub mod collections;
pub mod datetime;
pub mod models;
pub mod reports;
pub mod results;
pub mod status;

pub use collections::{
    Documents, MonthlyCompletions, NeighborhoodCounts, OverdueEntries, Properties,
    RecentActivities, StepDefinitions, StepRecords,
};
pub use datetime::{LocalDateTime, OptionalDate};
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;
