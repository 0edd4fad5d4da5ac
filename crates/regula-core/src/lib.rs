//! Core library for the Regula property regularization workflow.
//!
//! Regula tracks properties through a configurable catalog of regularization
//! steps. Every property carries one ledger entry per tracked step, and the
//! engine enforces status transition side effects, detects overdue work and
//! aggregates progress across the fleet.
//!
//! - [`models`]: domain types and validated requests
//! - [`params`]: loosely typed interface parameters
//! - [`db`]: SQLite persistence
//! - [`workflow`]: the async [`Workflow`] facade used by interfaces
//! - [`progress`] and [`overdue`]: pure aggregation and date rules
//! - [`display`]: markdown formatting for the terminal
//! - [`access`]: roles and capabilities checked at the boundary
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use regula_core::{params::{CreateProperty, CreateStepDefinition}, WorkflowBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let workflow = WorkflowBuilder::new()
//!     .with_database_path(Some("regula.db"))
//!     .build()
//!     .await?;
//!
//! workflow
//!     .create_step_definition(&CreateStepDefinition {
//!         name: "Topographic survey".to_string(),
//!         order_sequence: 1,
//!         estimated_duration_days: Some(15),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let property = workflow
//!     .create_property(
//!         &CreateProperty {
//!             address_street: "Rua Padre Roque".to_string(),
//!             ..Default::default()
//!         },
//!         None,
//!     )
//!     .await?;
//! println!("{property}");
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod clock;
pub mod db;
pub mod display;
pub mod error;
pub mod models;
pub mod overdue;
pub mod params;
pub mod progress;
pub mod workflow;

// Re-export commonly used types
pub use access::{Actor, Capability, Role};
pub use clock::{Clock, FixedClock, SharedClock, SystemClock};
pub use db::Database;
pub use display::{CreateResult, DeleteResult, OperationStatus, UpdateResult};
pub use error::{ErrorKind, Result, WorkflowError};
pub use models::{
    Document, ProgressStatus, Property, RegularizationStatus, StepDefinition, StepProgress,
};
pub use workflow::{Workflow, WorkflowBuilder};
