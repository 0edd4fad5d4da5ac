//! Step catalog entry.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// One stage of the regularization workflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepDefinition {
    /// Unique identifier for the step definition
    pub id: u64,

    /// Display name
    pub name: String,

    /// Free-text description of the stage
    pub description: Option<String>,

    /// Position in the workflow; unique across the catalog
    pub order_sequence: i64,

    /// Expected number of days the stage takes once started
    pub estimated_duration_days: Option<u32>,

    /// Free-text list of documents the stage requires
    pub required_documents: Option<String>,

    /// Inactive definitions are skipped when bootstrapping new properties
    pub active: bool,

    /// Timestamp when the definition was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the definition was last updated (UTC)
    pub updated_at: Timestamp,
}
