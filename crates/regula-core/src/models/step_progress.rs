//! Ledger entry model.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::ProgressStatus;
use crate::overdue::days_between;

/// Execution state of one step definition for one property.
///
/// At most one entry exists per `(property_id, step_id)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepProgress {
    /// Unique identifier for the ledger entry
    pub id: u64,

    /// ID of the owning property
    pub property_id: u64,

    /// ID of the step definition being tracked
    pub step_id: u64,

    /// Name of the step definition (joined from the catalog)
    pub step_name: String,

    /// Sequence of the step definition (joined from the catalog)
    pub order_sequence: i64,

    /// Estimated duration of the step definition (joined from the catalog)
    pub estimated_duration_days: Option<u32>,

    /// Current status of the entry
    pub status: ProgressStatus,

    pub start_date: Option<Date>,
    pub end_date: Option<Date>,

    /// User responsible for carrying out the step
    pub responsible_user_id: Option<u64>,

    /// Completion percentage in `0..=100`
    pub completion_percentage: u8,

    pub observations: Option<String>,

    /// ID of the user whose action created the entry
    pub created_by: Option<u64>,

    /// Timestamp when the entry was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the entry was last updated (UTC)
    pub updated_at: Timestamp,
}

impl StepProgress {
    /// Number of days between start and end when both are set.
    pub fn duration_days(&self) -> Option<i64> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(days_between(start, end)),
            _ => None,
        }
    }
}
