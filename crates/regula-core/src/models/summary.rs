//! Progress summaries and report records.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::{ProgressStatus, Property, RegularizationStatus};

/// Completion statistics over a set of ledger entries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub total_steps: u32,
    pub completed_steps: u32,
    /// Completed share in percent, rounded to 2 decimals
    pub completion_percentage: f64,
}

/// A property with its ordered ledger, completion summary and overdue
/// entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyProgress {
    pub property: Property,
    pub summary: ProgressSummary,
    pub overdue: Vec<OverdueEntry>,
}

/// A ledger entry that is still in progress past its expected end date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueEntry {
    pub step_progress_id: u64,
    pub property_id: u64,
    pub municipal_code: Option<String>,
    pub property_address: String,
    pub step_id: u64,
    pub step_name: String,
    pub start_date: Date,
    pub expected_end_date: Date,
    pub days_overdue: i64,
    pub responsible_user_id: Option<u64>,
}

/// Number of records in one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount<S> {
    pub status: S,
    pub count: u64,
}

/// Ledger status counts for one step definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepStatusBreakdown {
    pub step_id: u64,
    pub step_name: String,
    pub order_sequence: i64,
    pub not_started: u64,
    pub in_progress: u64,
    pub completed: u64,
    pub blocked: u64,
    pub total: u64,
}

impl StepStatusBreakdown {
    /// Count for a single status.
    pub fn count(&self, status: ProgressStatus) -> u64 {
        match status {
            ProgressStatus::NotStarted => self.not_started,
            ProgressStatus::InProgress => self.in_progress,
            ProgressStatus::Completed => self.completed,
            ProgressStatus::Blocked => self.blocked,
        }
    }
}

/// Mean duration of completed entries of one step definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDurationAverage {
    pub step_id: u64,
    pub step_name: String,
    pub order_sequence: i64,
    /// Mean of `end_date - start_date` in days, 0 without samples
    pub average_duration_days: f64,
    /// Number of completed entries with both dates set
    pub sample_size: u64,
}

/// Fleet-wide status distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub property_statuses: Vec<StatusCount<RegularizationStatus>>,
    pub step_statuses: Vec<StatusCount<ProgressStatus>>,
    pub steps: Vec<StepStatusBreakdown>,
}

/// Headline counters of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    pub total_properties: u64,
    pub properties_pending: u64,
    pub properties_in_progress: u64,
    pub properties_municipal_registered: u64,
    pub properties_registry_completed: u64,
    pub total_step_records: u64,
    pub steps_not_started: u64,
    pub steps_in_progress: u64,
    pub steps_completed: u64,
    pub steps_blocked: u64,
    pub total_documents: u64,
}

/// Number of properties in a neighborhood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborhoodCount {
    pub neighborhood: String,
    pub count: u64,
}

/// Completed ledger entries per calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCompletion {
    /// `YYYY-MM`
    pub month: String,
    pub completed_steps: u64,
}

/// A recently updated ledger entry with its context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentActivity {
    pub step_progress_id: u64,
    pub property_id: u64,
    pub municipal_code: Option<String>,
    pub property_address: String,
    pub step_name: String,
    pub status: ProgressStatus,
    pub responsible_user_id: Option<u64>,
    pub updated_at: Timestamp,
}

/// Durations and completion rate across the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub average_durations: Vec<StepDurationAverage>,
    /// Completed share of all ledger entries in percent, 2 decimals
    pub completion_rate: f64,
    pub total_steps: u64,
    pub completed_steps: u64,
}
