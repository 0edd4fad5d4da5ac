//! Progress, overdue and dashboard report operations for the Workflow.

use super::Workflow;
use crate::{
    db::report_queries::TOP_NEIGHBORHOODS,
    error::{Result, WorkflowError},
    models::{
        MonthlyCompletion, NeighborhoodCount, OverdueEntry, Overview, PerformanceMetrics,
        PropertyProgress, RecentActivity, Statistics,
    },
    params::{self, Id, ListOverdue},
};

impl Workflow {
    /// Completion summary of a property, with its ordered ledger and its
    /// overdue entries as of the workflow clock's date.
    pub async fn compute_progress(&self, params: &Id) -> Result<PropertyProgress> {
        let id = params.id;
        self.with_database(move |db| db.property_progress(id))
            .await
    }

    /// Overdue entries of one property, or of the whole fleet when no
    /// property is given. Most overdue first.
    pub async fn list_overdue(&self, params: &ListOverdue) -> Result<Vec<OverdueEntry>> {
        let property_id = params.property_id;
        self.with_database(move |db| {
            if let Some(id) = property_id {
                if db.get_property(id)?.is_none() {
                    return Err(WorkflowError::PropertyNotFound { id });
                }
            }
            db.list_overdue(property_id)
        })
        .await
    }

    /// Fleet-wide status distribution with a per-step breakdown.
    pub async fn statistics(&self) -> Result<Statistics> {
        self.with_database(|db| db.statistics()).await
    }

    pub async fn overview(&self) -> Result<Overview> {
        self.with_database(|db| db.overview()).await
    }

    /// Top neighborhoods by number of properties.
    pub async fn neighborhood_counts(&self) -> Result<Vec<NeighborhoodCount>> {
        self.with_database(|db| db.neighborhood_counts(TOP_NEIGHBORHOODS))
            .await
    }

    /// Completed steps per month over the last 12 months.
    pub async fn monthly_completions(&self) -> Result<Vec<MonthlyCompletion>> {
        self.with_database(|db| db.monthly_completions()).await
    }

    pub async fn recent_activity(
        &self,
        params: &params::RecentActivity,
    ) -> Result<Vec<RecentActivity>> {
        let limit = params.limit();
        self.with_database(move |db| db.recent_activity(limit))
            .await
    }

    /// Average step durations and the fleet completion rate.
    pub async fn performance(&self) -> Result<PerformanceMetrics> {
        self.with_database(|db| db.performance_metrics()).await
    }
}
