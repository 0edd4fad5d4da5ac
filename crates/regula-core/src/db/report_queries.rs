//! Aggregate queries behind progress summaries and dashboard reports.
//!
//! SQL here only groups and counts. Percentages, averages, zero-filling and
//! date windows are computed by [`crate::progress`] and [`crate::overdue`].

use std::str::FromStr;

use rusqlite::params;

use super::utils::{get_id, get_optional_date, get_optional_id, get_status, get_timestamp};
use crate::{
    error::{DatabaseResultExt, Result, WorkflowError},
    models::{
        format_address, MonthlyCompletion, NeighborhoodCount, Overview, PerformanceMetrics,
        ProgressStatus, PropertyProgress, RecentActivity, RegularizationStatus, Statistics,
    },
    overdue, progress,
};

const PROPERTY_STATUS_COUNTS_SQL: &str =
    "SELECT regularization_status, COUNT(*) FROM properties GROUP BY regularization_status";
const STEP_STATUS_COUNTS_SQL: &str = "SELECT status, COUNT(*) FROM step_progress GROUP BY status";
const STEP_STATUS_ROWS_SQL: &str =
    "SELECT step_id, status, COUNT(*) FROM step_progress GROUP BY step_id, status";
const COUNT_DOCUMENTS_SQL: &str = "SELECT COUNT(*) FROM documents";
const NEIGHBORHOOD_COUNTS_SQL: &str = "SELECT address_neighborhood, COUNT(*) AS total FROM properties WHERE address_neighborhood IS NOT NULL AND address_neighborhood != '' GROUP BY address_neighborhood ORDER BY total DESC, address_neighborhood ASC LIMIT ?1";
const COMPLETED_END_DATES_SQL: &str =
    "SELECT end_date FROM step_progress WHERE status = 'completed' AND end_date IS NOT NULL";
const COMPLETED_DURATION_SAMPLES_SQL: &str = "SELECT step_id, start_date, end_date FROM step_progress WHERE status = 'completed' AND start_date IS NOT NULL AND end_date IS NOT NULL";
const RECENT_ACTIVITY_SQL: &str = "SELECT sp.id, sp.property_id, p.municipal_code, p.address_street, p.address_number, p.address_neighborhood, p.address_city, sd.name, sp.status, sp.responsible_user_id, sp.updated_at FROM step_progress sp JOIN step_definitions sd ON sd.id = sp.step_id JOIN properties p ON p.id = sp.property_id ORDER BY sp.updated_at DESC, sp.id DESC LIMIT ?1";

/// Number of neighborhoods in the dashboard ranking.
pub const TOP_NEIGHBORHOODS: u32 = 10;

impl super::Database {
    /// Runs a `status, count` grouping query.
    fn status_counts<S>(&self, sql: &str) -> Result<Vec<(S, u64)>>
    where
        S: FromStr<Err = String>,
    {
        let mut stmt = self
            .connection
            .prepare(sql)
            .db_context("Failed to prepare query")?;

        let counts = stmt
            .query_map([], |row| Ok((get_status::<S>(row, 0)?, get_id(row, 1)?)))
            .db_context("Failed to query status counts")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch status counts")?;

        Ok(counts)
    }

    /// Completion summary and overdue entries of one property.
    pub fn property_progress(&self, id: u64) -> Result<PropertyProgress> {
        let property = self
            .get_property(id)?
            .ok_or(WorkflowError::PropertyNotFound { id })?;

        let summary = progress::summarize(&property.steps);
        let overdue = overdue::overdue_for_property(&property, self.clock.today());

        Ok(PropertyProgress {
            property,
            summary,
            overdue,
        })
    }

    /// Fleet-wide distribution of property and ledger statuses, with a
    /// per-step breakdown in catalog order.
    pub fn statistics(&self) -> Result<Statistics> {
        let property_counts =
            self.status_counts::<RegularizationStatus>(PROPERTY_STATUS_COUNTS_SQL)?;
        let step_counts = self.status_counts::<ProgressStatus>(STEP_STATUS_COUNTS_SQL)?;

        let rows: Vec<(u64, ProgressStatus, u64)> = {
            let mut stmt = self
                .connection
                .prepare(STEP_STATUS_ROWS_SQL)
                .db_context("Failed to prepare query")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((get_id(row, 0)?, get_status(row, 1)?, get_id(row, 2)?))
                })
                .db_context("Failed to query step breakdown")?
                .collect::<std::result::Result<Vec<_>, _>>()
                .db_context("Failed to fetch step breakdown")?;
            rows
        };

        let definitions = self.list_step_definitions(false)?;

        Ok(Statistics {
            property_statuses: progress::complete_status_counts(
                &RegularizationStatus::ALL,
                &property_counts,
            ),
            step_statuses: progress::complete_status_counts(&ProgressStatus::ALL, &step_counts),
            steps: progress::step_breakdown(&definitions, &rows),
        })
    }

    /// Headline dashboard counters.
    pub fn overview(&self) -> Result<Overview> {
        let property_counts =
            self.status_counts::<RegularizationStatus>(PROPERTY_STATUS_COUNTS_SQL)?;
        let step_counts = self.status_counts::<ProgressStatus>(STEP_STATUS_COUNTS_SQL)?;

        let mut overview = Overview::default();
        for (status, count) in property_counts {
            overview.total_properties += count;
            match status {
                RegularizationStatus::Pending => overview.properties_pending += count,
                RegularizationStatus::InProgress => overview.properties_in_progress += count,
                RegularizationStatus::MunicipalRegistered => {
                    overview.properties_municipal_registered += count
                }
                RegularizationStatus::RegistryCompleted => {
                    overview.properties_registry_completed += count
                }
            }
        }
        for (status, count) in step_counts {
            overview.total_step_records += count;
            match status {
                ProgressStatus::NotStarted => overview.steps_not_started += count,
                ProgressStatus::InProgress => overview.steps_in_progress += count,
                ProgressStatus::Completed => overview.steps_completed += count,
                ProgressStatus::Blocked => overview.steps_blocked += count,
            }
        }

        let documents: i64 = self
            .connection
            .query_row(COUNT_DOCUMENTS_SQL, [], |row| row.get(0))
            .db_context("Failed to count documents")?;
        overview.total_documents = documents as u64;

        Ok(overview)
    }

    /// The neighborhoods with most properties, count descending then name.
    pub fn neighborhood_counts(&self, limit: u32) -> Result<Vec<NeighborhoodCount>> {
        let mut stmt = self
            .connection
            .prepare(NEIGHBORHOOD_COUNTS_SQL)
            .db_context("Failed to prepare query")?;

        let counts = stmt
            .query_map(params![i64::from(limit)], |row| {
                Ok(NeighborhoodCount {
                    neighborhood: row.get(0)?,
                    count: get_id(row, 1)?,
                })
            })
            .db_context("Failed to query neighborhood counts")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch neighborhood counts")?;

        Ok(counts)
    }

    /// Completed ledger entries per month over the last 12 months.
    pub fn monthly_completions(&self) -> Result<Vec<MonthlyCompletion>> {
        let mut stmt = self
            .connection
            .prepare(COMPLETED_END_DATES_SQL)
            .db_context("Failed to prepare query")?;

        let end_dates = stmt
            .query_map([], |row| get_optional_date(row, 0))
            .db_context("Failed to query completion dates")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch completion dates")?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

        Ok(progress::monthly_completions(&end_dates, self.clock.today()))
    }

    /// The most recently updated ledger entries.
    pub fn recent_activity(&self, limit: u32) -> Result<Vec<RecentActivity>> {
        let mut stmt = self
            .connection
            .prepare(RECENT_ACTIVITY_SQL)
            .db_context("Failed to prepare query")?;

        let activity = stmt
            .query_map(params![i64::from(limit)], |row| {
                let street: String = row.get(3)?;
                let number: Option<String> = row.get(4)?;
                let neighborhood: Option<String> = row.get(5)?;
                let city: Option<String> = row.get(6)?;

                Ok(RecentActivity {
                    step_progress_id: get_id(row, 0)?,
                    property_id: get_id(row, 1)?,
                    municipal_code: row.get(2)?,
                    property_address: format_address(
                        &street,
                        number.as_deref(),
                        neighborhood.as_deref(),
                        city.as_deref(),
                    ),
                    step_name: row.get(7)?,
                    status: get_status(row, 8)?,
                    responsible_user_id: get_optional_id(row, 9)?,
                    updated_at: get_timestamp(row, 10)?,
                })
            })
            .db_context("Failed to query recent activity")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch recent activity")?;

        Ok(activity)
    }

    /// Average step durations and the fleet completion rate.
    pub fn performance_metrics(&self) -> Result<PerformanceMetrics> {
        let samples = {
            let mut stmt = self
                .connection
                .prepare(COMPLETED_DURATION_SAMPLES_SQL)
                .db_context("Failed to prepare query")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        get_id(row, 0)?,
                        get_optional_date(row, 1)?,
                        get_optional_date(row, 2)?,
                    ))
                })
                .db_context("Failed to query step durations")?
                .collect::<std::result::Result<Vec<_>, _>>()
                .db_context("Failed to fetch step durations")?;
            rows
        };
        let samples: Vec<_> = samples
            .into_iter()
            .filter_map(|(step_id, start, end)| Some((step_id, start?, end?)))
            .collect();

        let definitions = self.list_step_definitions(false)?;
        let step_counts = self.status_counts::<ProgressStatus>(STEP_STATUS_COUNTS_SQL)?;
        let total_steps: u64 = step_counts.iter().map(|(_, count)| count).sum();
        let completed_steps: u64 = step_counts
            .iter()
            .filter(|(status, _)| *status == ProgressStatus::Completed)
            .map(|(_, count)| count)
            .sum();

        Ok(PerformanceMetrics {
            average_durations: progress::average_durations(&definitions, &samples),
            completion_rate: progress::percentage(completed_steps, total_steps),
            total_steps,
            completed_steps,
        })
    }
}
