//! Progress aggregation over ledger entries.
//!
//! These functions take already loaded records and never touch the
//! database, so the same arithmetic serves single properties and the whole
//! fleet. Step-grouped results are always ordered by the catalog's
//! `order_sequence`.

use std::collections::{BTreeMap, HashMap};

use jiff::{civil::Date, Span};

use crate::{
    models::{
        MonthlyCompletion, ProgressStatus, ProgressSummary, StatusCount, StepDefinition,
        StepDurationAverage, StepProgress, StepStatusBreakdown,
    },
    overdue::days_between,
};

/// Rounds `value` to `decimals` decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `part / whole * 100` rounded to 2 decimals, 0 when `whole` is 0.
///
/// # Examples
///
/// ```rust
/// use regula_core::progress::percentage;
///
/// // 1 of 4 steps completed
/// assert_eq!(percentage(1, 4), 25.0);
/// assert_eq!(percentage(0, 0), 0.0);
/// ```
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to(part as f64 / whole as f64 * 100.0, 2)
}

/// Completion summary of a property's ledger.
pub fn summarize(entries: &[StepProgress]) -> ProgressSummary {
    let total_steps = entries.len() as u32;
    let completed_steps = entries
        .iter()
        .filter(|entry| entry.status == ProgressStatus::Completed)
        .count() as u32;

    ProgressSummary {
        total_steps,
        completed_steps,
        completion_percentage: percentage(u64::from(completed_steps), u64::from(total_steps)),
    }
}

/// Expands grouped counts so that every status in `all` is reported, in the
/// order of `all`, with 0 for missing groups.
pub fn complete_status_counts<S>(all: &[S], counts: &[(S, u64)]) -> Vec<StatusCount<S>>
where
    S: Copy + PartialEq,
{
    all.iter()
        .map(|status| StatusCount {
            status: *status,
            count: counts
                .iter()
                .filter(|(s, _)| s == status)
                .map(|(_, count)| count)
                .sum(),
        })
        .collect()
}

/// Per-definition status breakdown from `(step_id, status, count)` rows.
///
/// Every definition appears, including those without ledger entries.
pub fn step_breakdown(
    definitions: &[StepDefinition],
    rows: &[(u64, ProgressStatus, u64)],
) -> Vec<StepStatusBreakdown> {
    let mut breakdown: Vec<StepStatusBreakdown> = definitions
        .iter()
        .map(|definition| {
            let mut item = StepStatusBreakdown {
                step_id: definition.id,
                step_name: definition.name.clone(),
                order_sequence: definition.order_sequence,
                not_started: 0,
                in_progress: 0,
                completed: 0,
                blocked: 0,
                total: 0,
            };
            for (_, status, count) in rows.iter().filter(|(id, _, _)| *id == definition.id) {
                match status {
                    ProgressStatus::NotStarted => item.not_started += count,
                    ProgressStatus::InProgress => item.in_progress += count,
                    ProgressStatus::Completed => item.completed += count,
                    ProgressStatus::Blocked => item.blocked += count,
                }
                item.total += count;
            }
            item
        })
        .collect();

    breakdown.sort_by_key(|item| item.order_sequence);
    breakdown
}

/// Mean duration per definition from `(step_id, start_date, end_date)`
/// samples of completed entries, rounded to 1 decimal.
///
/// Definitions without samples report 0.
pub fn average_durations(
    definitions: &[StepDefinition],
    samples: &[(u64, Date, Date)],
) -> Vec<StepDurationAverage> {
    let mut totals: HashMap<u64, (i64, u64)> = HashMap::new();
    for (step_id, start, end) in samples {
        let entry = totals.entry(*step_id).or_default();
        entry.0 += days_between(*start, *end);
        entry.1 += 1;
    }

    let mut averages: Vec<StepDurationAverage> = definitions
        .iter()
        .map(|definition| {
            let (sum, sample_size) = totals.get(&definition.id).copied().unwrap_or_default();
            let average_duration_days = if sample_size == 0 {
                0.0
            } else {
                round_to(sum as f64 / sample_size as f64, 1)
            };
            StepDurationAverage {
                step_id: definition.id,
                step_name: definition.name.clone(),
                order_sequence: definition.order_sequence,
                average_duration_days,
                sample_size,
            }
        })
        .collect();

    averages.sort_by_key(|item| item.order_sequence);
    averages
}

/// Completions per month for end dates within the last 12 months of
/// `today`, ascending by month.
pub fn monthly_completions(end_dates: &[Date], today: Date) -> Vec<MonthlyCompletion> {
    let window_start = today
        .checked_sub(Span::new().months(12))
        .unwrap_or(Date::MIN);

    let mut months: BTreeMap<(i16, i8), u64> = BTreeMap::new();
    for end_date in end_dates.iter().filter(|d| **d >= window_start) {
        *months.entry((end_date.year(), end_date.month())).or_default() += 1;
    }

    months
        .into_iter()
        .map(|((year, month), completed_steps)| MonthlyCompletion {
            month: format!("{year:04}-{month:02}"),
            completed_steps,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use jiff::{civil::date, Timestamp};

    use super::*;

    fn definition(id: u64, order_sequence: i64, name: &str) -> StepDefinition {
        StepDefinition {
            id,
            name: name.to_string(),
            description: None,
            order_sequence,
            estimated_duration_days: None,
            required_documents: None,
            active: true,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn entry(id: u64, status: ProgressStatus) -> StepProgress {
        StepProgress {
            id,
            property_id: 1,
            step_id: id,
            step_name: format!("Step {id}"),
            order_sequence: id as i64,
            estimated_duration_days: None,
            status,
            start_date: None,
            end_date: None,
            responsible_user_id: None,
            completion_percentage: 0,
            observations: None,
            created_by: None,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_one_of_four_completed_is_25_percent() {
        let entries = vec![
            entry(1, ProgressStatus::Completed),
            entry(2, ProgressStatus::InProgress),
            entry(3, ProgressStatus::NotStarted),
            entry(4, ProgressStatus::Blocked),
        ];

        let summary = summarize(&entries);
        assert_eq!(summary.total_steps, 4);
        assert_eq!(summary.completed_steps, 1);
        assert_eq!(summary.completion_percentage, 25.0);
    }

    #[test]
    fn test_empty_ledger_is_zero_percent() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_steps, 0);
        assert_eq!(summary.completion_percentage, 0.0);
    }

    #[test]
    fn test_percentage_rounds_to_two_decimals() {
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
    }

    #[test]
    fn test_status_counts_report_zero_for_missing_groups() {
        let counts = complete_status_counts(
            &ProgressStatus::ALL,
            &[(ProgressStatus::Completed, 3), (ProgressStatus::NotStarted, 2)],
        );

        assert_eq!(counts.len(), 4);
        assert_eq!(counts[0].status, ProgressStatus::NotStarted);
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].count, 0);
        assert_eq!(counts[2].count, 3);
        assert_eq!(counts[3].count, 0);
    }

    #[test]
    fn test_step_breakdown_follows_order_sequence() {
        // Created out of order: id 1 is the last step of the workflow
        let definitions = vec![
            definition(1, 30, "Registry"),
            definition(2, 10, "Survey"),
            definition(3, 20, "Municipal filing"),
        ];
        let rows = vec![
            (1, ProgressStatus::Completed, 1),
            (2, ProgressStatus::Completed, 4),
            (2, ProgressStatus::Blocked, 1),
        ];

        let breakdown = step_breakdown(&definitions, &rows);

        let names: Vec<_> = breakdown.iter().map(|b| b.step_name.as_str()).collect();
        assert_eq!(names, ["Survey", "Municipal filing", "Registry"]);
        assert_eq!(breakdown[0].completed, 4);
        assert_eq!(breakdown[0].blocked, 1);
        assert_eq!(breakdown[0].total, 5);
        assert_eq!(breakdown[1].total, 0);
        assert_eq!(breakdown[1].count(ProgressStatus::InProgress), 0);
    }

    #[test]
    fn test_average_durations_default_to_zero() {
        let definitions = vec![definition(1, 1, "Survey"), definition(2, 2, "Filing")];
        let samples = vec![
            (1, date(2024, 1, 1), date(2024, 1, 11)),
            (1, date(2024, 2, 1), date(2024, 2, 6)),
        ];

        let averages = average_durations(&definitions, &samples);

        assert_eq!(averages[0].average_duration_days, 7.5);
        assert_eq!(averages[0].sample_size, 2);
        assert_eq!(averages[1].average_duration_days, 0.0);
        assert_eq!(averages[1].sample_size, 0);
    }

    #[test]
    fn test_monthly_completions_window() {
        let today = date(2024, 6, 15);
        let end_dates = vec![
            date(2023, 6, 14), // outside the window
            date(2023, 6, 15),
            date(2024, 5, 2),
            date(2024, 5, 30),
            date(2024, 6, 1),
        ];

        let months = monthly_completions(&end_dates, today);

        assert_eq!(
            months,
            vec![
                MonthlyCompletion {
                    month: "2023-06".into(),
                    completed_steps: 1
                },
                MonthlyCompletion {
                    month: "2024-05".into(),
                    completed_steps: 2
                },
                MonthlyCompletion {
                    month: "2024-06".into(),
                    completed_steps: 1
                },
            ]
        );
    }
}
