//! Overdue evaluation for ledger entries.
//!
//! Lateness is never stored. It is derived on every query from the entry's
//! status and start date, the estimated duration of its step definition and
//! the date supplied by the caller's clock. All arithmetic runs on civil
//! dates so the result depends on nothing but those inputs.

use jiff::{civil::Date, Span};

use crate::models::{OverdueEntry, ProgressStatus, Property, StepProgress};

/// Whole days from `from` to `to`; negative when `to` is earlier.
pub fn days_between(from: Date, to: Date) -> i64 {
    from.duration_until(to).as_hours() / 24
}

/// Date by which a step started on `start_date` is expected to finish.
///
/// Returns `None` when the result falls outside the supported date range.
pub fn expected_end_date(start_date: Date, estimated_duration_days: u32) -> Option<Date> {
    let span = Span::new()
        .try_days(i64::from(estimated_duration_days))
        .ok()?;
    start_date.checked_add(span).ok()
}

/// Outcome of evaluating a single overdue ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lateness {
    pub expected_end_date: Date,
    pub days_overdue: i64,
}

/// Evaluates the overdue predicate from its raw inputs.
///
/// An entry is overdue when it is `in_progress`, has a start date, its step
/// has an estimated duration and `today` is strictly after
/// `start_date + duration`.
///
/// # Examples
///
/// ```rust
/// use jiff::civil::date;
/// use regula_core::{models::ProgressStatus, overdue::evaluate};
///
/// let today = date(2024, 6, 20);
/// let late = evaluate(ProgressStatus::InProgress, Some(date(2024, 6, 10)), Some(5), today)
///     .expect("entry should be overdue");
/// assert_eq!(late.expected_end_date, date(2024, 6, 15));
/// assert_eq!(late.days_overdue, 5);
///
/// // Finishing exactly on the expected date is not late.
/// let on_time = evaluate(ProgressStatus::InProgress, Some(date(2024, 6, 15)), Some(5), today);
/// assert!(on_time.is_none());
/// ```
pub fn evaluate(
    status: ProgressStatus,
    start_date: Option<Date>,
    estimated_duration_days: Option<u32>,
    today: Date,
) -> Option<Lateness> {
    if status != ProgressStatus::InProgress {
        return None;
    }
    let start_date = start_date?;
    let expected_end_date = expected_end_date(start_date, estimated_duration_days?)?;

    (today > expected_end_date).then(|| Lateness {
        expected_end_date,
        days_overdue: days_between(expected_end_date, today),
    })
}

/// Evaluates a ledger entry using the duration joined from its step.
pub fn evaluate_entry(entry: &StepProgress, today: Date) -> Option<Lateness> {
    evaluate(
        entry.status,
        entry.start_date,
        entry.estimated_duration_days,
        today,
    )
}

/// Builds the overdue record for `entry` of `property`, if it is late.
pub fn overdue_entry(
    property: &Property,
    entry: &StepProgress,
    today: Date,
) -> Option<OverdueEntry> {
    let lateness = evaluate_entry(entry, today)?;
    Some(OverdueEntry {
        step_progress_id: entry.id,
        property_id: property.id,
        municipal_code: property.municipal_code.clone(),
        property_address: property.full_address(),
        step_id: entry.step_id,
        step_name: entry.step_name.clone(),
        start_date: entry.start_date?,
        expected_end_date: lateness.expected_end_date,
        days_overdue: lateness.days_overdue,
        responsible_user_id: entry.responsible_user_id,
    })
}

/// Overdue records of a property's ledger, in ledger order.
pub fn overdue_for_property(property: &Property, today: Date) -> Vec<OverdueEntry> {
    property
        .steps
        .iter()
        .filter_map(|entry| overdue_entry(property, entry, today))
        .collect()
}
