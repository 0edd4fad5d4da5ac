//! Display implementations for progress summaries and dashboard reports.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{
    MonthlyCompletion, NeighborhoodCount, OverdueEntry, Overview, PerformanceMetrics,
    ProgressStatus, ProgressSummary, PropertyProgress, RecentActivity, Statistics,
};

impl fmt::Display for ProgressSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Progress: {}/{} steps completed ({:.2}%)",
            self.completed_steps, self.total_steps, self.completion_percentage
        )
    }
}

impl fmt::Display for PropertyProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.property)?;
        writeln!(f)?;
        write!(f, "{}", self.summary)?;

        if !self.overdue.is_empty() {
            writeln!(f, "\n## Overdue")?;
            writeln!(f)?;
            for entry in &self.overdue {
                write!(f, "{entry}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for OverdueEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- **{}** at {} (record {}): {} days overdue, expected by {}",
            self.step_name,
            self.property_address,
            self.step_progress_id,
            self.days_overdue,
            self.expected_end_date
        )
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Statistics")?;
        writeln!(f)?;

        writeln!(f, "## Properties")?;
        writeln!(f)?;
        for count in &self.property_statuses {
            writeln!(f, "- {}: {}", count.status.label(), count.count)?;
        }

        writeln!(f, "\n## Step records")?;
        writeln!(f)?;
        for count in &self.step_statuses {
            writeln!(f, "- {}: {}", count.status.label(), count.count)?;
        }

        if !self.steps.is_empty() {
            writeln!(f, "\n## By step")?;
            writeln!(f)?;
            write!(f, "| # | Step |")?;
            for status in ProgressStatus::ALL {
                write!(f, " {} |", status.label())?;
            }
            writeln!(f, " Total |")?;
            writeln!(f, "|---|---|---|---|---|---|---|")?;
            for step in &self.steps {
                write!(f, "| {} | {} |", step.order_sequence, step.step_name)?;
                for status in ProgressStatus::ALL {
                    write!(f, " {} |", step.count(status))?;
                }
                writeln!(f, " {} |", step.total)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Overview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Overview")?;
        writeln!(f)?;
        writeln!(f, "- **Properties**: {}", self.total_properties)?;
        writeln!(f, "  - Pending: {}", self.properties_pending)?;
        writeln!(f, "  - In progress: {}", self.properties_in_progress)?;
        writeln!(
            f,
            "  - Municipal registered: {}",
            self.properties_municipal_registered
        )?;
        writeln!(
            f,
            "  - Registry completed: {}",
            self.properties_registry_completed
        )?;
        writeln!(f, "- **Step records**: {}", self.total_step_records)?;
        writeln!(f, "  - Not started: {}", self.steps_not_started)?;
        writeln!(f, "  - In progress: {}", self.steps_in_progress)?;
        writeln!(f, "  - Completed: {}", self.steps_completed)?;
        writeln!(f, "  - Blocked: {}", self.steps_blocked)?;
        writeln!(f, "- **Documents**: {}", self.total_documents)
    }
}

impl fmt::Display for PerformanceMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Performance")?;
        writeln!(f)?;
        writeln!(
            f,
            "Completion rate: {:.2}% ({}/{} step records)",
            self.completion_rate, self.completed_steps, self.total_steps
        )?;

        if !self.average_durations.is_empty() {
            writeln!(f)?;
            writeln!(f, "| # | Step | Average days | Samples |")?;
            writeln!(f, "|---|---|---|---|")?;
            for average in &self.average_durations {
                writeln!(
                    f,
                    "| {} | {} | {:.1} | {} |",
                    average.order_sequence,
                    average.step_name,
                    average.average_duration_days,
                    average.sample_size
                )?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for NeighborhoodCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- {}: {}", self.neighborhood, self.count)
    }
}

impl fmt::Display for MonthlyCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- {}: {}", self.month, self.completed_steps)
    }
}

impl fmt::Display for RecentActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "- {} **{}** at {} ({})",
            LocalDateTime(&self.updated_at),
            self.step_name,
            self.property_address,
            self.status.with_icon()
        )
    }
}
