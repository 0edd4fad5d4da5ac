//! Display implementations for domain models.
//!
//! Everything renders as markdown for the terminal renderer.

use std::fmt;

use super::datetime::{LocalDateTime, OptionalDate};
use crate::models::{
    Document, ProgressStatus, Property, RegularizationStatus, StepDefinition, StepProgress,
};

impl fmt::Display for RegularizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inactive = if self.active { "" } else { " (inactive)" };
        writeln!(
            f,
            "## {}. {} (ID: {}){inactive}",
            self.order_sequence, self.name, self.id
        )?;
        writeln!(f)?;

        if let Some(days) = self.estimated_duration_days {
            writeln!(f, "- **Estimated duration**: {days} days")?;
        }
        if let Some(documents) = &self.required_documents {
            writeln!(f, "- **Required documents**: {documents}")?;
        }
        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.municipal_code {
            Some(code) => writeln!(f, "# {}. {} ({code})", self.id, self.full_address())?,
            None => writeln!(f, "# {}. {}", self.id, self.full_address())?,
        }
        writeln!(f)?;

        writeln!(f, "- Status: {}", self.regularization_status.label())?;
        if let Some(registry) = &self.registry_number {
            writeln!(f, "- Registry number: {registry}")?;
        }
        if let Some(zipcode) = &self.address_zipcode {
            writeln!(f, "- Zip code: {zipcode}")?;
        }
        if let Some(owner) = &self.current_owner {
            writeln!(f, "- Owner: {owner}")?;
        }
        if let Some(kind) = &self.property_type {
            writeln!(f, "- Type: {kind}")?;
        }
        if let Some(usage) = &self.current_use {
            writeln!(f, "- Use: {usage}")?;
        }
        if let Some(area) = self.area_total {
            writeln!(f, "- Total area: {area:.2} m²")?;
        }
        if let Some(area) = self.area_built {
            writeln!(f, "- Built area: {area:.2} m²")?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        if self.steps.is_empty() {
            writeln!(f, "\nNo steps tracked for this property.")?;
        } else {
            writeln!(f, "\n## Steps")?;
            writeln!(f)?;
            for step in &self.steps {
                write!(f, "{step}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for StepProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {} ({}, {}%)",
            self.order_sequence,
            self.step_name,
            self.status.with_icon(),
            self.completion_percentage
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "- Record ID: {} (property {})",
            self.id, self.property_id
        )?;

        if self.start_date.is_some() || self.end_date.is_some() {
            writeln!(
                f,
                "- Dates: {} to {}",
                OptionalDate(&self.start_date),
                OptionalDate(&self.end_date)
            )?;
        }
        if let Some(user) = self.responsible_user_id {
            writeln!(f, "- Responsible: user {user}")?;
        }
        if let Some(observations) = &self.observations {
            writeln!(f)?;
            writeln!(f, "{observations}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {} (ID: {})", self.filename, self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Step record**: {}", self.step_progress_id)?;
        if let Some(kind) = &self.document_type {
            writeln!(f, "- **Type**: {kind}")?;
        }
        if let Some(size) = self.formatted_size() {
            writeln!(f, "- **Size**: {size}")?;
        }
        writeln!(f, "- **Path**: {}", self.file_path)?;
        writeln!(f, "- **Uploaded**: {}", LocalDateTime(&self.created_at))?;
        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }
        writeln!(f)
    }
}
