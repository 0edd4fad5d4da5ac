//! Result wrapper types for displaying operation outcomes.
//!
//! Each wrapper prefixes a confirmation line naming the resource kind and ID.
//! Create and update results then render the full resource; delete results
//! only identify it.

use std::fmt;

use crate::models::{Document, Property, StepDefinition, StepProgress};

/// A resource that can appear in an operation result.
pub trait Resource: fmt::Display {
    /// Lowercase kind used in messages, e.g. `property`
    const KIND: &'static str;

    fn id(&self) -> u64;

    /// Short human readable name used in deletion messages.
    fn label(&self) -> String;
}

impl Resource for Property {
    const KIND: &'static str = "property";

    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> String {
        self.full_address()
    }
}

impl Resource for StepDefinition {
    const KIND: &'static str = "step definition";

    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

impl Resource for StepProgress {
    const KIND: &'static str = "step record";

    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> String {
        self.step_name.clone()
    }
}

impl Resource for Document {
    const KIND: &'static str = "document";

    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> String {
        self.filename.clone()
    }
}

/// The result of a create operation.
///
/// # Examples
///
/// ```rust
/// use regula_core::{display::CreateResult, models::StepDefinition};
/// use jiff::Timestamp;
///
/// let definition = StepDefinition {
///     id: 3,
///     name: "Municipal approval".to_string(),
///     description: None,
///     order_sequence: 3,
///     estimated_duration_days: Some(30),
///     required_documents: None,
///     active: true,
///     created_at: Timestamp::now(),
///     updated_at: Timestamp::now(),
/// };
///
/// let output = CreateResult::new(definition).to_string();
/// assert!(output.starts_with("Created step definition with ID: 3"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl<T: Resource> fmt::Display for CreateResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created {} with ID: {}", T::KIND, self.resource.id())?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// The result of an update operation, optionally listing the changes made.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    /// Create an UpdateResult with a list of changes made.
    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl<T: Resource> fmt::Display for UpdateResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated {} with ID: {}", T::KIND, self.resource.id())?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// The result of a delete operation.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl<T: Resource> fmt::Display for DeleteResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted {} '{}' (ID: {})",
            T::KIND,
            self.resource.label(),
            self.resource.id()
        )
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;

    fn create_test_document() -> Document {
        Document {
            id: 4,
            step_progress_id: 9,
            filename: "survey.pdf".to_string(),
            file_path: "uploads/survey.pdf".to_string(),
            file_size: Some(2048),
            file_type: Some("application/pdf".to_string()),
            document_type: Some("survey".to_string()),
            description: None,
            uploaded_by: Some(1),
            created_at: Timestamp::from_second(1704067200).unwrap(),
        }
    }

    #[test]
    fn test_create_result_display() {
        let output = CreateResult::new(create_test_document()).to_string();
        assert!(output.starts_with("Created document with ID: 4\n"));
        assert!(output.contains("## survey.pdf (ID: 4)"));
        assert!(output.contains("- **Size**: 2.0 KB"));
    }

    #[test]
    fn test_update_result_lists_changes() {
        let changes = vec!["Changed type to survey".to_string()];
        let output = UpdateResult::with_changes(create_test_document(), changes).to_string();
        assert!(output.contains("Changes made:\n- Changed type to survey"));

        let plain = UpdateResult::new(create_test_document()).to_string();
        assert!(!plain.contains("Changes made:"));
    }

    #[test]
    fn test_delete_result_display() {
        let output = DeleteResult::new(create_test_document()).to_string();
        assert_eq!(output, "Deleted document 'survey.pdf' (ID: 4)\n");
    }
}
