//! Step catalog operations for the Workflow.

use super::Workflow;
use crate::{
    error::{Result, WorkflowError},
    models::{NewStepDefinition, StepDefinition, StepDefinitionPatch},
    params::{
        CreateStepDefinition, Id, ImportCatalog, ListStepDefinitions, ReorderSteps,
        UpdateStepDefinition,
    },
};

impl Workflow {
    /// Adds a step definition to the catalog.
    ///
    /// Existing properties are not affected; use
    /// [`Workflow::create_step_progress`] to track the new step on them.
    pub async fn create_step_definition(
        &self,
        params: &CreateStepDefinition,
    ) -> Result<StepDefinition> {
        let new = NewStepDefinition::try_from(params.clone())?;
        self.with_database(move |db| db.create_step_definition(&new))
            .await
    }

    /// Applies a partial update to a step definition.
    pub async fn update_step_definition(
        &self,
        params: &UpdateStepDefinition,
    ) -> Result<StepDefinition> {
        let id = params.id;
        let patch = StepDefinitionPatch::try_from(params.clone())?;
        self.with_database(move |db| db.update_step_definition(id, &patch))
            .await
    }

    /// Deletes a step definition that no ledger entry references.
    ///
    /// Returns the definition as it was before deletion.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::StepDefinitionNotFound` - When the ID is unknown
    /// * `WorkflowError::ReferentialIntegrity` - When ledger entries still
    ///   reference the definition
    pub async fn delete_step_definition(&self, params: &Id) -> Result<StepDefinition> {
        let id = params.id;
        self.with_database(move |db| {
            let definition = db
                .get_step_definition(id)?
                .ok_or(WorkflowError::StepDefinitionNotFound { id })?;
            db.delete_step_definition(id)?;
            Ok(definition)
        })
        .await
    }

    /// Retrieves a step definition by ID.
    pub async fn get_step_definition(&self, params: &Id) -> Result<Option<StepDefinition>> {
        let id = params.id;
        self.with_database(move |db| db.get_step_definition(id))
            .await
    }

    /// Lists the catalog in workflow order.
    pub async fn list_step_definitions(
        &self,
        params: &ListStepDefinitions,
    ) -> Result<Vec<StepDefinition>> {
        let active_only = params.active_only;
        self.with_database(move |db| db.list_step_definitions(active_only))
            .await
    }

    /// Reorders the listed step definitions within the sequence slots they
    /// already occupy. All-or-nothing.
    ///
    /// Returns the whole catalog in its new order.
    pub async fn reorder_steps(&self, params: &ReorderSteps) -> Result<Vec<StepDefinition>> {
        params.validate()?;
        let ids = params.ids.clone();
        self.with_database(move |db| db.reorder_step_definitions(&ids))
            .await
    }

    /// Creates every definition of a batch in one transaction.
    pub async fn import_catalog(&self, params: &ImportCatalog) -> Result<Vec<StepDefinition>> {
        let batch = params
            .definitions
            .iter()
            .cloned()
            .map(NewStepDefinition::try_from)
            .collect::<Result<Vec<_>>>()?;

        self.with_database(move |db| db.import_step_definitions(&batch))
            .await
    }
}
