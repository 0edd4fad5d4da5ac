//! Step-progress ledger operations for the Workflow.

use super::Workflow;
use crate::{
    error::Result,
    models::{ProgressStatus, StepProgress, StepProgressFilter, StepProgressPatch},
    params::{CreateStepProgress, Id, ListStepProgress, UpdateStepProgress},
};

impl Workflow {
    /// Starts tracking a step definition on an existing property.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::PropertyNotFound` / `StepDefinitionNotFound` - When
    ///   either side does not exist
    /// * `WorkflowError::Conflict` - When the property already tracks the
    ///   step
    pub async fn create_step_progress(
        &self,
        params: &CreateStepProgress,
        actor_id: Option<u64>,
    ) -> Result<StepProgress> {
        let property_id = params.property_id;
        let step_id = params.step_id;
        self.with_database(move |db| db.create_step_progress(property_id, step_id, actor_id))
            .await
    }

    /// Updates a ledger entry.
    ///
    /// Explicit fields are applied first, then the status side effects:
    /// `in_progress` fills an unset start date with today, `completed` fills
    /// an unset end date with today and forces 100%. The resulting dates must
    /// satisfy `start_date <= end_date`; otherwise nothing is written.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use regula_core::{params::UpdateStepProgress, WorkflowBuilder};
    /// # async {
    /// let workflow = WorkflowBuilder::new().build().await?;
    /// let entry = workflow
    ///     .update_step_progress(&UpdateStepProgress {
    ///         id: 1,
    ///         status: Some("completed".to_string()),
    ///         ..Default::default()
    ///     })
    ///     .await?;
    /// assert_eq!(entry.completion_percentage, 100);
    /// # Result::<(), regula_core::WorkflowError>::Ok(())
    /// # };
    /// ```
    pub async fn update_step_progress(&self, params: &UpdateStepProgress) -> Result<StepProgress> {
        let id = params.id;
        let patch = StepProgressPatch::try_from(params.clone())?;
        self.with_database(move |db| db.update_step_progress(id, &patch))
            .await
    }

    /// Retrieves a ledger entry by ID.
    pub async fn get_step_progress(&self, params: &Id) -> Result<Option<StepProgress>> {
        let id = params.id;
        self.with_database(move |db| db.get_step_progress(id))
            .await
    }

    /// Lists ledger entries ordered by property, then step sequence.
    pub async fn list_step_progress(&self, params: &ListStepProgress) -> Result<Vec<StepProgress>> {
        let filter = StepProgressFilter::try_from(params.clone())?;
        self.with_database(move |db| db.list_step_progress(&filter))
            .await
    }

    /// The ledger statuses accepted by [`Workflow::update_step_progress`].
    pub fn status_options(&self) -> Vec<ProgressStatus> {
        ProgressStatus::ALL.to_vec()
    }
}
