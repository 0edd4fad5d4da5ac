//! Property registry operations for the Workflow.

use super::Workflow;
use crate::{
    error::{Result, WorkflowError},
    models::{NewProperty, Property, PropertyFilter, PropertyPatch},
    params::{CreateProperty, DeleteProperty, Id, ListProperties, UpdateProperty},
};

impl Workflow {
    /// Registers a property and bootstraps one `not_started` ledger entry per
    /// active step definition, atomically.
    ///
    /// `actor_id` is recorded as the creator of the property and its entries.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::InvalidInput` - When the street is missing or a
    ///   field is malformed
    /// * `WorkflowError::Conflict` - When the municipal code is already
    ///   registered
    pub async fn create_property(
        &self,
        params: &CreateProperty,
        actor_id: Option<u64>,
    ) -> Result<Property> {
        let new = NewProperty::try_from(params.clone())?;

        self.with_database(move |db| db.create_property(&new, actor_id))
            .await
    }

    /// Applies a partial update to a property.
    pub async fn update_property(&self, params: &UpdateProperty) -> Result<Property> {
        let id = params.id;
        let patch = PropertyPatch::try_from(params.clone())?;

        self.with_database(move |db| db.update_property(id, &patch))
            .await
    }

    /// Permanently deletes a property together with its ledger entries and
    /// documents. Requires `confirmed`.
    ///
    /// Returns the property as it was before deletion.
    pub async fn delete_property(&self, params: &DeleteProperty) -> Result<Property> {
        params.validate()?;
        let id = params.id;

        self.with_database(move |db| {
            let property = db
                .get_property(id)?
                .ok_or(WorkflowError::PropertyNotFound { id })?;
            db.delete_property(id)?;
            Ok(property)
        })
        .await
    }

    /// Retrieves a property with its ledger ordered by step sequence.
    pub async fn get_property(&self, params: &Id) -> Result<Option<Property>> {
        let id = params.id;
        self.with_database(move |db| db.get_property(id)).await
    }

    /// Lists properties matching the filter, newest first.
    pub async fn list_properties(&self, params: &ListProperties) -> Result<Vec<Property>> {
        let filter = PropertyFilter::try_from(params.clone())?;
        self.with_database(move |db| db.list_properties(&filter))
            .await
    }

    /// Distinct neighborhoods of registered properties.
    pub async fn list_neighborhoods(&self) -> Result<Vec<String>> {
        self.with_database(|db| db.list_neighborhoods()).await
    }
}
