//! Document metadata operations for the Workflow.

use super::Workflow;
use crate::{
    error::Result,
    models::{Document, DocumentFilter, DocumentPatch, NewDocument},
    params::{AttachDocument, Id, ListDocuments, UpdateDocument},
};

impl Workflow {
    /// Records a document attached to a ledger entry by `actor_id`.
    pub async fn attach_document(
        &self,
        params: &AttachDocument,
        actor_id: Option<u64>,
    ) -> Result<Document> {
        let new = NewDocument::try_from(params.clone())?;
        self.with_database(move |db| db.attach_document(&new, actor_id))
            .await
    }

    pub async fn get_document(&self, params: &Id) -> Result<Option<Document>> {
        let id = params.id;
        self.with_database(move |db| db.get_document(id)).await
    }

    /// Lists documents, newest first.
    pub async fn list_documents(&self, params: &ListDocuments) -> Result<Vec<Document>> {
        let filter = DocumentFilter::from(params.clone());
        self.with_database(move |db| db.list_documents(&filter))
            .await
    }

    /// Edits the type and description of a document.
    pub async fn update_document(&self, params: &UpdateDocument) -> Result<Document> {
        let id = params.id;
        let patch = DocumentPatch::from(params.clone());
        self.with_database(move |db| db.update_document(id, &patch))
            .await
    }

    /// Deletes a document record and returns it.
    pub async fn remove_document(&self, params: &Id) -> Result<Document> {
        let id = params.id;
        self.with_database(move |db| db.remove_document(id))
            .await
    }
}
