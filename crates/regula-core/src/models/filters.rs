//! Filter types for listing queries.

use serde::{Deserialize, Serialize};

use super::{requests::parse_status, ProgressStatus, RegularizationStatus};
use crate::{
    error::{Result, WorkflowError},
    params,
};

/// Limit/offset window derived from a 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

impl Pagination {
    /// Builds a window when `per_page` is given. Page numbers below 1 are
    /// treated as the first page.
    pub fn from_page(page: Option<u32>, per_page: Option<u32>) -> Option<Self> {
        per_page.map(|per_page| {
            let page = page.unwrap_or(1).max(1);
            Self {
                limit: per_page,
                offset: (page - 1).saturating_mul(per_page),
            }
        })
    }
}

/// Filter criteria for property listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyFilter {
    /// Case-insensitive match on municipal code, street or owner
    pub search: Option<String>,

    /// Only properties in this regularization status
    pub status: Option<RegularizationStatus>,

    /// Case-insensitive substring of the neighborhood
    pub neighborhood: Option<String>,

    pub pagination: Option<Pagination>,
}

/// Filter criteria for ledger listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepProgressFilter {
    pub property_id: Option<u64>,
    pub step_id: Option<u64>,
    pub status: Option<ProgressStatus>,
    pub responsible_user_id: Option<u64>,
    pub pagination: Option<Pagination>,
}

/// Filter criteria for document listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentFilter {
    pub step_progress_id: Option<u64>,

    /// Case-insensitive substring of the document type
    pub document_type: Option<String>,

    pub pagination: Option<Pagination>,
}

/// Trimmed search text, `None` when blank.
fn search_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<params::ListProperties> for PropertyFilter {
    type Error = WorkflowError;

    fn try_from(params: params::ListProperties) -> Result<Self> {
        Ok(Self {
            search: search_text(params.search),
            status: params
                .status
                .as_deref()
                .map(|raw| parse_status::<RegularizationStatus>("status", raw))
                .transpose()?,
            neighborhood: search_text(params.neighborhood),
            pagination: Pagination::from_page(params.page, params.per_page),
        })
    }
}

impl TryFrom<params::ListStepProgress> for StepProgressFilter {
    type Error = WorkflowError;

    fn try_from(params: params::ListStepProgress) -> Result<Self> {
        Ok(Self {
            property_id: params.property_id,
            step_id: params.step_id,
            status: params
                .status
                .as_deref()
                .map(|raw| parse_status::<ProgressStatus>("status", raw))
                .transpose()?,
            responsible_user_id: params.responsible_user_id,
            pagination: Pagination::from_page(params.page, params.per_page),
        })
    }
}

impl From<params::ListDocuments> for DocumentFilter {
    fn from(params: params::ListDocuments) -> Self {
        Self {
            step_progress_id: params.step_progress_id,
            document_type: search_text(params.document_type),
            pagination: Pagination::from_page(params.page, params.per_page),
        }
    }
}
