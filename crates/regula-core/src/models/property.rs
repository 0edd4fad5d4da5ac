//! Property model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{RegularizationStatus, StepProgress};

/// City used when a property is registered without one.
pub const DEFAULT_CITY: &str = "Mogi Mirim";

/// A real-estate parcel under regularization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    /// Unique identifier for the property
    pub id: u64,

    /// Municipal registration code, unique when present
    pub municipal_code: Option<String>,

    /// Land registry number
    pub registry_number: Option<String>,

    pub address_street: String,
    pub address_number: Option<String>,
    pub address_neighborhood: Option<String>,
    pub address_city: Option<String>,
    pub address_zipcode: Option<String>,

    /// Total area in square meters
    pub area_total: Option<f64>,

    /// Built area in square meters
    pub area_built: Option<f64>,

    pub property_type: Option<String>,
    pub current_use: Option<String>,
    pub current_owner: Option<String>,

    /// Informational summary status, independent of the ledger
    pub regularization_status: RegularizationStatus,

    pub description: Option<String>,

    /// Opaque point geometry, stored and returned untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,

    /// Opaque polygon geometry, stored and returned untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon_geometry: Option<String>,

    /// ID of the user who registered the property
    pub created_by: Option<u64>,

    /// Timestamp when the property was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the property was last updated (UTC)
    pub updated_at: Timestamp,

    /// Ledger entries ordered by step sequence
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepProgress>,
}

impl Property {
    /// Street, number, neighborhood and city joined by commas, skipping
    /// absent parts.
    pub fn full_address(&self) -> String {
        format_address(
            &self.address_street,
            self.address_number.as_deref(),
            self.address_neighborhood.as_deref(),
            self.address_city.as_deref(),
        )
    }
}

/// Joins address parts with ", ", skipping absent or empty ones.
pub fn format_address(
    street: &str,
    number: Option<&str>,
    neighborhood: Option<&str>,
    city: Option<&str>,
) -> String {
    [Some(street), number, neighborhood, city]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
