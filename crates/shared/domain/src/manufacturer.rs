//! Manufacturer domain entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Car manufacturer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Manufacturer {
    /// Unique manufacturer identifier
    pub id: Uuid,
    /// Manufacturer name (unique)
    pub name: String,
    /// Country of origin
    pub country: String,
}

/// Manufacturer creation/update data
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewManufacturer {
    pub name: String,
    pub country: String,
}
