//! Car domain entity and related types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::driver::DriverResponse;
use crate::manufacturer::Manufacturer;

/// Car with references to its manufacturer and drivers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Car {
    /// Unique car identifier
    pub id: Uuid,
    /// Car model name
    pub model: String,
    pub manufacturer_id: Uuid,
    /// Drivers assigned to this car
    pub driver_ids: Vec<Uuid>,
}

impl Car {
    /// Check if a driver is assigned to this car
    pub fn has_driver(&self, driver_id: &Uuid) -> bool {
        self.driver_ids.contains(driver_id)
    }
}

/// Car creation/update data
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewCar {
    pub model: String,
    pub manufacturer_id: Uuid,
    pub driver_ids: Vec<Uuid>,
}

impl NewCar {
    /// Driver ids with duplicates removed, first occurrence wins
    pub fn unique_driver_ids(&self) -> Vec<Uuid> {
        let mut seen = Vec::with_capacity(self.driver_ids.len());
        for id in &self.driver_ids {
            if !seen.contains(id) {
                seen.push(*id);
            }
        }
        seen
    }
}

/// Car with manufacturer and drivers resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CarDetails {
    pub id: Uuid,
    pub model: String,
    pub manufacturer: Manufacturer,
    pub drivers: Vec<DriverResponse>,
}
