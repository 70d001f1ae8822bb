//! Driver domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Driver domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub license_number: String,
    pub date_joined: DateTime<Utc>,
}

impl Driver {
    /// Full name, or the username when no name was given
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Data required to register a driver (password already hashed)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDriver {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub license_number: String,
}

/// Driver registration input (plain text password)
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterDriver {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub license_number: String,
}

/// Driver response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DriverResponse {
    /// Unique driver identifier
    pub id: Uuid,
    /// Login name
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// License number in `AAA99999` format
    pub license_number: String,
    pub date_joined: DateTime<Utc>,
}

impl From<Driver> for DriverResponse {
    fn from(driver: Driver) -> Self {
        Self {
            id: driver.id,
            username: driver.username,
            first_name: driver.first_name,
            last_name: driver.last_name,
            license_number: driver.license_number,
            date_joined: driver.date_joined,
        }
    }
}

impl From<&Driver> for DriverResponse {
    fn from(driver: &Driver) -> Self {
        Self {
            id: driver.id,
            username: driver.username.clone(),
            first_name: driver.first_name.clone(),
            last_name: driver.last_name.clone(),
            license_number: driver.license_number.clone(),
            date_joined: driver.date_joined,
        }
    }
}
