//! Domain layer - Core fleet entities and business rules.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! license number validation, session visit counting, credential hashing and
//! the driver/manufacturer/car entities shared by every other crate.

pub mod car;
pub mod constants;
pub mod driver;
pub mod error;
pub mod license;
pub mod manufacturer;
pub mod password;
pub mod visits;

pub use car::{Car, CarDetails, NewCar};
pub use constants::*;
pub use driver::{Driver, DriverResponse, NewDriver, RegisterDriver};
pub use error::{DomainError, DomainResult};
pub use license::{validate_license_number, LicenseNumber};
pub use manufacturer::{Manufacturer, NewManufacturer};
pub use password::Password;
pub use visits::{record_visit, visit_count, SessionScope};
