//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod car;
pub mod car_driver;
pub mod driver;
pub mod manufacturer;
