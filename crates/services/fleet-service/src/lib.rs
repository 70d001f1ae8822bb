//! Fleet Service Library
//!
//! Persistence and use cases for drivers, manufacturers and cars.
//! Embedded by the web application; also drives the `migrate` CLI commands.

pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

use common::DatabaseConfig;

use crate::infra::Database;
use crate::repository::{CarStore, DriverStore, ManufacturerStore};
use crate::service::{
    AuthService, Authenticator, CarManager, CarService, DriverManager, DriverService,
    ManufacturerManager, ManufacturerService,
};

/// Every fleet use case, wired to one database connection.
#[derive(Clone)]
pub struct FleetServices {
    pub drivers: Arc<dyn DriverService>,
    pub manufacturers: Arc<dyn ManufacturerService>,
    pub cars: Arc<dyn CarService>,
    pub auth: Arc<dyn AuthService>,
}

impl FleetServices {
    /// Build repositories and services over a connection.
    pub fn new(db: DatabaseConnection) -> Self {
        let driver_repo = Arc::new(DriverStore::new(db.clone()));
        let manufacturer_repo = Arc::new(ManufacturerStore::new(db.clone()));
        let car_repo = Arc::new(CarStore::new(db));

        Self {
            drivers: Arc::new(DriverManager::new(driver_repo.clone())),
            manufacturers: Arc::new(ManufacturerManager::new(manufacturer_repo.clone())),
            cars: Arc::new(CarManager::new(
                car_repo,
                manufacturer_repo,
                driver_repo.clone(),
            )),
            auth: Arc::new(Authenticator::new(driver_repo)),
        }
    }
}

/// Migration action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &DatabaseConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open(config).await?;

    match action {
        MigrateAction::Up => {
            db.migrate_up().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.migrate_down().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            for migration in db.migrations().await? {
                let marker = if migration.applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, migration.name);
            }
        }
        MigrateAction::Fresh => {
            db.reset().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}
