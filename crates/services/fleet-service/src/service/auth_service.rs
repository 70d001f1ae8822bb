//! Authentication service - Verifies driver credentials.
//!
//! Uses the domain Password value object; sessions are handled by the web layer.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use common::{AppError, AppResult};
use domain::{Driver, Password};

use super::blocking;
use crate::repository::DriverRepository;

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check a username/password pair and return the matching driver
    async fn authenticate(&self, username: &str, password: &str) -> AppResult<Driver>;
}

pub struct Authenticator {
    drivers: Arc<dyn DriverRepository>,
}

impl Authenticator {
    pub fn new(drivers: Arc<dyn DriverRepository>) -> Self {
        Self { drivers }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn authenticate(&self, username: &str, password: &str) -> AppResult<Driver> {
        let driver = self.drivers.find_by_username(username.trim()).await?;
        let plain = password.to_string();

        // Unknown usernames still pay for one hash verification.
        let Some(driver) = driver else {
            blocking(move || Password::verify_decoy(&plain)).await?;
            debug!(username = %username, "Login attempt for unknown username");
            return Err(AppError::InvalidCredentials);
        };

        let stored = Password::from_hash(driver.password_hash.clone());
        if !blocking(move || stored.verify(&plain)).await? {
            debug!(driver_id = %driver.id, "Login attempt with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        info!(driver_id = %driver.id, "Driver authenticated");
        Ok(driver)
    }
}
