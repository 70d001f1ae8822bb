//! Driver service - registration, license changes and lookups.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use common::{
    AppError, AppResult, FieldErrors, OptionExt, PaginationParams, LICENSE_NUMBER_FIELD,
};
use domain::{
    Driver, DomainError, LicenseNumber, NewDriver, Password, RegisterDriver,
    MAX_PERSON_NAME_LENGTH, MAX_USERNAME_LENGTH, REQUIRED_FIELD_MESSAGE,
};

use super::{blocking, check_length, normalize_search};
use crate::repository::DriverRepository;

const USERNAME_TAKEN_MESSAGE: &str = "A user with that username already exists.";
const LICENSE_TAKEN_MESSAGE: &str = "Driver with this License number already exists.";

/// Driver service trait for dependency injection.
#[async_trait]
pub trait DriverService: Send + Sync {
    /// Get driver by ID
    async fn get_driver(&self, id: Uuid) -> AppResult<Driver>;

    /// Page through drivers, optionally filtered by username substring
    async fn list_drivers(
        &self,
        search: Option<String>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Driver>, u64)>;

    /// Number of registered drivers
    async fn count_drivers(&self) -> AppResult<u64>;

    /// Register a new driver
    async fn register_driver(&self, input: RegisterDriver) -> AppResult<Driver>;

    /// Replace a driver's license number
    async fn update_license(&self, id: Uuid, license_number: String) -> AppResult<Driver>;

    /// Delete driver
    async fn delete_driver(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of DriverService using repository.
pub struct DriverManager {
    repo: Arc<dyn DriverRepository>,
}

impl DriverManager {
    pub fn new(repo: Arc<dyn DriverRepository>) -> Self {
        Self { repo }
    }

    /// Fail when the license belongs to a driver other than `owner`.
    async fn ensure_license_free(&self, license: &LicenseNumber, owner: Option<Uuid>) -> AppResult<()> {
        match self.repo.find_by_license_number(license.as_str()).await? {
            Some(holder) if Some(holder.id) != owner => {
                Err(AppError::field(LICENSE_NUMBER_FIELD, LICENSE_TAKEN_MESSAGE))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl DriverService for DriverManager {
    async fn get_driver(&self, id: Uuid) -> AppResult<Driver> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_drivers(
        &self,
        search: Option<String>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Driver>, u64)> {
        self.repo.list(normalize_search(search), params).await
    }

    async fn count_drivers(&self) -> AppResult<u64> {
        self.repo.count().await
    }

    async fn register_driver(&self, input: RegisterDriver) -> AppResult<Driver> {
        let username = input.username.trim().to_string();
        let first_name = input.first_name.trim().to_string();
        let last_name = input.last_name.trim().to_string();

        let mut errors = FieldErrors::new();
        if username.is_empty() {
            errors.insert("username".into(), vec![REQUIRED_FIELD_MESSAGE.into()]);
        }
        check_length(&mut errors, "username", &username, MAX_USERNAME_LENGTH);
        check_length(&mut errors, "first_name", &first_name, MAX_PERSON_NAME_LENGTH);
        check_length(&mut errors, "last_name", &last_name, MAX_PERSON_NAME_LENGTH);
        if !errors.is_empty() {
            return Err(AppError::InvalidForm(errors));
        }

        let license = LicenseNumber::parse(input.license_number)?;

        if self.repo.find_by_username(&username).await?.is_some() {
            return Err(AppError::field("username", USERNAME_TAKEN_MESSAGE));
        }
        self.ensure_license_free(&license, None).await?;

        let plain = input.password;
        let password = blocking(move || Password::new(&plain))
            .await?
            .map_err(|e| match e {
                DomainError::PasswordTooShort { .. } => {
                    AppError::field("password2", e.to_string())
                }
                other => AppError::from(other),
            })?;

        let driver = self
            .repo
            .create(NewDriver {
                username,
                password_hash: password.into_string(),
                first_name,
                last_name,
                license_number: license.into_string(),
            })
            .await?;

        info!(driver_id = %driver.id, username = %driver.username, "Driver registered");
        Ok(driver)
    }

    async fn update_license(&self, id: Uuid, license_number: String) -> AppResult<Driver> {
        let license = LicenseNumber::parse(license_number)?;
        self.ensure_license_free(&license, Some(id)).await?;

        let driver = self.repo.update_license(id, license.into_string()).await?;
        info!(driver_id = %driver.id, license_number = %driver.license_number, "Driver license updated");
        Ok(driver)
    }

    async fn delete_driver(&self, id: Uuid) -> AppResult<()> {
        self.repo.delete(id).await?;
        info!(driver_id = %id, "Driver deleted");
        Ok(())
    }
}
