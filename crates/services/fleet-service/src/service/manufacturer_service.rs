//! Manufacturer service.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt, FieldErrors, PaginationParams};
use domain::{Manufacturer, NewManufacturer, MAX_NAME_LENGTH, REQUIRED_FIELD_MESSAGE};

use super::{check_length, normalize_search};
use crate::repository::ManufacturerRepository;

const NAME_TAKEN_MESSAGE: &str = "Manufacturer with this Name already exists.";

#[async_trait]
pub trait ManufacturerService: Send + Sync {
    async fn get_manufacturer(&self, id: Uuid) -> AppResult<Manufacturer>;

    /// Page through manufacturers, optionally filtered by name substring
    async fn list_manufacturers(
        &self,
        search: Option<String>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Manufacturer>, u64)>;

    async fn count_manufacturers(&self) -> AppResult<u64>;

    async fn create_manufacturer(&self, input: NewManufacturer) -> AppResult<Manufacturer>;

    async fn update_manufacturer(&self, id: Uuid, input: NewManufacturer)
        -> AppResult<Manufacturer>;

    /// Delete manufacturer together with its cars
    async fn delete_manufacturer(&self, id: Uuid) -> AppResult<()>;
}

pub struct ManufacturerManager {
    repo: Arc<dyn ManufacturerRepository>,
}

impl ManufacturerManager {
    pub fn new(repo: Arc<dyn ManufacturerRepository>) -> Self {
        Self { repo }
    }

    /// Trim and bound fields and check the name is not used by another
    /// manufacturer.
    async fn clean(&self, input: NewManufacturer, id: Option<Uuid>) -> AppResult<NewManufacturer> {
        let cleaned = NewManufacturer {
            name: input.name.trim().to_string(),
            country: input.country.trim().to_string(),
        };

        let mut errors = FieldErrors::new();
        if cleaned.name.is_empty() {
            errors.insert("name".into(), vec![REQUIRED_FIELD_MESSAGE.into()]);
        }
        if cleaned.country.is_empty() {
            errors.insert("country".into(), vec![REQUIRED_FIELD_MESSAGE.into()]);
        }
        check_length(&mut errors, "name", &cleaned.name, MAX_NAME_LENGTH);
        check_length(&mut errors, "country", &cleaned.country, MAX_NAME_LENGTH);
        if !errors.is_empty() {
            return Err(AppError::InvalidForm(errors));
        }

        match self.repo.find_by_name(&cleaned.name).await? {
            Some(existing) if Some(existing.id) != id => {
                Err(AppError::field("name", NAME_TAKEN_MESSAGE))
            }
            _ => Ok(cleaned),
        }
    }
}

#[async_trait]
impl ManufacturerService for ManufacturerManager {
    async fn get_manufacturer(&self, id: Uuid) -> AppResult<Manufacturer> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_manufacturers(
        &self,
        search: Option<String>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Manufacturer>, u64)> {
        self.repo.list(normalize_search(search), params).await
    }

    async fn count_manufacturers(&self) -> AppResult<u64> {
        self.repo.count().await
    }

    async fn create_manufacturer(&self, input: NewManufacturer) -> AppResult<Manufacturer> {
        let input = self.clean(input, None).await?;
        let manufacturer = self.repo.create(input).await?;
        info!(manufacturer_id = %manufacturer.id, name = %manufacturer.name, "Manufacturer created");
        Ok(manufacturer)
    }

    async fn update_manufacturer(
        &self,
        id: Uuid,
        input: NewManufacturer,
    ) -> AppResult<Manufacturer> {
        let input = self.clean(input, Some(id)).await?;
        let manufacturer = self.repo.update(id, input).await?;
        info!(manufacturer_id = %manufacturer.id, "Manufacturer updated");
        Ok(manufacturer)
    }

    async fn delete_manufacturer(&self, id: Uuid) -> AppResult<()> {
        self.repo.delete(id).await?;
        info!(manufacturer_id = %id, "Manufacturer deleted");
        Ok(())
    }
}
