//! Manufacturer repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::car::{self, Entity as CarEntity};
use super::entities::car_driver::{self, Entity as CarDriverEntity};
use super::entities::manufacturer::{self, ActiveModel, Entity as ManufacturerEntity};
use super::icontains;
use common::{AppError, AppResult, PaginationParams};
use domain::{Manufacturer, NewManufacturer};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Manufacturer repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ManufacturerRepository: Send + Sync {
    /// Find manufacturer by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Manufacturer>>;

    /// Find manufacturer by exact name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Manufacturer>>;

    /// List manufacturers ordered by name, optionally filtered by a name substring
    async fn list(
        &self,
        search: Option<String>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Manufacturer>, u64)>;

    /// Count all manufacturers
    async fn count(&self) -> AppResult<u64>;

    /// Create a new manufacturer
    async fn create(&self, manufacturer: NewManufacturer) -> AppResult<Manufacturer>;

    /// Update name and country
    async fn update(&self, id: Uuid, manufacturer: NewManufacturer) -> AppResult<Manufacturer>;

    /// Delete manufacturer together with its cars
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of ManufacturerRepository
pub struct ManufacturerStore {
    db: DatabaseConnection,
}

impl ManufacturerStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ManufacturerRepository for ManufacturerStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Manufacturer>> {
        let result = ManufacturerEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Manufacturer::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Manufacturer>> {
        let result = ManufacturerEntity::find()
            .filter(manufacturer::Column::Name.eq(name))
            .one(&self.db)
            .await?;

        Ok(result.map(Manufacturer::from))
    }

    async fn list(
        &self,
        search: Option<String>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Manufacturer>, u64)> {
        let mut query = ManufacturerEntity::find().order_by_asc(manufacturer::Column::Name);
        if let Some(term) = search {
            query = query.filter(icontains(manufacturer::Column::Name, &term));
        }

        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page_index()).await?;

        Ok((models.into_iter().map(Manufacturer::from).collect(), total))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(ManufacturerEntity::find().count(&self.db).await?)
    }

    async fn create(&self, manufacturer: NewManufacturer) -> AppResult<Manufacturer> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(manufacturer.name),
            country: Set(manufacturer.country),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Manufacturer::from(model))
    }

    async fn update(&self, id: Uuid, manufacturer: NewManufacturer) -> AppResult<Manufacturer> {
        let existing = ManufacturerEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(manufacturer.name);
        active.country = Set(manufacturer.country);

        let model = active.update(&self.db).await?;
        Ok(Manufacturer::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let txn = self.db.begin().await?;

        let car_ids: Vec<Uuid> = CarEntity::find()
            .select_only()
            .column(car::Column::Id)
            .filter(car::Column::ManufacturerId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;

        if !car_ids.is_empty() {
            CarDriverEntity::delete_many()
                .filter(car_driver::Column::CarId.is_in(car_ids.clone()))
                .exec(&txn)
                .await?;
            CarEntity::delete_many()
                .filter(car::Column::Id.is_in(car_ids))
                .exec(&txn)
                .await?;
        }

        let result = ManufacturerEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        txn.commit().await?;
        Ok(())
    }
}
