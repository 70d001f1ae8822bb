//! Driver repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::car_driver::{self, Entity as CarDriverEntity};
use super::entities::driver::{self, ActiveModel, Entity as DriverEntity};
use super::icontains;
use common::{AppError, AppResult, PaginationParams};
use domain::{Driver, NewDriver};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Driver repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DriverRepository: Send + Sync {
    /// Find driver by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>>;

    /// Find all drivers among the given IDs, ordered by username
    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Driver>>;

    /// Find driver by login name
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Driver>>;

    /// Find driver holding a license number
    async fn find_by_license_number(&self, license_number: &str) -> AppResult<Option<Driver>>;

    /// List drivers ordered by username, optionally filtered by a username substring.
    /// Returns the page and the total number of matches.
    async fn list(
        &self,
        search: Option<String>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Driver>, u64)>;

    /// Count all drivers
    async fn count(&self) -> AppResult<u64>;

    /// Create a new driver
    async fn create(&self, driver: NewDriver) -> AppResult<Driver>;

    /// Replace a driver's license number
    async fn update_license(&self, id: Uuid, license_number: String) -> AppResult<Driver>;

    /// Delete driver and its car assignments
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of DriverRepository
pub struct DriverStore {
    db: DatabaseConnection,
}

impl DriverStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DriverRepository for DriverStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>> {
        let result = DriverEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Driver::from))
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Driver>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = DriverEntity::find()
            .filter(driver::Column::Id.is_in(ids))
            .order_by_asc(driver::Column::Username)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Driver::from).collect())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Driver>> {
        let result = DriverEntity::find()
            .filter(driver::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(result.map(Driver::from))
    }

    async fn find_by_license_number(&self, license_number: &str) -> AppResult<Option<Driver>> {
        let result = DriverEntity::find()
            .filter(driver::Column::LicenseNumber.eq(license_number))
            .one(&self.db)
            .await?;

        Ok(result.map(Driver::from))
    }

    async fn list(
        &self,
        search: Option<String>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Driver>, u64)> {
        let mut query = DriverEntity::find().order_by_asc(driver::Column::Username);
        if let Some(term) = search {
            query = query.filter(icontains(driver::Column::Username, &term));
        }

        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page_index()).await?;

        Ok((models.into_iter().map(Driver::from).collect(), total))
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(DriverEntity::find().count(&self.db).await?)
    }

    async fn create(&self, driver: NewDriver) -> AppResult<Driver> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(driver.username),
            password_hash: Set(driver.password_hash),
            first_name: Set(driver.first_name),
            last_name: Set(driver.last_name),
            license_number: Set(driver.license_number),
            date_joined: Set(chrono::Utc::now()),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Driver::from(model))
    }

    async fn update_license(&self, id: Uuid, license_number: String) -> AppResult<Driver> {
        let driver = DriverEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = driver.into();
        active.license_number = Set(license_number);

        let model = active.update(&self.db).await?;
        Ok(Driver::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let txn = self.db.begin().await?;

        CarDriverEntity::delete_many()
            .filter(car_driver::Column::DriverId.eq(id))
            .exec(&txn)
            .await?;

        let result = DriverEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        txn.commit().await?;
        Ok(())
    }
}
