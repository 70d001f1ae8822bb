//! Car repository implementation.
//!
//! Driver assignments are stored in the `cars_drivers` join table and
//! loaded alongside every car returned from this repository.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::car::{self, ActiveModel, Entity as CarEntity};
use super::entities::car_driver::{self, Entity as CarDriverEntity};
use super::icontains;
use common::{AppError, AppResult, PaginationParams};
use domain::{Car, NewCar};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Car repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CarRepository: Send + Sync {
    /// Find car by ID with its driver assignments
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Car>>;

    /// List cars ordered by model, optionally filtered by a model substring
    async fn list(
        &self,
        search: Option<String>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Car>, u64)>;

    /// All cars a driver is assigned to
    async fn list_for_driver(&self, driver_id: Uuid) -> AppResult<Vec<Car>>;

    /// Count all cars
    async fn count(&self) -> AppResult<u64>;

    /// Create a car and its driver assignments
    async fn create(&self, car: NewCar) -> AppResult<Car>;

    /// Update a car, replacing its driver assignments
    async fn update(&self, id: Uuid, car: NewCar) -> AppResult<Car>;

    /// Delete a car and its driver assignments
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Assign a driver to a car
    async fn add_driver(&self, car_id: Uuid, driver_id: Uuid) -> AppResult<()>;

    /// Unassign a driver from a car
    async fn remove_driver(&self, car_id: Uuid, driver_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of CarRepository
pub struct CarStore {
    db: DatabaseConnection,
}

impl CarStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Load driver assignments for a batch of car rows.
    async fn with_drivers<C: ConnectionTrait>(
        conn: &C,
        models: Vec<car::Model>,
    ) -> AppResult<Vec<Car>> {
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut links: HashMap<Uuid, Vec<Uuid>> = HashMap::new();

        if !ids.is_empty() {
            let rows = CarDriverEntity::find()
                .filter(car_driver::Column::CarId.is_in(ids))
                .all(conn)
                .await?;
            for row in rows {
                links.entry(row.car_id).or_default().push(row.driver_id);
            }
        }

        Ok(models
            .into_iter()
            .map(|m| Car {
                driver_ids: links.remove(&m.id).unwrap_or_default(),
                id: m.id,
                model: m.model,
                manufacturer_id: m.manufacturer_id,
            })
            .collect())
    }

    /// Insert join rows for a car.
    async fn insert_links<C: ConnectionTrait>(
        conn: &C,
        car_id: Uuid,
        driver_ids: &[Uuid],
    ) -> AppResult<()> {
        if driver_ids.is_empty() {
            return Ok(());
        }

        let rows = driver_ids.iter().map(|driver_id| car_driver::ActiveModel {
            car_id: Set(car_id),
            driver_id: Set(*driver_id),
        });

        CarDriverEntity::insert_many(rows)
            .exec_without_returning(conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CarRepository for CarStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Car>> {
        let Some(model) = CarEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let mut cars = Self::with_drivers(&self.db, vec![model]).await?;
        Ok(cars.pop())
    }

    async fn list(
        &self,
        search: Option<String>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Car>, u64)> {
        let mut query = CarEntity::find()
            .order_by_asc(car::Column::Model)
            .order_by_asc(car::Column::Id);
        if let Some(term) = search {
            query = query.filter(icontains(car::Column::Model, &term));
        }

        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page_index()).await?;

        Ok((Self::with_drivers(&self.db, models).await?, total))
    }

    async fn list_for_driver(&self, driver_id: Uuid) -> AppResult<Vec<Car>> {
        let car_ids: Vec<Uuid> = CarDriverEntity::find()
            .select_only()
            .column(car_driver::Column::CarId)
            .filter(car_driver::Column::DriverId.eq(driver_id))
            .into_tuple()
            .all(&self.db)
            .await?;

        if car_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = CarEntity::find()
            .filter(car::Column::Id.is_in(car_ids))
            .order_by_asc(car::Column::Model)
            .all(&self.db)
            .await?;

        Self::with_drivers(&self.db, models).await
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(CarEntity::find().count(&self.db).await?)
    }

    async fn create(&self, car: NewCar) -> AppResult<Car> {
        let driver_ids = car.unique_driver_ids();
        let txn = self.db.begin().await?;

        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            model: Set(car.model),
            manufacturer_id: Set(car.manufacturer_id),
        }
        .insert(&txn)
        .await?;

        Self::insert_links(&txn, model.id, &driver_ids).await?;
        txn.commit().await?;

        Ok(Car {
            id: model.id,
            model: model.model,
            manufacturer_id: model.manufacturer_id,
            driver_ids,
        })
    }

    async fn update(&self, id: Uuid, car: NewCar) -> AppResult<Car> {
        let driver_ids = car.unique_driver_ids();
        let txn = self.db.begin().await?;

        let existing = CarEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.model = Set(car.model);
        active.manufacturer_id = Set(car.manufacturer_id);
        let model = active.update(&txn).await?;

        CarDriverEntity::delete_many()
            .filter(car_driver::Column::CarId.eq(id))
            .exec(&txn)
            .await?;
        Self::insert_links(&txn, id, &driver_ids).await?;
        txn.commit().await?;

        Ok(Car {
            id: model.id,
            model: model.model,
            manufacturer_id: model.manufacturer_id,
            driver_ids,
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let txn = self.db.begin().await?;

        CarDriverEntity::delete_many()
            .filter(car_driver::Column::CarId.eq(id))
            .exec(&txn)
            .await?;

        let result = CarEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        txn.commit().await?;
        Ok(())
    }

    async fn add_driver(&self, car_id: Uuid, driver_id: Uuid) -> AppResult<()> {
        Self::insert_links(&self.db, car_id, &[driver_id]).await
    }

    async fn remove_driver(&self, car_id: Uuid, driver_id: Uuid) -> AppResult<()> {
        CarDriverEntity::delete_many()
            .filter(car_driver::Column::CarId.eq(car_id))
            .filter(car_driver::Column::DriverId.eq(driver_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
