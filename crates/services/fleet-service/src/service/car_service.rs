//! Car service - car lifecycle and driver assignment.
//!
//! Cars reference a manufacturer and any number of drivers. Both references
//! are checked against storage before a car is written, and reported as form
//! errors on the `manufacturer` / `drivers` fields when they do not resolve.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use common::{AppError, AppResult, FieldErrors, OptionExt, PaginationParams};
use domain::{
    Car, CarDetails, DriverResponse, NewCar, INVALID_CHOICE_MESSAGE, MAX_NAME_LENGTH,
    REQUIRED_FIELD_MESSAGE,
};

use super::{check_length, normalize_search};
use crate::repository::{CarRepository, DriverRepository, ManufacturerRepository};

#[async_trait]
pub trait CarService: Send + Sync {
    /// Get car by ID
    async fn get_car(&self, id: Uuid) -> AppResult<Car>;

    /// Car with its manufacturer and drivers resolved
    async fn get_car_details(&self, id: Uuid) -> AppResult<CarDetails>;

    /// Page through cars, optionally filtered by model substring
    async fn list_cars(
        &self,
        search: Option<String>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Car>, u64)>;

    async fn count_cars(&self) -> AppResult<u64>;

    /// Cars the driver is assigned to
    async fn cars_for_driver(&self, driver_id: Uuid) -> AppResult<Vec<Car>>;

    async fn create_car(&self, input: NewCar) -> AppResult<Car>;

    async fn update_car(&self, id: Uuid, input: NewCar) -> AppResult<Car>;

    async fn delete_car(&self, id: Uuid) -> AppResult<()>;

    /// Assign the driver if absent, unassign if present.
    /// Returns whether the driver is assigned afterwards.
    async fn toggle_assignment(&self, car_id: Uuid, driver_id: Uuid) -> AppResult<bool>;
}

pub struct CarManager {
    cars: Arc<dyn CarRepository>,
    manufacturers: Arc<dyn ManufacturerRepository>,
    drivers: Arc<dyn DriverRepository>,
}

impl CarManager {
    pub fn new(
        cars: Arc<dyn CarRepository>,
        manufacturers: Arc<dyn ManufacturerRepository>,
        drivers: Arc<dyn DriverRepository>,
    ) -> Self {
        Self {
            cars,
            manufacturers,
            drivers,
        }
    }

    async fn clean(&self, input: NewCar) -> AppResult<NewCar> {
        let model = input.model.trim().to_string();
        if model.is_empty() {
            return Err(AppError::field("model", REQUIRED_FIELD_MESSAGE));
        }
        let mut errors = FieldErrors::new();
        check_length(&mut errors, "model", &model, MAX_NAME_LENGTH);
        if !errors.is_empty() {
            return Err(AppError::InvalidForm(errors));
        }

        if self
            .manufacturers
            .find_by_id(input.manufacturer_id)
            .await?
            .is_none()
        {
            return Err(AppError::field("manufacturer", INVALID_CHOICE_MESSAGE));
        }

        let driver_ids = input.unique_driver_ids();
        let found = self.drivers.find_by_ids(driver_ids.clone()).await?;
        if found.len() != driver_ids.len() {
            return Err(AppError::field("drivers", INVALID_CHOICE_MESSAGE));
        }

        Ok(NewCar {
            model,
            manufacturer_id: input.manufacturer_id,
            driver_ids,
        })
    }
}

#[async_trait]
impl CarService for CarManager {
    async fn get_car(&self, id: Uuid) -> AppResult<Car> {
        self.cars.find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_car_details(&self, id: Uuid) -> AppResult<CarDetails> {
        let car = self.get_car(id).await?;

        let manufacturer = self
            .manufacturers
            .find_by_id(car.manufacturer_id)
            .await?
            .ok_or_else(|| {
                AppError::internal(format!("Car {} references a missing manufacturer", car.id))
            })?;

        let drivers = self
            .drivers
            .find_by_ids(car.driver_ids.clone())
            .await?
            .iter()
            .map(DriverResponse::from)
            .collect();

        Ok(CarDetails {
            id: car.id,
            model: car.model,
            manufacturer,
            drivers,
        })
    }

    async fn list_cars(
        &self,
        search: Option<String>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Car>, u64)> {
        self.cars.list(normalize_search(search), params).await
    }

    async fn count_cars(&self) -> AppResult<u64> {
        self.cars.count().await
    }

    async fn cars_for_driver(&self, driver_id: Uuid) -> AppResult<Vec<Car>> {
        self.cars.list_for_driver(driver_id).await
    }

    async fn create_car(&self, input: NewCar) -> AppResult<Car> {
        let input = self.clean(input).await?;
        let car = self.cars.create(input).await?;
        info!(car_id = %car.id, model = %car.model, drivers = car.driver_ids.len(), "Car created");
        Ok(car)
    }

    async fn update_car(&self, id: Uuid, input: NewCar) -> AppResult<Car> {
        self.get_car(id).await?;
        let input = self.clean(input).await?;
        let car = self.cars.update(id, input).await?;
        info!(car_id = %car.id, "Car updated");
        Ok(car)
    }

    async fn delete_car(&self, id: Uuid) -> AppResult<()> {
        self.cars.delete(id).await?;
        info!(car_id = %id, "Car deleted");
        Ok(())
    }

    async fn toggle_assignment(&self, car_id: Uuid, driver_id: Uuid) -> AppResult<bool> {
        let car = self.get_car(car_id).await?;
        if self.drivers.find_by_id(driver_id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        let assigned = if car.has_driver(&driver_id) {
            self.cars.remove_driver(car_id, driver_id).await?;
            false
        } else {
            self.cars.add_driver(car_id, driver_id).await?;
            true
        };

        info!(car_id = %car_id, driver_id = %driver_id, assigned, "Car assignment toggled");
        Ok(assigned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockCarRepository, MockDriverRepository, MockManufacturerRepository};
    use chrono::Utc;
    use domain::{Driver, Manufacturer};

    fn driver(id: Uuid) -> Driver {
        Driver {
            id,
            username: format!("driver-{}", id),
            password_hash: "hash".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            license_number: "ABC12345".to_string(),
            date_joined: Utc::now(),
        }
    }

    fn manufacturer(id: Uuid) -> Manufacturer {
        Manufacturer {
            id,
            name: "Lincoln".to_string(),
            country: "USA".to_string(),
        }
    }

    fn manager(
        cars: MockCarRepository,
        manufacturers: MockManufacturerRepository,
        drivers: MockDriverRepository,
    ) -> CarManager {
        CarManager::new(Arc::new(cars), Arc::new(manufacturers), Arc::new(drivers))
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_manufacturer() {
        let mut manufacturers = MockManufacturerRepository::new();
        manufacturers.expect_find_by_id().returning(|_| Ok(None));

        let service = manager(
            MockCarRepository::new(),
            manufacturers,
            MockDriverRepository::new(),
        );
        let err = service
            .create_car(NewCar {
                model: "Continental".to_string(),
                manufacturer_id: Uuid::new_v4(),
                driver_ids: vec![],
            })
            .await
            .unwrap_err();

        assert_eq!(
            err.field_errors().unwrap()["manufacturer"],
            vec![INVALID_CHOICE_MESSAGE.to_string()]
        );
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_driver() {
        let mut manufacturers = MockManufacturerRepository::new();
        manufacturers
            .expect_find_by_id()
            .returning(|id| Ok(Some(manufacturer(id))));
        let mut drivers = MockDriverRepository::new();
        drivers.expect_find_by_ids().returning(|_| Ok(vec![]));

        let service = manager(MockCarRepository::new(), manufacturers, drivers);
        let err = service
            .create_car(NewCar {
                model: "Continental".to_string(),
                manufacturer_id: Uuid::new_v4(),
                driver_ids: vec![Uuid::new_v4()],
            })
            .await
            .unwrap_err();

        assert!(err.field_errors().unwrap().contains_key("drivers"));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_model() {
        let service = manager(
            MockCarRepository::new(),
            MockManufacturerRepository::new(),
            MockDriverRepository::new(),
        );
        let err = service
            .create_car(NewCar {
                model: "  ".to_string(),
                manufacturer_id: Uuid::new_v4(),
                driver_ids: vec![],
            })
            .await
            .unwrap_err();

        assert_eq!(
            err.field_errors().unwrap()["model"],
            vec![REQUIRED_FIELD_MESSAGE.to_string()]
        );
    }

    #[tokio::test]
    async fn test_create_rejects_overlong_model() {
        let service = manager(
            MockCarRepository::new(),
            MockManufacturerRepository::new(),
            MockDriverRepository::new(),
        );
        let err = service
            .create_car(NewCar {
                model: "m".repeat(MAX_NAME_LENGTH + 1),
                manufacturer_id: Uuid::new_v4(),
                driver_ids: vec![],
            })
            .await
            .unwrap_err();

        assert_eq!(
            err.field_errors().unwrap()["model"],
            vec!["Ensure this value has at most 255 characters (it has 256).".to_string()]
        );
    }

    #[tokio::test]
    async fn test_toggle_adds_missing_driver() {
        let car_id = Uuid::new_v4();
        let driver_id = Uuid::new_v4();

        let mut cars = MockCarRepository::new();
        cars.expect_find_by_id().returning(|id| {
            Ok(Some(Car {
                id,
                model: "Continental".to_string(),
                manufacturer_id: Uuid::new_v4(),
                driver_ids: vec![],
            }))
        });
        cars.expect_add_driver().times(1).returning(|_, _| Ok(()));
        cars.expect_remove_driver().never();

        let mut drivers = MockDriverRepository::new();
        drivers.expect_find_by_id().returning(|id| Ok(Some(driver(id))));

        let service = manager(cars, MockManufacturerRepository::new(), drivers);
        assert!(service.toggle_assignment(car_id, driver_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_toggle_removes_assigned_driver() {
        let driver_id = Uuid::new_v4();

        let mut cars = MockCarRepository::new();
        cars.expect_find_by_id().returning(move |id| {
            Ok(Some(Car {
                id,
                model: "Continental".to_string(),
                manufacturer_id: Uuid::new_v4(),
                driver_ids: vec![driver_id],
            }))
        });
        cars.expect_remove_driver().times(1).returning(|_, _| Ok(()));
        cars.expect_add_driver().never();

        let mut drivers = MockDriverRepository::new();
        drivers.expect_find_by_id().returning(|id| Ok(Some(driver(id))));

        let service = manager(cars, MockManufacturerRepository::new(), drivers);
        assert!(!service
            .toggle_assignment(Uuid::new_v4(), driver_id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_details_resolve_references() {
        let manufacturer_id = Uuid::new_v4();
        let driver_id = Uuid::new_v4();

        let mut cars = MockCarRepository::new();
        cars.expect_find_by_id().returning(move |id| {
            Ok(Some(Car {
                id,
                model: "Continental".to_string(),
                manufacturer_id,
                driver_ids: vec![driver_id],
            }))
        });
        let mut manufacturers = MockManufacturerRepository::new();
        manufacturers
            .expect_find_by_id()
            .returning(|id| Ok(Some(manufacturer(id))));
        let mut drivers = MockDriverRepository::new();
        drivers
            .expect_find_by_ids()
            .returning(|ids| Ok(ids.into_iter().map(driver).collect()));

        let service = manager(cars, manufacturers, drivers);
        let details = service.get_car_details(Uuid::new_v4()).await.unwrap();

        assert_eq!(details.manufacturer.id, manufacturer_id);
        assert_eq!(details.drivers.len(), 1);
        assert_eq!(details.drivers[0].id, driver_id);
    }
}
