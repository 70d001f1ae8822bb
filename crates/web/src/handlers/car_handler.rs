//! Car handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use common::{AppError, AppResult, FieldErrors, PaginationParams};
use domain::{CarDetails, NewCar, INVALID_CHOICE_MESSAGE};

use crate::extractors::ValidatedForm;
use crate::middleware::CurrentDriver;
use crate::state::AppState;
use crate::types::{Found, Paginated, PaginatedCars};

/// Car create/update form
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CarForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    #[schema(example = "Continental")]
    pub model: String,
    /// Manufacturer ID
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub manufacturer: String,
    /// Driver IDs; repeat the field for several drivers
    #[serde(default)]
    pub drivers: Vec<String>,
}

impl CarForm {
    /// Resolve the submitted ids. Malformed ids are reported like unknown ones.
    fn into_new_car(self) -> AppResult<NewCar> {
        let mut errors = FieldErrors::new();

        let manufacturer_id = Uuid::parse_str(self.manufacturer.trim()).ok();
        if manufacturer_id.is_none() {
            errors.insert("manufacturer".into(), vec![INVALID_CHOICE_MESSAGE.into()]);
        }

        let driver_ids: Result<Vec<Uuid>, _> = self
            .drivers
            .iter()
            .map(|id| Uuid::parse_str(id.trim()))
            .collect();
        if driver_ids.is_err() {
            errors.insert("drivers".into(), vec![INVALID_CHOICE_MESSAGE.into()]);
        }

        match (manufacturer_id, driver_ids) {
            (Some(manufacturer_id), Ok(driver_ids)) if errors.is_empty() => Ok(NewCar {
                model: self.model,
                manufacturer_id,
                driver_ids,
            }),
            _ => Err(AppError::InvalidForm(errors)),
        }
    }
}

/// Car list filter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CarSearch {
    /// Case-insensitive model fragment
    pub model: Option<String>,
}

pub fn car_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cars).post(create_car))
        .route("/:id", get(get_car))
        .route("/:id/update", post(update_car))
        .route("/:id/delete", post(delete_car))
        .route("/:id/toggle-assign", post(toggle_assign))
}

/// List cars
#[utoipa::path(
    get,
    path = "/cars",
    tag = "Cars",
    security(("session_cookie" = [])),
    params(CarSearch, ("page" = Option<u64>, Query, description = "Page number")),
    responses(
        (status = 200, description = "Cars ordered by model", body = PaginatedCars)
    )
)]
pub async fn list_cars(
    State(state): State<AppState>,
    Query(search): Query<CarSearch>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PaginatedCars>> {
    let (cars, total) = state.services.cars.list_cars(search.model, params).await?;
    Ok(Json(Paginated::new(cars, params, total)))
}

/// Create a car
#[utoipa::path(
    post,
    path = "/cars",
    tag = "Cars",
    security(("session_cookie" = [])),
    request_body(content = CarForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Created, redirect to the list"),
        (status = 400, description = "Invalid form")
    )
)]
pub async fn create_car(
    State(state): State<AppState>,
    ValidatedForm(form): ValidatedForm<CarForm>,
) -> AppResult<Found> {
    state.services.cars.create_car(form.into_new_car()?).await?;
    Ok(Found::to("/cars"))
}

/// Car details
#[utoipa::path(
    get,
    path = "/cars/{id}",
    tag = "Cars",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Car with manufacturer and drivers", body = CarDetails),
        (status = 404, description = "Car not found")
    )
)]
pub async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CarDetails>> {
    Ok(Json(state.services.cars.get_car_details(id).await?))
}

/// Update a car
#[utoipa::path(
    post,
    path = "/cars/{id}/update",
    tag = "Cars",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Car ID")),
    request_body(content = CarForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Updated, redirect to the car"),
        (status = 400, description = "Invalid form"),
        (status = 404, description = "Car not found")
    )
)]
pub async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedForm(form): ValidatedForm<CarForm>,
) -> AppResult<Found> {
    state
        .services
        .cars
        .update_car(id, form.into_new_car()?)
        .await?;
    Ok(Found::to(format!("/cars/{}", id)))
}

/// Delete a car
#[utoipa::path(
    post,
    path = "/cars/{id}/delete",
    tag = "Cars",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Car ID")),
    responses(
        (status = 302, description = "Deleted, redirect to the list"),
        (status = 404, description = "Car not found")
    )
)]
pub async fn delete_car(State(state): State<AppState>, Path(id): Path<Uuid>) -> AppResult<Found> {
    state.services.cars.delete_car(id).await?;
    Ok(Found::to("/cars"))
}

/// Assign the logged-in driver to the car, or unassign if already assigned
#[utoipa::path(
    post,
    path = "/cars/{id}/toggle-assign",
    tag = "Cars",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Car ID")),
    responses(
        (status = 302, description = "Toggled, redirect to the car"),
        (status = 404, description = "Car not found")
    )
)]
pub async fn toggle_assign(
    State(state): State<AppState>,
    Extension(CurrentDriver(driver)): Extension<CurrentDriver>,
    Path(id): Path<Uuid>,
) -> AppResult<Found> {
    state.services.cars.toggle_assignment(id, driver.id).await?;
    Ok(Found::to(format!("/cars/{}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_ids_parsed() {
        let manufacturer = Uuid::new_v4();
        let driver = Uuid::new_v4();
        let car = CarForm {
            model: "Continental".into(),
            manufacturer: manufacturer.to_string(),
            drivers: vec![driver.to_string()],
        }
        .into_new_car()
        .unwrap();

        assert_eq!(car.manufacturer_id, manufacturer);
        assert_eq!(car.driver_ids, vec![driver]);
    }

    #[test]
    fn test_malformed_ids_are_invalid_choices() {
        let err = CarForm {
            model: "Continental".into(),
            manufacturer: "42".into(),
            drivers: vec!["nope".into()],
        }
        .into_new_car()
        .unwrap_err();

        let fields = err.field_errors().unwrap();
        assert_eq!(fields["manufacturer"], vec![INVALID_CHOICE_MESSAGE.to_string()]);
        assert_eq!(fields["drivers"], vec![INVALID_CHOICE_MESSAGE.to_string()]);
    }
}
