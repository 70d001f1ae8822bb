//! Driver handlers.

use std::borrow::Cow;

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use common::{AppResult, PaginationParams};
use domain::{
    validate_license_number, Car, DomainError, DriverResponse, RegisterDriver,
    INVALID_LICENSE_MESSAGE, MIN_PASSWORD_LENGTH,
};

use crate::extractors::ValidatedForm;
use crate::state::AppState;
use crate::types::{Found, Paginated, PaginatedDrivers};

/// License number check for form fields. Blank values are left to the
/// required-field check.
fn license_number(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    validate_license_number(value).map_err(|_| {
        ValidationError::new("invalid_license").with_message(Cow::Borrowed(INVALID_LICENSE_MESSAGE))
    })
}

/// Minimum length, then not entirely numeric. Blank values are left to the
/// required-field check.
fn password_strength(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    if value.chars().count() < MIN_PASSWORD_LENGTH {
        let error = DomainError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        };
        return Err(ValidationError::new("password_too_short")
            .with_message(Cow::Owned(error.to_string())));
    }
    if value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("password_entirely_numeric")
            .with_message(Cow::Borrowed("This password is entirely numeric.")));
    }
    Ok(())
}

/// Driver registration form
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DriverCreationForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    #[schema(example = "admin.user")]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub password1: String,
    /// Repeat of `password1`
    #[serde(default)]
    #[validate(
        length(min = 1, message = "This field is required."),
        must_match(other = "password1", message = "The two password fields didn't match."),
        custom(function = "password_strength")
    )]
    pub password2: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    #[validate(
        length(min = 1, message = "This field is required."),
        custom(function = "license_number")
    )]
    #[schema(example = "ABC12345")]
    pub license_number: String,
}

impl From<DriverCreationForm> for RegisterDriver {
    fn from(form: DriverCreationForm) -> Self {
        RegisterDriver {
            username: form.username,
            password: form.password2,
            first_name: form.first_name,
            last_name: form.last_name,
            license_number: form.license_number,
        }
    }
}

/// License number update form
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DriverLicenseUpdateForm {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "This field is required."),
        custom(function = "license_number")
    )]
    #[schema(example = "DEF56789")]
    pub license_number: String,
}

/// Driver list filter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DriverSearch {
    /// Case-insensitive username fragment
    pub username: Option<String>,
}

/// Driver with the cars assigned to them
#[derive(Debug, Serialize, ToSchema)]
pub struct DriverDetail {
    pub driver: DriverResponse,
    pub cars: Vec<Car>,
}

pub fn driver_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drivers).post(create_driver))
        .route("/:id", get(get_driver))
        .route("/:id/license", post(update_license))
        .route("/:id/delete", post(delete_driver))
}

/// List drivers
#[utoipa::path(
    get,
    path = "/drivers",
    tag = "Drivers",
    security(("session_cookie" = [])),
    params(DriverSearch, ("page" = Option<u64>, Query, description = "Page number")),
    responses(
        (status = 200, description = "Drivers ordered by username", body = PaginatedDrivers)
    )
)]
pub async fn list_drivers(
    State(state): State<AppState>,
    Query(search): Query<DriverSearch>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PaginatedDrivers>> {
    let (drivers, total) = state
        .services
        .drivers
        .list_drivers(search.username, params)
        .await?;

    Ok(Json(
        Paginated::new(drivers, params, total).map(DriverResponse::from),
    ))
}

/// Register a driver
#[utoipa::path(
    post,
    path = "/drivers",
    tag = "Drivers",
    security(("session_cookie" = [])),
    request_body(content = DriverCreationForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Registered, redirect to the driver"),
        (status = 400, description = "Invalid form")
    )
)]
pub async fn create_driver(
    State(state): State<AppState>,
    ValidatedForm(form): ValidatedForm<DriverCreationForm>,
) -> AppResult<Found> {
    let driver = state.services.drivers.register_driver(form.into()).await?;
    Ok(Found::to(format!("/drivers/{}", driver.id)))
}

/// Driver details with assigned cars
#[utoipa::path(
    get,
    path = "/drivers/{id}",
    tag = "Drivers",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Driver ID")),
    responses(
        (status = 200, description = "Driver and cars", body = DriverDetail),
        (status = 404, description = "Driver not found")
    )
)]
pub async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DriverDetail>> {
    let driver = state.services.drivers.get_driver(id).await?;
    let cars = state.services.cars.cars_for_driver(id).await?;

    Ok(Json(DriverDetail {
        driver: DriverResponse::from(driver),
        cars,
    }))
}

/// Change a driver's license number
#[utoipa::path(
    post,
    path = "/drivers/{id}/license",
    tag = "Drivers",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Driver ID")),
    request_body(content = DriverLicenseUpdateForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Updated, redirect to the driver"),
        (status = 400, description = "Invalid form"),
        (status = 404, description = "Driver not found")
    )
)]
pub async fn update_license(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedForm(form): ValidatedForm<DriverLicenseUpdateForm>,
) -> AppResult<Found> {
    state
        .services
        .drivers
        .update_license(id, form.license_number)
        .await?;
    Ok(Found::to(format!("/drivers/{}", id)))
}

/// Delete a driver
#[utoipa::path(
    post,
    path = "/drivers/{id}/delete",
    tag = "Drivers",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Driver ID")),
    responses(
        (status = 302, description = "Deleted, redirect to the list"),
        (status = 404, description = "Driver not found")
    )
)]
pub async fn delete_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Found> {
    state.services.drivers.delete_driver(id).await?;
    Ok(Found::to("/drivers"))
}
