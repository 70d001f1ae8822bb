//! Manufacturer handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use common::{AppResult, PaginationParams};
use domain::NewManufacturer;

use crate::extractors::ValidatedForm;
use crate::state::AppState;
use crate::types::{Found, Paginated, PaginatedManufacturers};

const MANUFACTURERS_URL: &str = "/manufacturers";

/// Manufacturer create/update form
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ManufacturerForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    #[schema(example = "Lincoln")]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    #[schema(example = "USA")]
    pub country: String,
}

impl From<ManufacturerForm> for NewManufacturer {
    fn from(form: ManufacturerForm) -> Self {
        NewManufacturer {
            name: form.name,
            country: form.country,
        }
    }
}

/// Manufacturer list filter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ManufacturerSearch {
    /// Case-insensitive name fragment
    pub name: Option<String>,
}

pub fn manufacturer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_manufacturers).post(create_manufacturer))
        .route("/:id/update", post(update_manufacturer))
        .route("/:id/delete", post(delete_manufacturer))
}

/// List manufacturers
#[utoipa::path(
    get,
    path = "/manufacturers",
    tag = "Manufacturers",
    security(("session_cookie" = [])),
    params(ManufacturerSearch, ("page" = Option<u64>, Query, description = "Page number")),
    responses(
        (status = 200, description = "Manufacturers ordered by name", body = PaginatedManufacturers)
    )
)]
pub async fn list_manufacturers(
    State(state): State<AppState>,
    Query(search): Query<ManufacturerSearch>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PaginatedManufacturers>> {
    let (manufacturers, total) = state
        .services
        .manufacturers
        .list_manufacturers(search.name, params)
        .await?;

    Ok(Json(Paginated::new(manufacturers, params, total)))
}

/// Create a manufacturer
#[utoipa::path(
    post,
    path = "/manufacturers",
    tag = "Manufacturers",
    security(("session_cookie" = [])),
    request_body(content = ManufacturerForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Created, redirect to the list"),
        (status = 400, description = "Invalid form")
    )
)]
pub async fn create_manufacturer(
    State(state): State<AppState>,
    ValidatedForm(form): ValidatedForm<ManufacturerForm>,
) -> AppResult<Found> {
    state
        .services
        .manufacturers
        .create_manufacturer(form.into())
        .await?;
    Ok(Found::to(MANUFACTURERS_URL))
}

/// Update a manufacturer
#[utoipa::path(
    post,
    path = "/manufacturers/{id}/update",
    tag = "Manufacturers",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Manufacturer ID")),
    request_body(content = ManufacturerForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Updated, redirect to the list"),
        (status = 400, description = "Invalid form"),
        (status = 404, description = "Manufacturer not found")
    )
)]
pub async fn update_manufacturer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedForm(form): ValidatedForm<ManufacturerForm>,
) -> AppResult<Found> {
    state
        .services
        .manufacturers
        .update_manufacturer(id, form.into())
        .await?;
    Ok(Found::to(MANUFACTURERS_URL))
}

/// Delete a manufacturer and its cars
#[utoipa::path(
    post,
    path = "/manufacturers/{id}/delete",
    tag = "Manufacturers",
    security(("session_cookie" = [])),
    params(("id" = Uuid, Path, description = "Manufacturer ID")),
    responses(
        (status = 302, description = "Deleted, redirect to the list"),
        (status = 404, description = "Manufacturer not found")
    )
)]
pub async fn delete_manufacturer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Found> {
    state.services.manufacturers.delete_manufacturer(id).await?;
    Ok(Found::to(MANUFACTURERS_URL))
}
