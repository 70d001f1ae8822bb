//! Dashboard.

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;
use utoipa::ToSchema;

use common::AppResult;

use crate::session::Session;
use crate::state::AppState;

/// Fleet totals and the caller's visit count
#[derive(Debug, Serialize, ToSchema)]
pub struct Dashboard {
    pub num_drivers: u64,
    pub num_cars: u64,
    pub num_manufacturers: u64,
    /// Dashboard loads in this session, including this one
    pub num_visits: u64,
}

pub fn index_routes() -> Router<AppState> {
    Router::new().route("/", get(index))
}

/// Dashboard with fleet counts; counts a visit
#[utoipa::path(
    get,
    path = "/",
    tag = "Dashboard",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Fleet totals", body = Dashboard),
        (status = 302, description = "Not logged in, redirect to login")
    )
)]
pub async fn index(State(state): State<AppState>, session: Session) -> AppResult<Json<Dashboard>> {
    let services = &state.services;
    let (num_drivers, num_cars, num_manufacturers) = futures::try_join!(
        services.drivers.count_drivers(),
        services.cars.count_cars(),
        services.manufacturers.count_manufacturers(),
    )?;

    let num_visits = session.record_visit().await;

    Ok(Json(Dashboard {
        num_drivers,
        num_cars,
        num_manufacturers,
        num_visits,
    }))
}
