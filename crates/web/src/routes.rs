//! Route configuration.

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{
    auth_routes, car_routes, driver_routes, health_routes, index_routes, manufacturer_routes,
};
use crate::middleware::{require_login, session_middleware};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    // Fleet pages (login required)
    let fleet = Router::new()
        .merge(index_routes())
        .nest("/manufacturers", manufacturer_routes())
        .nest("/cars", car_routes())
        .nest("/drivers", driver_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_login));

    Router::new()
        .merge(fleet)
        .nest("/accounts", auth_routes())
        // Health check (no login)
        .nest("/health", health_routes())
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
