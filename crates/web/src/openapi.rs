//! OpenAPI documentation.

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

use crate::handlers::auth_handler::{LoginForm, LoginInfo};
use crate::handlers::car_handler::CarForm;
use crate::handlers::driver_handler::{DriverCreationForm, DriverDetail, DriverLicenseUpdateForm};
use crate::handlers::health_handler::{HealthResponse, ServiceHealth, ServiceStatus};
use crate::handlers::index_handler::Dashboard;
use crate::handlers::manufacturer_handler::ManufacturerForm;
use crate::types::{PaginatedCars, PaginatedDrivers, PaginatedManufacturers, PaginationMeta};
use domain::{Car, CarDetails, DriverResponse, Manufacturer};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::index_handler::index,
        crate::handlers::auth_handler::login_page,
        crate::handlers::auth_handler::login,
        crate::handlers::auth_handler::logout,
        crate::handlers::manufacturer_handler::list_manufacturers,
        crate::handlers::manufacturer_handler::create_manufacturer,
        crate::handlers::manufacturer_handler::update_manufacturer,
        crate::handlers::manufacturer_handler::delete_manufacturer,
        crate::handlers::car_handler::list_cars,
        crate::handlers::car_handler::create_car,
        crate::handlers::car_handler::get_car,
        crate::handlers::car_handler::update_car,
        crate::handlers::car_handler::delete_car,
        crate::handlers::car_handler::toggle_assign,
        crate::handlers::driver_handler::list_drivers,
        crate::handlers::driver_handler::create_driver,
        crate::handlers::driver_handler::get_driver,
        crate::handlers::driver_handler::update_license,
        crate::handlers::driver_handler::delete_driver,
        crate::handlers::health_handler::health_check,
    ),
    components(
        schemas(
            Dashboard,
            LoginForm,
            LoginInfo,
            ManufacturerForm,
            CarForm,
            DriverCreationForm,
            DriverLicenseUpdateForm,
            DriverDetail,
            DriverResponse,
            Manufacturer,
            Car,
            CarDetails,
            PaginationMeta,
            PaginatedDrivers,
            PaginatedManufacturers,
            PaginatedCars,
            HealthResponse,
            ServiceStatus,
            ServiceHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Dashboard", description = "Fleet overview"),
        (name = "Accounts", description = "Session login and logout"),
        (name = "Manufacturers", description = "Manufacturer management"),
        (name = "Cars", description = "Car management and driver assignment"),
        (name = "Drivers", description = "Driver management"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("sessionid"))),
            );
        }
    }
}
