//! HTTP handlers.

pub mod auth_handler;
pub mod car_handler;
pub mod driver_handler;
pub mod health_handler;
pub mod index_handler;
pub mod manufacturer_handler;

pub use auth_handler::auth_routes;
pub use car_handler::car_routes;
pub use driver_handler::driver_routes;
pub use health_handler::health_routes;
pub use index_handler::index_routes;
pub use manufacturer_handler::manufacturer_routes;
