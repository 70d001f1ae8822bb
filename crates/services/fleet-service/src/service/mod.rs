//! Fleet use cases.

mod auth_service;
mod car_service;
mod driver_service;
mod manufacturer_service;

pub use auth_service::{AuthService, Authenticator};
pub use car_service::{CarManager, CarService};
pub use driver_service::{DriverManager, DriverService};
pub use manufacturer_service::{ManufacturerManager, ManufacturerService};

use common::{AppError, AppResult, FieldErrors};

/// Trimmed search term, `None` when blank.
pub(crate) fn normalize_search(search: Option<String>) -> Option<String> {
    search
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty())
}

/// Record an error on `field` when `value` is longer than `max` characters.
pub(crate) fn check_length(errors: &mut FieldErrors, field: &str, value: &str, max: usize) {
    let length = value.chars().count();
    if length > max {
        errors.entry(field.to_string()).or_default().push(format!(
            "Ensure this value has at most {} characters (it has {}).",
            max, length
        ));
    }
}

/// Run CPU-bound work (password hashing) off the async workers.
pub(crate) async fn blocking<F, T>(work: F) -> AppResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::internal(format!("Blocking task failed: {}", e)))
}
