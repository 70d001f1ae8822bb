//! Repository layer for data access.

mod car_repository;
mod driver_repository;
pub mod entities;
mod manufacturer_repository;

use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::ColumnTrait;

pub use car_repository::{CarRepository, CarStore};
pub use driver_repository::{DriverRepository, DriverStore};
pub use manufacturer_repository::{ManufacturerRepository, ManufacturerStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use car_repository::MockCarRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use driver_repository::MockDriverRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use manufacturer_repository::MockManufacturerRepository;

/// Escape character for LIKE patterns
const LIKE_ESCAPE: char = '\\';

/// Case-insensitive substring match on a text column. `%` and `_` in the
/// needle match literally.
pub(crate) fn icontains<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
