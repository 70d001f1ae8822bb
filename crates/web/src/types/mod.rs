//! Shared response types.

mod pagination;
mod response;

pub use pagination::{
    Paginated, PaginatedCars, PaginatedDrivers, PaginatedManufacturers, PaginationMeta,
};
pub use response::Found;
