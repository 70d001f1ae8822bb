//! Paginated list responses.

use serde::Serialize;
use utoipa::ToSchema;

use common::PaginationParams;
use domain::{Car, DriverResponse, Manufacturer};

/// Paginated response wrapper (reusable for all list responses)
#[derive(Debug, Serialize, ToSchema)]
#[aliases(
    PaginatedDrivers = Paginated<DriverResponse>,
    PaginatedManufacturers = Paginated<Manufacturer>,
    PaginatedCars = Paginated<Car>
)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
    pub is_paginated: bool,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, params: PaginationParams, total: u64) -> Self {
        let per_page = params.limit();
        let total_pages = total.div_ceil(per_page);

        Self {
            data,
            meta: PaginationMeta {
                page: params.page_index() + 1,
                per_page,
                total,
                total_pages,
                is_paginated: total_pages > 1,
            },
        }
    }

    /// Convert every item, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}
