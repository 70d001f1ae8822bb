//! Pagination parameters shared by list queries.

use serde::Deserialize;

/// First page number
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

/// Items per list page
pub const DEFAULT_PAGE_SIZE: u64 = 5;

/// Upper bound on a client-requested page size
pub const MAX_PAGE_SIZE: u64 = 100;

/// Pagination query parameters (reusable across all list endpoints)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl PaginationParams {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Zero-based page index for the database paginator
    pub fn page_index(&self) -> u64 {
        self.page.max(1) - 1
    }

    /// Page size clamped to `1..=MAX_PAGE_SIZE`
    pub fn limit(&self) -> u64 {
        self.per_page.clamp(1, MAX_PAGE_SIZE)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}
