//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Pagination query parameters, reusable across all list endpoints.
#[derive(Debug, Clone, Deserialize)]
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
    /// Calculate offset for database query
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)) * self.limit()
    }

    /// Get limit capped at maximum
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

/// Pagination metadata flattened into list responses, matching the
/// `{..., total, pages, current_page, per_page}` contract.
#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
    pub per_page: u64,
}

impl PageMeta {
    /// Derive metadata from the request parameters and the total count.
    pub fn new(params: &PaginationParams, total: u64) -> Self {
        let per_page = params.limit();
        Self {
            total,
            pages: total.div_ceil(per_page),
            current_page: params.page.max(1),
            per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_based() {
        let params = PaginationParams {
            page: 3,
            per_page: 10,
        };
        assert_eq!(params.offset(), 20);
    }

    #[test]
    fn per_page_is_capped() {
        let params = PaginationParams {
            page: 1,
            per_page: 10_000,
        };
        assert_eq!(params.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn page_count_rounds_up() {
        let params = PaginationParams {
            page: 1,
            per_page: 10,
        };
        let meta = PageMeta::new(&params, 21);
        assert_eq!(meta.pages, 3);
    }
}
