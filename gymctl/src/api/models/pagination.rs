//! Shared pagination types for API query parameters.
//!
//! List endpoints use offset-based pagination with `skip` and `limit` parameters.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Default number of items to return per page.
pub const DEFAULT_LIMIT: usize = 10;

/// Maximum number of items that can be requested per page.
pub const MAX_LIMIT: usize = 100;

/// Standard pagination parameters for list endpoints.
///
/// The `limit` is clamped to between 1 and [`MAX_LIMIT`].
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct Pagination {
    /// Number of items to skip (default: 0)
    #[param(default = 0, minimum = 0)]
    pub skip: Option<usize>,

    /// Maximum number of items to return (default: 10, max: 100)
    #[param(default = 10, minimum = 1, maximum = 100)]
    pub limit: Option<usize>,
}

impl Pagination {
    #[inline]
    pub fn skip(&self) -> usize {
        self.skip.unwrap_or(0)
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

/// Paginated response wrapper for list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T: ToSchema> {
    /// The items for the current page
    pub data: Vec<T>,
    /// Total number of items before pagination
    pub total_count: usize,
    pub skip: usize,
    pub limit: usize,
}

impl<T: ToSchema> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total_count: usize, skip: usize, limit: usize) -> Self {
        Self {
            data,
            total_count,
            skip,
            limit,
        }
    }
}
