//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Largest page size a client may request.
pub const MAX_LIMIT: u64 = 100;

/// Largest page number a client may request. Offsets stay within a Postgres
/// `bigint` at every allowed limit.
pub const MAX_PAGE: u64 = i64::MAX.unsigned_abs() / MAX_LIMIT;

/// Returns the row offset of a 1-indexed page.
#[must_use]
pub const fn page_offset(page: u64, limit: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(limit)
}

/// Returns whether rows remain beyond the given page.
#[must_use]
pub const fn has_more(total: u64, page: u64, limit: u64) -> bool {
    total > page.saturating_mul(limit)
}

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_limit")]
    pub limit: u64,
}

const fn default_page() -> u64 {
    1
}

const fn default_limit() -> u64 {
    10
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageRequest {
    /// Builds a request, rejecting out-of-range bounds.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if `page` is outside `1..=MAX_PAGE` or
    /// `limit` is outside `1..=100`.
    pub fn new(page: u64, limit: u64) -> Result<Self, AppError> {
        Self { page, limit }.validated()
    }

    /// Checks the bounds of a deserialized request.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if `page` is outside `1..=MAX_PAGE` or
    /// `limit` is outside `1..=100`.
    pub fn validated(self) -> Result<Self, AppError> {
        if self.page < 1 {
            return Err(AppError::Validation("page must be at least 1".into()));
        }
        if self.page > MAX_PAGE {
            return Err(AppError::Validation(format!(
                "page must not exceed {MAX_PAGE}"
            )));
        }
        if !(1..=MAX_LIMIT).contains(&self.limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        Ok(self)
    }

    /// Calculates the offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        page_offset(self.page, self.limit)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }
}

/// One page of rows plus the counters of the list envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Rows matching the filter across all pages.
    pub total: u64,
    /// Current page number.
    pub page: u64,
    /// Items per page.
    pub limit: u64,
    /// Whether another page follows.
    pub has_more: bool,
    /// The items in the current page.
    #[serde(skip)]
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Creates a page for `request` out of `total` rows.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            total,
            page: request.page,
            limit: request.limit,
            has_more: has_more(total, request.page, request.limit),
            items,
        }
    }

    /// Replaces the items, keeping the counters.
    #[must_use]
    pub fn with_items<U>(self, items: Vec<U>) -> Page<U> {
        Page {
            total: self.total,
            page: self.page,
            limit: self.limit,
            has_more: self.has_more,
            items,
        }
    }

    /// Maps every item, keeping the counters.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        let Self {
            total,
            page,
            limit,
            has_more,
            items,
        } = self;
        Page {
            total,
            page,
            limit,
            has_more,
            items: items.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
