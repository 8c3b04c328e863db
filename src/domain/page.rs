//! Pagination primitives shared by the list operations

use serde::{Deserialize, Serialize};

/// Default number of rows per page
pub const DEFAULT_PER_PAGE: i64 = 10;

/// Upper bound for rows per page
pub const MAX_PER_PAGE: i64 = 100;

/// Sort direction for ordered queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order
    Asc,
    /// Descending order
    #[default]
    Desc,
}

/// Page selection for list queries
///
/// Callers may pass any page number; accessors normalize it so that page 0 or
/// a negative page behaves like the first page, and `per_page` stays within
/// `1..=MAX_PER_PAGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: i64,
    per_page: i64,
}

impl PageRequest {
    /// Create a page request
    pub fn new(page: i64, per_page: i64) -> Self {
        Self { page, per_page }
    }

    /// Set the page number (builder pattern)
    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    /// Set the rows per page (builder pattern)
    pub fn with_per_page(mut self, per_page: i64) -> Self {
        self.per_page = per_page;
        self
    }

    /// The page number as requested
    pub fn page(&self) -> i64 {
        self.page
    }

    /// The page number reported back to callers, never below 1
    pub fn current_page(&self) -> i64 {
        self.page.max(1)
    }

    /// Rows per page, clamped to `1..=MAX_PER_PAGE`
    pub fn per_page(&self) -> i64 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }

    /// Number of rows to skip: `max(page - 1, 0) * per_page`
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).max(0).saturating_mul(self.per_page())
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Paged result envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The rows of the requested page
    pub data: Vec<T>,
    /// Total number of rows matching the filter
    pub count: i64,
    /// The page these rows belong to
    pub current_page: i64,
    /// Rows per page used for the fetch
    pub per_page: i64,
    /// Total number of pages: `ceil(count / per_page)`
    pub total_pages: i64,
}

impl<T> Page<T> {
    /// Build the envelope from a fetched page and its total count
    pub fn new(data: Vec<T>, count: i64, request: &PageRequest) -> Self {
        let per_page = request.per_page();

        Self {
            data,
            count,
            current_page: request.current_page(),
            per_page,
            // count is a non-negative row count and per_page is clamped to 1..=MAX_PER_PAGE
            total_pages: (count + per_page - 1) / per_page,
        }
    }
}
