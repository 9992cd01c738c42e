//! Validated 1-based page requests.

use thiserror::Error;

/// Page served when the caller does not ask for one.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size served when the caller does not ask for one.
pub const DEFAULT_PER_PAGE: u32 = 10;
/// Largest page size the upstream service accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// Errors raised when a page request falls outside the accepted bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Pages are 1-based.
    #[error("page must be at least 1, got {page}")]
    PageOutOfRange {
        /// Rejected page number.
        page: u32,
    },
    /// Page size must lie within `1..=MAX_PER_PAGE`.
    #[error("perPage must be between 1 and {max}, got {per_page}")]
    PerPageOutOfRange {
        /// Rejected page size.
        per_page: u32,
        /// Largest accepted page size.
        max: u32,
    },
}

/// A 1-based page number paired with a bounded page size.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= per_page <= MAX_PER_PAGE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Validate and build a page request.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `page` is zero or `per_page` is
    /// outside `1..=MAX_PER_PAGE`.
    ///
    /// # Example
    ///
    /// ```
    /// use pagination::{PageRequest, PageRequestError};
    ///
    /// assert!(PageRequest::new(1, 10).is_ok());
    /// assert_eq!(
    ///     PageRequest::new(0, 10),
    ///     Err(PageRequestError::PageOutOfRange { page: 0 })
    /// );
    /// ```
    pub const fn new(page: u32, per_page: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange { page });
        }
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(PageRequestError::PerPageOutOfRange {
                per_page,
                max: MAX_PER_PAGE,
            });
        }
        Ok(Self { page, per_page })
    }

    /// Build a request from optional query values, applying the defaults.
    ///
    /// # Errors
    ///
    /// Propagates the bounds checks of [`PageRequest::new`].
    pub fn from_optional(
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<Self, PageRequestError> {
        Self::new(
            page.unwrap_or(DEFAULT_PAGE),
            per_page.unwrap_or(DEFAULT_PER_PAGE),
        )
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// The number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Zero-based index of the first item on this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }

    /// Number of pages needed to hold `total` items.
    ///
    /// An empty result set has zero pages.
    #[must_use]
    pub const fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.per_page as u64)
    }

    /// Number of items this page holds out of `total`.
    ///
    /// Pages past the end hold nothing.
    #[must_use]
    pub const fn len_within(&self, total: u64) -> u64 {
        let remaining = total.saturating_sub(self.offset());
        if remaining < self.per_page as u64 {
            remaining
        } else {
            self.per_page as u64
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}
