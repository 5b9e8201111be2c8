//! Products Data

use std::num::NonZeroU32;

use crate::domain::products::{errors::PaginationError, records::ProductId};

/// Page used when a caller does not ask for one.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when a caller does not ask for one.
pub const DEFAULT_LIMIT: u32 = 10;

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub available: Option<bool>,
}

/// Product Update Data
///
/// Only fields that are `Some` are written; the rest keep their stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub available: Option<bool>,
}

impl ProductUpdate {
    /// The change applied by a soft delete.
    #[must_use]
    pub fn deactivate() -> Self {
        Self {
            available: Some(false),
            ..Self::default()
        }
    }
}

/// Requested page of active products (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: NonZeroU32,
    limit: NonZeroU32,
}

impl Pagination {
    /// # Errors
    ///
    /// Returns an error when `page` or `limit` is zero.
    pub fn new(page: u32, limit: u32) -> Result<Self, PaginationError> {
        Ok(Self {
            page: NonZeroU32::new(page).ok_or(PaginationError::Page)?,
            limit: NonZeroU32::new(limit).ok_or(PaginationError::Limit)?,
        })
    }

    /// Build from optional request values, falling back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when a supplied value is zero.
    pub fn from_parts(page: Option<u32>, limit: Option<u32>) -> Result<Self, PaginationError> {
        Self::new(page.unwrap_or(DEFAULT_PAGE), limit.unwrap_or(DEFAULT_LIMIT))
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.get()
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit.get()
    }

    /// Offset/row-limit window over the active set.
    #[must_use]
    pub fn window(&self) -> Window {
        let limit = u64::from(self.limit.get());

        Window {
            offset: u64::from(self.page.get() - 1) * limit,
            limit,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: NonZeroU32::MIN,
            limit: NonZeroU32::new(DEFAULT_LIMIT).unwrap_or(NonZeroU32::MIN),
        }
    }
}

/// Skip/take window applied to a listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u64,
}

/// Row filter understood by the products repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Restrict to rows with this availability.
    pub available: Option<bool>,

    /// Restrict to rows whose id is in this list.
    pub ids: Option<Vec<ProductId>>,
}

impl ProductFilter {
    /// Active products only.
    #[must_use]
    pub fn active() -> Self {
        Self {
            available: Some(true),
            ids: None,
        }
    }

    /// Products with the given ids, whatever their availability.
    #[must_use]
    pub fn with_ids(ids: Vec<ProductId>) -> Self {
        Self {
            available: None,
            ids: Some(ids),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn default_pagination_is_first_page_of_ten() {
        let pagination = Pagination::default();

        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.limit(), 10);
        assert_eq!(
            pagination.window(),
            Window {
                offset: 0,
                limit: 10
            }
        );
    }

    #[test]
    fn window_skips_previous_pages() -> TestResult {
        let window = Pagination::new(3, 25)?.window();

        assert_eq!(window.offset, 50);
        assert_eq!(window.limit, 25);

        Ok(())
    }

    #[test]
    fn zero_values_are_rejected() {
        assert_eq!(Pagination::new(0, 10), Err(PaginationError::Page));
        assert_eq!(Pagination::new(1, 0), Err(PaginationError::Limit));
    }

    #[test]
    fn missing_parts_use_defaults() -> TestResult {
        assert_eq!(Pagination::from_parts(None, None)?, Pagination::default());
        assert_eq!(Pagination::from_parts(Some(2), None)?.limit(), DEFAULT_LIMIT);

        Ok(())
    }

    #[test]
    fn deactivate_only_touches_availability() {
        let update = ProductUpdate::deactivate();

        assert_eq!(update.available, Some(false));
        assert!(update.name.is_none());
        assert!(update.price.is_none());
    }
}
