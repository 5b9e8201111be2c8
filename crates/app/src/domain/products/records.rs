//! Product Records

use crate::{domain::products::data::Pagination, ids::TypedId};

/// Product ID
pub type ProductId = TypedId<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    /// System-assigned identifier.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Unit price.
    pub price: f64,

    /// `false` once the product has been removed.
    pub available: bool,
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

/// One window of results plus the metadata describing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// Build a page, deriving the page count from `total` and the page size.
    #[must_use]
    pub fn new(data: Vec<T>, pagination: Pagination, total: u64) -> Self {
        let limit = pagination.limit();

        Self {
            data,
            meta: PageMeta {
                page: pagination.page(),
                limit,
                total,
                pages: total.div_ceil(u64::from(limit)),
            },
        }
    }

    /// Map the page contents while keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn pages_rounds_up_partial_pages() -> TestResult {
        let page = Page::new(vec![1, 2], Pagination::new(2, 3)?, 5);

        assert_eq!(
            page.meta,
            PageMeta {
                page: 2,
                limit: 3,
                total: 5,
                pages: 2
            }
        );

        Ok(())
    }

    #[test]
    fn empty_store_has_zero_pages() {
        let page: Page<u8> = Page::new(vec![], Pagination::default(), 0);

        assert_eq!(page.meta.pages, 0);
        assert_eq!(page.meta.page, 1);
        assert_eq!(page.meta.limit, 10);
    }

    #[test]
    fn exact_multiple_does_not_add_a_page() -> TestResult {
        let page: Page<u8> = Page::new(vec![], Pagination::new(1, 5)?, 10);

        assert_eq!(page.meta.pages, 2);

        Ok(())
    }
}
