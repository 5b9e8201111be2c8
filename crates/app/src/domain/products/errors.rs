//! Products service errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::products::records::ProductId;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("Product with ID {0} not found")]
    NotFound(ProductId),

    #[error("Some products were not found")]
    SomeProductsNotFound,

    #[error("storage error")]
    Sql(#[from] Error),
}

/// Rejected pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("page must be a positive integer")]
    Page,

    #[error("limit must be a positive integer")]
    Limit,
}
