//! Product Index Handler

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use catalog_app::domain::products::records::{Page, PageMeta, ProductRecord};

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse},
};

/// Pagination metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PageMetaResponse {
    /// Requested page (1-indexed)
    pub page: u32,

    /// Requested page size
    pub limit: u32,

    /// Number of active products
    pub total: u64,

    /// Number of pages at this page size
    pub pages: u64,
}

impl From<PageMeta> for PageMetaResponse {
    fn from(meta: PageMeta) -> Self {
        PageMetaResponse {
            page: meta.page,
            limit: meta.limit,
            total: meta.total,
            pages: meta.pages,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The requested window of active products
    pub data: Vec<ProductResponse>,

    /// Pagination metadata
    pub meta: PageMetaResponse,
}

impl From<Page<ProductRecord>> for ProductsResponse {
    fn from(page: Page<ProductRecord>) -> Self {
        let page = page.map(ProductResponse::from);

        ProductsResponse {
            data: page.data,
            meta: page.meta.into(),
        }
    }
}

/// Product Index Handler
///
/// Returns one page of active products.
#[endpoint(
    tags("products"),
    summary = "List Products",
    responses(
        (status_code = StatusCode::OK, description = "Page of active products"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid pagination"),
    ),
)]
pub(crate) async fn handler(
    page: QueryParam<i64, false>,
    limit: QueryParam<i64, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let pagination = (page, limit).into_pagination()?;

    let products = state
        .products
        .list_products(pagination)
        .await
        .map_err(into_status_error)?;

    Ok(Json(products.into()))
}
