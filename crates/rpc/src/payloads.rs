//! Typed `data` payloads for each command.

use serde::{Deserialize, Serialize};

use catalog_app::domain::products::{
    data::{NewProduct, ProductUpdate},
    records::{Page, ProductId, ProductRecord},
};

#[derive(Debug, Deserialize)]
pub(crate) struct CreateProductPayload {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub available: Option<bool>,
}

impl From<CreateProductPayload> for NewProduct {
    fn from(payload: CreateProductPayload) -> Self {
        NewProduct {
            name: payload.name,
            price: payload.price,
            available: payload.available,
        }
    }
}

/// `page` and `limit` are signed so that negative values reach validation
/// instead of failing as a type mismatch.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PaginationPayload {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductIdPayload {
    pub id: i64,
}

impl ProductIdPayload {
    pub(crate) fn product_id(&self) -> ProductId {
        ProductId::from_i64(self.id)
    }
}

/// The `id` selects the row and never becomes part of the changes.
#[derive(Debug, Deserialize)]
pub(crate) struct UpdateProductPayload {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub available: Option<bool>,
}

impl UpdateProductPayload {
    pub(crate) fn into_parts(self) -> (ProductId, ProductUpdate) {
        (
            ProductId::from_i64(self.id),
            ProductUpdate {
                name: self.name,
                price: self.price,
                available: self.available,
            },
        )
    }
}

/// Accepts either `{ "ids": [..] }` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ValidateProductsPayload {
    Wrapped { ids: Vec<i64> },
    Bare(Vec<i64>),
}

impl ValidateProductsPayload {
    pub(crate) fn into_ids(self) -> Vec<ProductId> {
        let (Self::Wrapped { ids } | Self::Bare(ids)) = self;

        ids.into_iter().map(ProductId::from_i64).collect()
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct ProductPayload {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub available: bool,
}

impl From<ProductRecord> for ProductPayload {
    fn from(product: ProductRecord) -> Self {
        ProductPayload {
            id: product.id.into_i64(),
            name: product.name,
            price: product.price,
            available: product.available,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct PageMetaPayload {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct ProductsPagePayload {
    pub data: Vec<ProductPayload>,
    pub meta: PageMetaPayload,
}

impl From<Page<ProductRecord>> for ProductsPagePayload {
    fn from(page: Page<ProductRecord>) -> Self {
        let page = page.map(ProductPayload::from);

        ProductsPagePayload {
            data: page.data,
            meta: PageMetaPayload {
                page: page.meta.page,
                limit: page.meta.limit,
                total: page.meta.total,
                pages: page.meta.pages,
            },
        }
    }
}
