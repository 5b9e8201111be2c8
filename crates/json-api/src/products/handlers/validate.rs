//! Validate Products Handler

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use catalog_app::domain::products::records::ProductId;

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse},
};

/// Validate Products Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ValidateProductsRequest {
    /// Product ids to check; duplicates are collapsed
    pub ids: Vec<i64>,
}

/// Validate Products Handler
///
/// Confirms that every id refers to a stored product, whether or not it is
/// still available.
#[endpoint(
    tags("products"),
    summary = "Validate Products",
    responses(
        (status_code = StatusCode::OK, description = "All products exist"),
        (status_code = StatusCode::BAD_REQUEST, description = "Some products were not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ValidateProductsRequest>,
    depot: &mut Depot,
) -> Result<Json<Vec<ProductResponse>>, StatusError> {
    let state = depot.state_or_500()?;

    let ids = json
        .into_inner()
        .ids
        .into_iter()
        .map(ProductId::from_i64)
        .collect();

    let products = state
        .products
        .validate_products(ids)
        .await
        .map_err(into_status_error)?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}
