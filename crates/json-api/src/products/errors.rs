//! Product Errors

use salvo::http::StatusError;
use tracing::error;

use catalog_app::domain::products::ProductsServiceError;

pub(crate) fn into_status_error(error: ProductsServiceError) -> StatusError {
    match error {
        ProductsServiceError::NotFound(_) => StatusError::not_found().brief(error.to_string()),
        ProductsServiceError::SomeProductsNotFound => {
            StatusError::bad_request().brief(error.to_string())
        }
        ProductsServiceError::Sql(source) => {
            error!("product storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}
