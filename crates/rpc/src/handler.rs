//! Routes decoded requests to the products service.

use std::{str::FromStr, sync::Arc};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

use catalog_app::domain::products::{ProductsService, data::Pagination};

use crate::{
    message::{RpcError, RpcReply, RpcRequest},
    payloads::{
        CreateProductPayload, PaginationPayload, ProductIdPayload, ProductPayload,
        ProductsPagePayload, UpdateProductPayload, ValidateProductsPayload,
    },
};

/// Commands understood by the server, keyed by `pattern.cmd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CreateProduct,
    FindAllProducts,
    FindOneProduct,
    UpdateProduct,
    RemoveProduct,
    ValidateProducts,
}

impl FromStr for Command {
    type Err = RpcError;

    fn from_str(cmd: &str) -> Result<Self, Self::Err> {
        match cmd {
            "create_product" => Ok(Self::CreateProduct),
            "find_all_products" => Ok(Self::FindAllProducts),
            "find_one_product" => Ok(Self::FindOneProduct),
            "update_product" => Ok(Self::UpdateProduct),
            "remove_product" => Ok(Self::RemoveProduct),
            "validate_products" => Ok(Self::ValidateProducts),
            other => Err(RpcError::bad_request(format!(
                "There is no matching message handler defined for \"{other}\""
            ))),
        }
    }
}

#[derive(Clone)]
pub struct RpcHandler {
    products: Arc<dyn ProductsService>,
}

impl std::fmt::Debug for RpcHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcHandler").finish_non_exhaustive()
    }
}

impl RpcHandler {
    pub fn new(products: Arc<dyn ProductsService>) -> Self {
        Self { products }
    }

    /// Decode one frame and produce its reply.
    ///
    /// A frame that is not a valid request is answered with a null `id`.
    pub async fn handle_frame(&self, frame: &str) -> RpcReply {
        match serde_json::from_str::<RpcRequest>(frame) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                warn!(error = %e, "malformed rpc frame");

                RpcReply::err(Value::Null, RpcError::bad_request(format!("malformed frame: {e}")))
            }
        }
    }

    #[tracing::instrument(
        name = "rpc.request",
        skip(self, request),
        fields(cmd = %request.pattern.cmd, id = %request.id)
    )]
    pub async fn handle(&self, request: RpcRequest) -> RpcReply {
        let RpcRequest { id, pattern, data } = request;

        match self.dispatch(&pattern.cmd, data).await {
            Ok(response) => RpcReply::ok(id, response),
            Err(err) => {
                if err.status < RpcError::INTERNAL_SERVER_ERROR {
                    warn!(status = err.status, message = %err.message, "rpc request rejected");
                }

                RpcReply::err(id, err)
            }
        }
    }

    async fn dispatch(&self, cmd: &str, data: Value) -> Result<Value, RpcError> {
        match cmd.parse::<Command>()? {
            Command::CreateProduct => {
                let payload: CreateProductPayload = decode(data)?;
                let product = self.products.create_product(payload.into()).await?;

                encode(ProductPayload::from(product))
            }
            Command::FindAllProducts => {
                let payload: PaginationPayload = if data.is_null() {
                    PaginationPayload::default()
                } else {
                    decode(data)?
                };

                let page = self.products.list_products(pagination(payload)?).await?;

                encode(ProductsPagePayload::from(page))
            }
            Command::FindOneProduct => {
                let payload: ProductIdPayload = decode(data)?;
                let product = self.products.get_product(payload.product_id()).await?;

                encode(ProductPayload::from(product))
            }
            Command::UpdateProduct => {
                let (id, update) = decode::<UpdateProductPayload>(data)?.into_parts();
                let product = self.products.update_product(id, update).await?;

                encode(ProductPayload::from(product))
            }
            Command::RemoveProduct => {
                let payload: ProductIdPayload = decode(data)?;
                let product = self.products.remove_product(payload.product_id()).await?;

                encode(ProductPayload::from(product))
            }
            Command::ValidateProducts => {
                let ids = decode::<ValidateProductsPayload>(data)?.into_ids();
                let products = self.products.validate_products(ids).await?;

                encode(
                    products
                        .into_iter()
                        .map(ProductPayload::from)
                        .collect::<Vec<_>>(),
                )
            }
        }
    }
}

fn decode<T: DeserializeOwned>(data: Value) -> Result<T, RpcError> {
    serde_json::from_value(data).map_err(|e| RpcError::bad_request(format!("invalid payload: {e}")))
}

fn encode<T: Serialize>(value: T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| {
        tracing::error!(error = %e, "failed to encode rpc response");

        RpcError::internal()
    })
}

fn pagination(payload: PaginationPayload) -> Result<Pagination, RpcError> {
    let page = payload
        .page
        .map(u32::try_from)
        .transpose()
        .map_err(|e| RpcError::bad_request(format!("invalid page: {e}")))?;

    let limit = payload
        .limit
        .map(u32::try_from)
        .transpose()
        .map_err(|e| RpcError::bad_request(format!("invalid limit: {e}")))?;

    Pagination::from_parts(page, limit)
        .map_err(|e| RpcError::bad_request(format!("invalid pagination: {e}")))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use catalog_app::domain::products::{
        MockProductsService, ProductsServiceError,
        data::{NewProduct, ProductUpdate},
        records::{Page, ProductId, ProductRecord},
    };

    use super::*;

    fn record(id: i64) -> ProductRecord {
        ProductRecord {
            id: ProductId::from_i64(id),
            name: format!("Product {id}"),
            price: 10.0,
            available: true,
        }
    }

    fn handler(products: MockProductsService) -> RpcHandler {
        RpcHandler::new(Arc::new(products))
    }

    fn request(cmd: &str, data: Value) -> RpcRequest {
        RpcRequest {
            id: json!("req-1"),
            pattern: crate::message::Pattern {
                cmd: cmd.to_string(),
            },
            data,
        }
    }

    #[tokio::test]
    async fn create_product_returns_the_stored_row() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_create_product()
            .once()
            .withf(|new| {
                *new == NewProduct {
                    name: "Lamp".to_string(),
                    price: 10.0,
                    available: None,
                }
            })
            .return_once(|_| Ok(record(1)));

        let reply = handler(products)
            .handle(request("create_product", json!({ "name": "Lamp", "price": 10.0 })))
            .await;

        assert_eq!(
            serde_json::to_value(reply)?,
            json!({
                "id": "req-1",
                "response": { "id": 1, "name": "Product 1", "price": 10.0, "available": true }
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn find_all_without_data_uses_default_pagination() -> TestResult {
        let mut products = MockProductsService::new();

        products
            .expect_list_products()
            .once()
            .withf(|pagination| *pagination == Pagination::default())
            .return_once(|pagination| Ok(Page::new(vec![record(1)], pagination, 1)));

        let reply = handler(products)
            .handle(request("find_all_products", Value::Null))
            .await;

        let reply = serde_json::to_value(reply)?;

        assert_eq!(
            reply.pointer("/response/meta"),
            Some(&json!({ "page": 1, "limit": 10, "total": 1, "pages": 1 }))
        );

        Ok(())
    }

    #[tokio::test]
    async fn find_all_rejects_non_positive_values() {
        let mut products = MockProductsService::new();

        products.expect_list_products().never();

        let rpc = handler(products);

        for data in [json!({ "page": 0 }), json!({ "limit": -5 })] {
            let reply = rpc.handle(request("find_all_products", data)).await;

            assert!(
                matches!(reply, RpcReply::Error { ref err, .. } if err.status == 400),
                "expected bad request, got {reply:?}"
            );
        }
    }

    #[tokio::test]
    async fn find_one_missing_product_is_a_404() {
        let mut products = MockProductsService::new();

        products
            .expect_get_product()
            .once()
            .withf(|id| *id == ProductId::from_i64(5))
            .return_once(|id| Err(ProductsServiceError::NotFound(id)));

        let reply = handler(products)
            .handle(request("find_one_product", json!({ "id": 5 })))
            .await;

        assert_eq!(
            reply,
            RpcReply::err(
                json!("req-1"),
                RpcError {
                    message: "Product with ID 5 not found".to_string(),
                    status: 404,
                }
            )
        );
    }

    #[tokio::test]
    async fn update_product_excludes_the_id_from_changes() {
        let mut products = MockProductsService::new();

        products
            .expect_update_product()
            .once()
            .withf(|id, update| {
                *id == ProductId::from_i64(3)
                    && *update
                        == ProductUpdate {
                            name: Some("Desk".to_string()),
                            ..ProductUpdate::default()
                        }
            })
            .return_once(|_, _| Ok(record(3)));

        let reply = handler(products)
            .handle(request("update_product", json!({ "id": 3, "name": "Desk" })))
            .await;

        assert!(matches!(reply, RpcReply::Response { .. }), "got {reply:?}");
    }

    #[tokio::test]
    async fn remove_product_returns_the_deactivated_row() -> TestResult {
        let mut products = MockProductsService::new();

        products.expect_remove_product().once().return_once(|_| {
            let mut product = record(2);
            product.available = false;
            Ok(product)
        });

        let reply = handler(products)
            .handle(request("remove_product", json!({ "id": 2 })))
            .await;

        let reply = serde_json::to_value(reply)?;

        assert_eq!(reply.pointer("/response/available"), Some(&json!(false)));

        Ok(())
    }

    #[tokio::test]
    async fn validate_accepts_a_bare_array() {
        let mut products = MockProductsService::new();

        products
            .expect_validate_products()
            .once()
            .withf(|ids| *ids == vec![ProductId::from_i64(1), ProductId::from_i64(1)])
            .return_once(|_| Ok(vec![record(1)]));

        let reply = handler(products)
            .handle(request("validate_products", json!([1, 1])))
            .await;

        assert!(matches!(reply, RpcReply::Response { .. }), "got {reply:?}");
    }

    #[tokio::test]
    async fn validate_missing_products_is_a_400() {
        let mut products = MockProductsService::new();

        products
            .expect_validate_products()
            .once()
            .return_once(|_| Err(ProductsServiceError::SomeProductsNotFound));

        let reply = handler(products)
            .handle(request("validate_products", json!({ "ids": [1, 99] })))
            .await;

        assert_eq!(
            reply,
            RpcReply::err(
                json!("req-1"),
                RpcError::bad_request("Some products were not found")
            )
        );
    }

    #[tokio::test]
    async fn unknown_pattern_is_a_400() {
        let reply = handler(MockProductsService::new())
            .handle(request("drop_table", Value::Null))
            .await;

        assert!(
            matches!(reply, RpcReply::Error { ref err, .. } if err.status == 400),
            "got {reply:?}"
        );
    }

    #[tokio::test]
    async fn invalid_payload_is_a_400() {
        let mut products = MockProductsService::new();

        products.expect_get_product().never();

        let reply = handler(products)
            .handle(request("find_one_product", json!({ "id": "seven" })))
            .await;

        assert!(
            matches!(reply, RpcReply::Error { ref err, .. } if err.status == 400),
            "got {reply:?}"
        );
    }

    #[tokio::test]
    async fn malformed_frame_is_answered_with_null_id() {
        let reply = handler(MockProductsService::new())
            .handle_frame("{not json")
            .await;

        assert_eq!(reply.id(), &Value::Null);
        assert!(
            matches!(reply, RpcReply::Error { ref err, .. } if err.status == 400),
            "got {reply:?}"
        );
    }
}
