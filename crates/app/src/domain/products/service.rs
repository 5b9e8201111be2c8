//! Products service.

use std::collections::BTreeSet;

use async_trait::async_trait;
use mockall::automock;
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::products::{
        data::{NewProduct, Pagination, ProductFilter, ProductUpdate},
        errors::ProductsServiceError,
        records::{Page, ProductId, ProductRecord},
        repository::{ProductsRepository, SqliteProductsRepository},
    },
};

/// Products service backed by a [`ProductsRepository`].
#[derive(Debug, Clone)]
pub struct StoreProductsService<R = SqliteProductsRepository> {
    repository: R,
}

impl StoreProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self::with_repository(SqliteProductsRepository::new(db))
    }
}

impl<R> StoreProductsService<R>
where
    R: ProductsRepository,
{
    #[must_use]
    pub fn with_repository(repository: R) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> ProductsService for StoreProductsService<R>
where
    R: ProductsRepository,
{
    #[tracing::instrument(
        name = "products.service.create_product",
        skip(self, product),
        fields(product_id = tracing::field::Empty),
        err
    )]
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError> {
        let created = self.repository.create(product).await?;

        Span::current().record("product_id", tracing::field::display(created.id));

        info!(product_id = %created.id, "created product");

        Ok(created)
    }

    async fn list_products(
        &self,
        pagination: Pagination,
    ) -> Result<Page<ProductRecord>, ProductsServiceError> {
        let total = self.repository.count(ProductFilter::active()).await?;

        let products = self
            .repository
            .find_many(ProductFilter::active(), Some(pagination.window()))
            .await?;

        Ok(Page::new(products, pagination, total))
    }

    async fn get_product(&self, product: ProductId) -> Result<ProductRecord, ProductsServiceError> {
        self.repository
            .find_unique(product, true)
            .await?
            .ok_or(ProductsServiceError::NotFound(product))
    }

    #[tracing::instrument(
        name = "products.service.update_product",
        skip(self, update),
        fields(product_id = %product),
        err
    )]
    async fn update_product(
        &self,
        product: ProductId,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError> {
        self.get_product(product).await?;

        let updated = self.repository.update(product, update).await?;

        info!(product_id = %product, "updated product");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "products.service.remove_product",
        skip(self),
        fields(product_id = %product),
        err
    )]
    async fn remove_product(
        &self,
        product: ProductId,
    ) -> Result<ProductRecord, ProductsServiceError> {
        self.get_product(product).await?;

        let removed = self
            .repository
            .update(product, ProductUpdate::deactivate())
            .await?;

        info!(product_id = %product, "removed product");

        Ok(removed)
    }

    #[tracing::instrument(
        name = "products.service.validate_products",
        skip(self, products),
        fields(requested = products.len(), unique = tracing::field::Empty),
        err
    )]
    async fn validate_products(
        &self,
        products: Vec<ProductId>,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError> {
        let unique: Vec<ProductId> = products
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Span::current().record("unique", unique.len());

        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let expected = unique.len();

        let found = self
            .repository
            .find_many(ProductFilter::with_ids(unique), None)
            .await?;

        if found.len() < expected {
            return Err(ProductsServiceError::SomeProductsNotFound);
        }

        Ok(found)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Creates a new product.
    async fn create_product(
        &self,
        product: NewProduct,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Retrieves one page of active products.
    async fn list_products(
        &self,
        pagination: Pagination,
    ) -> Result<Page<ProductRecord>, ProductsServiceError>;

    /// Retrieve a single active product.
    async fn get_product(&self, product: ProductId) -> Result<ProductRecord, ProductsServiceError>;

    /// Updates the supplied fields of an active product.
    async fn update_product(
        &self,
        product: ProductId,
        update: ProductUpdate,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Soft deletes an active product.
    async fn remove_product(
        &self,
        product: ProductId,
    ) -> Result<ProductRecord, ProductsServiceError>;

    /// Checks that every id exists, active or not.
    async fn validate_products(
        &self,
        products: Vec<ProductId>,
    ) -> Result<Vec<ProductRecord>, ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::products::repository::MockProductsRepository,
        test::{TestContext, helpers::create_product},
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

    #[tokio::test]
    async fn create_product_assigns_id_and_defaults_available() -> TestResult {
        let ctx = TestContext::new().await?;

        let product = ctx
            .products
            .create_product(NewProduct {
                name: "Keyboard".to_string(),
                price: 49.99,
                available: None,
            })
            .await?;

        assert!(product.id.into_i64() > 0);
        assert_eq!(product.name, "Keyboard");
        assert!(product.available);

        Ok(())
    }

    #[tokio::test]
    async fn get_product_returns_active_product() -> TestResult {
        let ctx = TestContext::new().await?;
        let created = create_product(&ctx, "Mouse", 25.0).await?;

        let product = ctx.products.get_product(created.id).await?;

        assert_eq!(product, created);

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_id_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await?;
        let id = ProductId::from_i64(12_345);

        let result = ctx.products.get_product(id).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound(missing)) if missing == id),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_products_on_empty_store() -> TestResult {
        let ctx = TestContext::new().await?;

        let page = ctx.products.list_products(Pagination::new(1, 10)?).await?;

        assert!(page.data.is_empty());
        assert_eq!(page.meta.page, 1);
        assert_eq!(page.meta.limit, 10);
        assert_eq!(page.meta.total, 0);
        assert_eq!(page.meta.pages, 0);

        Ok(())
    }

    #[tokio::test]
    async fn list_products_windows_active_products() -> TestResult {
        let ctx = TestContext::new().await?;

        let mut created = Vec::new();

        for index in 0..7 {
            created.push(create_product(&ctx, &format!("Item {index}"), 1.0).await?);
        }

        let removed = created.remove(0);

        ctx.products.remove_product(removed.id).await?;

        let page = ctx.products.list_products(Pagination::new(2, 4)?).await?;

        assert_eq!(page.meta.total, 6);
        assert_eq!(page.meta.pages, 2);
        assert!(page.data.len() <= 4);
        assert_eq!(page.data, created.get(4..).unwrap_or_default().to_vec());

        Ok(())
    }

    #[tokio::test]
    async fn update_product_changes_only_supplied_fields() -> TestResult {
        let ctx = TestContext::new().await?;
        let created = create_product(&ctx, "Cable", 5.0).await?;

        let updated = ctx
            .products
            .update_product(
                created.id,
                ProductUpdate {
                    price: Some(9.99),
                    ..ProductUpdate::default()
                },
            )
            .await?;

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Cable");
        assert!(updated.available);
        assert!((updated.price - 9.99).abs() < f64::EPSILON);

        Ok(())
    }

    #[tokio::test]
    async fn update_product_unknown_id_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await?;

        let result = ctx
            .products
            .update_product(
                ProductId::from_i64(77),
                ProductUpdate {
                    name: Some("Ghost".to_string()),
                    ..ProductUpdate::default()
                },
            )
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound(_))),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn remove_product_is_a_soft_delete() -> TestResult {
        let ctx = TestContext::new().await?;
        let created = create_product(&ctx, "Desk", 150.0).await?;

        let removed = ctx.products.remove_product(created.id).await?;

        assert!(!removed.available);

        let result = ctx.products.get_product(created.id).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound(_))),
            "expected NotFound after removal, got {result:?}"
        );

        let stored = ctx.find_any(created.id).await?;

        assert_eq!(stored.map(|row| row.available), Some(false));

        Ok(())
    }

    #[tokio::test]
    async fn remove_product_twice_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await?;
        let created = create_product(&ctx, "Chair", 80.0).await?;

        ctx.products.remove_product(created.id).await?;

        let result = ctx.products.remove_product(created.id).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound(_))),
            "expected NotFound on second removal, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn removed_product_cannot_be_updated() -> TestResult {
        let ctx = TestContext::new().await?;
        let created = create_product(&ctx, "Shelf", 30.0).await?;

        ctx.products.remove_product(created.id).await?;

        let result = ctx
            .products
            .update_product(
                created.id,
                ProductUpdate {
                    available: Some(true),
                    ..ProductUpdate::default()
                },
            )
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound(_))),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn validate_products_deduplicates_ids() -> TestResult {
        let ctx = TestContext::new().await?;
        let first = create_product(&ctx, "One", 1.0).await?;
        let second = create_product(&ctx, "Two", 2.0).await?;

        let products = ctx
            .products
            .validate_products(vec![first.id, first.id, second.id])
            .await?;

        assert_eq!(products, vec![first, second]);

        Ok(())
    }

    #[tokio::test]
    async fn validate_products_includes_removed_products() -> TestResult {
        let ctx = TestContext::new().await?;
        let created = create_product(&ctx, "Retired", 3.0).await?;

        ctx.products.remove_product(created.id).await?;

        let products = ctx.products.validate_products(vec![created.id]).await?;

        assert_eq!(products.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn validate_products_unknown_id_is_rejected() -> TestResult {
        let ctx = TestContext::new().await?;
        let created = create_product(&ctx, "Known", 1.0).await?;

        let result = ctx
            .products
            .validate_products(vec![created.id, ProductId::from_i64(99)])
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::SomeProductsNotFound)),
            "expected SomeProductsNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn validate_products_handles_batches_beyond_the_bind_limit() -> TestResult {
        let ctx = TestContext::new().await?;
        create_product(&ctx, "Known", 1.0).await?;

        let ids = (1..=40_000).map(ProductId::from_i64).collect();

        let result = ctx.products.validate_products(ids).await;

        assert!(
            matches!(result, Err(ProductsServiceError::SomeProductsNotFound)),
            "expected SomeProductsNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_products_far_past_the_end_is_empty() -> TestResult {
        let ctx = TestContext::new().await?;
        create_product(&ctx, "Only", 1.0).await?;

        let page = ctx
            .products
            .list_products(Pagination::new(u32::MAX, u32::MAX)?)
            .await?;

        assert!(page.data.is_empty());
        assert_eq!(page.meta.page, u32::MAX);
        assert_eq!(page.meta.limit, u32::MAX);
        assert_eq!(page.meta.total, 1);
        assert_eq!(page.meta.pages, 1);

        Ok(())
    }

    #[tokio::test]
    async fn validate_products_empty_list_skips_the_store() -> TestResult {
        let mut repository = MockProductsRepository::new();

        repository.expect_find_many().never();

        let service = StoreProductsService::with_repository(repository);

        assert!(service.validate_products(vec![]).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn list_products_counts_before_fetching_window() -> TestResult {
        let mut repository = MockProductsRepository::new();

        repository
            .expect_count()
            .once()
            .withf(|filter| *filter == ProductFilter::active())
            .return_once(|_| Ok(21));

        repository
            .expect_find_many()
            .once()
            .withf(|filter, window| {
                *filter == ProductFilter::active()
                    && window.is_some_and(|w| w.offset == 20 && w.limit == 10)
            })
            .return_once(|_, _| Ok(vec![record(21)]));

        let service = StoreProductsService::with_repository(repository);

        let page = service.list_products(Pagination::new(3, 10)?).await?;

        assert_eq!(page.meta.total, 21);
        assert_eq!(page.meta.pages, 3);
        assert_eq!(page.data.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn remove_racing_with_removal_surfaces_storage_error() -> TestResult {
        let mut repository = MockProductsRepository::new();
        let id = ProductId::from_i64(5);

        repository
            .expect_find_unique()
            .once()
            .withf(move |product, active_only| *product == id && *active_only)
            .return_once(|_, _| Ok(Some(record(5))));

        repository
            .expect_update()
            .once()
            .withf(move |product, changes| {
                *product == id && *changes == ProductUpdate::deactivate()
            })
            .return_once(|_, _| Err(sqlx::Error::RowNotFound));

        let service = StoreProductsService::with_repository(repository);

        let result = service.remove_product(id).await;

        assert!(
            matches!(result, Err(ProductsServiceError::Sql(sqlx::Error::RowNotFound))),
            "expected storage error, got {result:?}"
        );

        Ok(())
    }
}
