//! Products Repository

use async_trait::async_trait;
use mockall::automock;
use sqlx::{FromRow, QueryBuilder, Row, Sqlite, query_as, sqlite::SqliteRow};

use crate::{
    database::Db,
    domain::products::{
        data::{NewProduct, ProductFilter, ProductUpdate, Window},
        records::{ProductId, ProductRecord},
    },
};

const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");

const SELECT_PRODUCTS_SQL: &str = "SELECT id, name, price, available FROM products";
const COUNT_PRODUCTS_SQL: &str = "SELECT COUNT(*) FROM products";

/// The store operations the products service relies on.
#[automock]
#[async_trait]
pub trait ProductsRepository: Send + Sync {
    /// Insert a row and return it with its assigned id.
    async fn create(&self, product: NewProduct) -> Result<ProductRecord, sqlx::Error>;

    /// Look up one row by id, optionally only when it is active.
    async fn find_unique(
        &self,
        product: ProductId,
        active_only: bool,
    ) -> Result<Option<ProductRecord>, sqlx::Error>;

    /// Fetch rows matching `filter` in ascending id order.
    async fn find_many(
        &self,
        filter: ProductFilter,
        window: Option<Window>,
    ) -> Result<Vec<ProductRecord>, sqlx::Error>;

    /// Count rows matching `filter`.
    async fn count(&self, filter: ProductFilter) -> Result<u64, sqlx::Error>;

    /// Write the supplied fields of `changes`; fails with `RowNotFound` when the id is absent.
    async fn update(
        &self,
        product: ProductId,
        changes: ProductUpdate,
    ) -> Result<ProductRecord, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct SqliteProductsRepository {
    db: Db,
}

impl SqliteProductsRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductsRepository for SqliteProductsRepository {
    async fn create(&self, product: NewProduct) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Sqlite, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.name)
            .bind(product.price)
            .bind(product.available.unwrap_or(true))
            .fetch_one(self.db.pool())
            .await
    }

    async fn find_unique(
        &self,
        product: ProductId,
        active_only: bool,
    ) -> Result<Option<ProductRecord>, sqlx::Error> {
        query_as::<Sqlite, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_i64())
            .bind(active_only.then_some(true))
            .fetch_optional(self.db.pool())
            .await
    }

    async fn find_many(
        &self,
        filter: ProductFilter,
        window: Option<Window>,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_PRODUCTS_SQL);

        push_filter(&mut builder, &filter);

        builder.push(" ORDER BY id ASC");

        if let Some(window) = window {
            builder
                .push(" LIMIT ")
                .push_bind(saturating_sql_int(window.limit))
                .push(" OFFSET ")
                .push_bind(saturating_sql_int(window.offset));
        }

        builder
            .build_query_as::<ProductRecord>()
            .fetch_all(self.db.pool())
            .await
    }

    async fn count(&self, filter: ProductFilter) -> Result<u64, sqlx::Error> {
        let mut builder = QueryBuilder::<Sqlite>::new(COUNT_PRODUCTS_SQL);

        push_filter(&mut builder, &filter);

        let total: i64 = builder
            .build_query_scalar()
            .fetch_one(self.db.pool())
            .await?;

        u64::try_from(total).map_err(|e| sqlx::Error::ColumnDecode {
            index: "count".to_string(),
            source: Box::new(e),
        })
    }

    async fn update(
        &self,
        product: ProductId,
        changes: ProductUpdate,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Sqlite, ProductRecord>(UPDATE_PRODUCT_SQL)
            .bind(product.into_i64())
            .bind(changes.name)
            .bind(changes.price)
            .bind(changes.available)
            .fetch_one(self.db.pool())
            .await
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &ProductFilter) {
    builder.push(" WHERE 1 = 1");

    if let Some(available) = filter.available {
        builder.push(" AND available = ").push_bind(available);
    }

    // One JSON array bind keeps large id lists under SQLite's variable limit
    if let Some(ids) = &filter.ids {
        builder
            .push(" AND id IN (SELECT value FROM json_each(")
            .push_bind(json_id_array(ids))
            .push("))");
    }
}

fn json_id_array(ids: &[ProductId]) -> String {
    let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();

    format!("[{}]", ids.join(","))
}

/// Windows past the end of any SQLite table read as `i64::MAX`.
fn saturating_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl<'r> FromRow<'r, SqliteRow> for ProductRecord {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: ProductId::from_i64(row.try_get("id")?),
            name: row.try_get("name")?,
            price: row.try_get("price")?,
            available: row.try_get("available")?,
        })
    }
}
