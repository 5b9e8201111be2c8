//! App Context

use std::sync::Arc;

use sqlx::migrate::MigrateError;
use thiserror::Error;

use crate::{
    database::Db,
    domain::products::{ProductsService, StoreProductsService},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrations(#[source] MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    db: Db,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or migrating the schema fails.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let db = Db::connect(url).await.map_err(AppInitError::Database)?;

        db.migrate().await.map_err(AppInitError::Migrations)?;

        Ok(Self::new(db))
    }

    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            products: Arc::new(StoreProductsService::new(db.clone())),
            db,
        }
    }

    /// Release the database pool.
    pub async fn close(&self) {
        self.db.close().await;
    }
}
