//! Database connection management

use std::str::FromStr;

use sqlx::{
    SqlitePool,
    migrate::{MigrateError, Migrator},
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::info;

pub use sqlx::Error as SqlError;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Shared handle to the product store.
///
/// The handle is opened once at startup, passed to whatever needs it, and
/// closed explicitly on shutdown so tests can tear it down deterministically.
#[derive(Debug, Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for the given `SQLite` URL, creating the database file when missing.
    ///
    /// In-memory databases are private to a single connection, so the pool is
    /// pinned to one long-lived connection for them.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the connection cannot be established.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = if is_in_memory(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new().connect_with(options).await?
        };

        info!("database connected");

        Ok(Self::new(pool))
    }

    /// Apply the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns an error when a migration fails to apply.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        MIGRATOR.run(&self.pool).await
    }

    /// Close every pooled connection, waiting for checked-out ones to return.
    pub async fn close(&self) {
        self.pool.close().await;

        info!("database closed");
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn detects_in_memory_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://catalog?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://catalog.db"));
    }

    #[tokio::test]
    async fn in_memory_database_survives_between_queries() -> TestResult {
        let db = Db::connect("sqlite::memory:").await?;

        db.migrate().await?;

        sqlx::query("INSERT INTO products (name, price) VALUES ('Pen', 1.5)")
            .execute(db.pool())
            .await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(db.pool())
            .await?;

        assert_eq!(count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn close_marks_pool_closed() -> TestResult {
        let db = Db::connect("sqlite::memory:").await?;

        assert!(!db.is_closed());

        db.close().await;

        assert!(db.is_closed());

        Ok(())
    }
}
