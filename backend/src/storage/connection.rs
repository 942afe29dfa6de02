use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use super::error::{StoreError, StoreResult};

/// The database URL used when nothing else is configured
pub const DEFAULT_DATABASE_URL: &str = "sqlite:orders.db";

/// A positional parameter for [`DbConnection::execute`]
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// DbConnection owns the single SQLite handle used by every repository.
///
/// Clones share the same handle; closing any clone closes it for all of them.
#[derive(Clone)]
pub struct DbConnection {
    url: String,
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating the file if missing) the database at `url`.
    ///
    /// Accepts `sqlite:` URLs, `sqlite::memory:` and plain file paths.
    pub async fn open(url: &str) -> StoreResult<Self> {
        let connect_error = |source: sqlx::Error| {
            error!("Error connecting to database '{}': {}", url, source);
            StoreError::Connect {
                url: url.to_string(),
                source,
            }
        };

        let options = SqliteConnectOptions::from_str(url)
            .map_err(connect_error)?
            .create_if_missing(true)
            .foreign_keys(true);

        // One connection for the process lifetime; an in-memory database
        // would be lost if the pool recycled it.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .map_err(connect_error)?;

        info!("Connected to database '{}'", url);

        Ok(Self {
            url: url.to_string(),
            pool: Arc::new(pool),
        })
    }

    /// Open a private in-memory database for tests
    #[cfg(test)]
    pub async fn open_test() -> StoreResult<Self> {
        Self::open("sqlite::memory:").await
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_connected(&self) -> bool {
        !self.pool.is_closed()
    }

    /// Get the underlying pool, failing fast once the handle is closed
    pub fn pool(&self) -> StoreResult<&SqlitePool> {
        if self.pool.is_closed() {
            return Err(StoreError::NotConnected);
        }
        Ok(&self.pool)
    }

    /// Run one parameterized statement and return whatever rows it produced
    pub async fn execute(&self, statement: &str, params: &[SqlValue]) -> StoreResult<Vec<SqliteRow>> {
        let pool = self.pool()?;

        let mut query = sqlx::query(statement);
        for param in params {
            query = match param {
                SqlValue::Integer(value) => query.bind(*value),
                SqlValue::Real(value) => query.bind(*value),
                SqlValue::Text(value) => query.bind(value.clone()),
            };
        }

        query.fetch_all(pool).await.map_err(|e| {
            error!("Error executing query: {}", e);
            StoreError::Storage(e)
        })
    }

    /// Start a transaction on the shared handle.
    ///
    /// Dropping the transaction without [`DbConnection::commit`] rolls it back.
    pub async fn begin(&self) -> StoreResult<Transaction<'static, Sqlite>> {
        let pool = self.pool()?;
        pool.begin().await.map_err(|e| {
            error!("Error starting transaction: {}", e);
            StoreError::Storage(e)
        })
    }

    /// Durably apply a transaction started with [`DbConnection::begin`]
    pub async fn commit(&self, tx: Transaction<'static, Sqlite>) -> StoreResult<()> {
        tx.commit().await.map_err(|e| {
            error!("Error committing transaction: {}", e);
            StoreError::Storage(e)
        })
    }

    /// Release the handle. Safe to call more than once.
    pub async fn close(&self) {
        if self.pool.is_closed() {
            return;
        }
        self.pool.close().await;
        info!("Connection to database '{}' closed", self.url);
    }
}
