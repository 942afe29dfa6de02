//! Error types for the storage layer.
//!
//! Every repository operation returns [`StoreResult`], so callers can tell an
//! empty result apart from a failed query, and a business-rule refusal apart
//! from a storage failure.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for storage operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors raised by the connection manager and the repositories
#[derive(Debug, Error)]
pub enum StoreError {
    /// The handle was closed (or never opened) before the operation ran
    #[error("database not connected")]
    NotConnected,

    /// Opening the database failed
    #[error("error connecting to database '{url}': {source}")]
    Connect {
        url: String,
        #[source]
        source: sqlx::Error,
    },

    /// Any failure reported by SQLite: constraint violations, bad SQL, I/O
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// A delete was refused because other rows still reference the target
    #[error(transparent)]
    Refused(#[from] Refusal),

    /// Writing the report file failed
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoding the report as CSV failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Deliberate refusals of a delete that would orphan dependent rows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Refusal {
    #[error("Cannot delete customer ID '{customer_id}' as there are {order_count} existing order(s).")]
    CustomerHasOrders { customer_id: i64, order_count: i64 },

    #[error("Cannot delete product ID '{product_id}' as there are {line_count} existing order detail(s).")]
    ProductInOrders { product_id: i64, line_count: i64 },
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_connected(&self) -> bool {
        matches!(self, Self::NotConnected)
    }

    /// The refusal behind this error, if it is one
    pub fn refusal(&self) -> Option<&Refusal> {
        match self {
            Self::Refused(refusal) => Some(refusal),
            _ => None,
        }
    }

    /// True when SQLite rejected a write for violating a UNIQUE or PRIMARY KEY constraint
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Storage(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }

    /// True when SQLite rejected a write for referencing a missing parent row
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            Self::Storage(sqlx::Error::Database(db_err)) => db_err.is_foreign_key_violation(),
            _ => false,
        }
    }
}
