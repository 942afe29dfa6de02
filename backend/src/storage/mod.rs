//! # Storage Module
//!
//! Handles all data persistence for the order manager.
//!
//! ## Components
//!
//! - **connection.rs** - the single SQLite handle: open, execute, transactions, close
//! - **schema.rs** - idempotent creation of the four tables
//! - **repositories/** - customer, product and order repositories
//! - **error.rs** - [`StoreError`] and the [`Refusal`] outcomes of guarded deletes
//!
//! ## Referential integrity
//!
//! Foreign keys are enforced by SQLite. Deletes of customers and products are
//! additionally guarded by a reference check so the caller receives a
//! [`Refusal`] instead of a raw constraint failure, and order deletes remove
//! the line items before the order inside one transaction.

pub mod connection;
pub mod error;
pub mod repositories;
pub mod schema;

// Re-export the main types that other modules need
pub use connection::{DbConnection, SqlValue, DEFAULT_DATABASE_URL};
pub use error::{Refusal, StoreError, StoreResult};
pub use repositories::{CustomerRepository, OrderRepository, ProductRepository};
pub use schema::Schema;
