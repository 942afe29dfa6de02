//! SQLite repositories, one per aggregate.
//!
//! Each repository holds a clone of the shared [`DbConnection`] and runs every
//! multi-statement operation inside a single transaction.
//!
//! [`DbConnection`]: crate::storage::DbConnection

pub mod customer_repository;
pub mod order_repository;
pub mod product_repository;

pub use customer_repository::CustomerRepository;
pub use order_repository::OrderRepository;
pub use product_repository::ProductRepository;
