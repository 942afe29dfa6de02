//! # Order Manager
//!
//! A single-user customer, product and order manager backed by SQLite.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (interactive menu, one-shot subcommands)
//!     ↓
//! Domain Layer (services, commands, CSV export)
//!     ↓
//! Storage Layer (repositories, schema, the single connection)
//! ```
//!
//! [`initialize_app`] opens the database, creates the schema and wires the
//! services together. The resulting [`AppState`] owns the connection; call
//! `app.db.close()` when the session ends.

pub mod cli;
pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use log::info;

use crate::config::AppConfig;
use crate::domain::{CustomerService, ExportService, OrderService, ProductService};
use crate::storage::{CustomerRepository, DbConnection, OrderRepository, ProductRepository, Schema, StoreResult};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub db: DbConnection,
    pub customer_service: CustomerService,
    pub product_service: ProductService,
    pub order_service: OrderService,
    pub export_service: ExportService,
}

/// Open the database, make sure the schema exists and build the services
pub async fn initialize_app(config: &AppConfig) -> StoreResult<AppState> {
    info!("Setting up database");
    let db = DbConnection::open(&config.database_url).await?;
    Schema::new(db.clone()).create_tables().await?;

    info!("Setting up domain services");
    let orders = OrderRepository::new(db.clone());
    let app_state = AppState {
        customer_service: CustomerService::new(CustomerRepository::new(db.clone())),
        product_service: ProductService::new(ProductRepository::new(db.clone())),
        order_service: OrderService::new(orders.clone()),
        export_service: ExportService::new(orders, config.report_path.clone()),
        db,
    };

    Ok(app_state)
}
