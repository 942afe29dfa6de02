//! # Domain Module
//!
//! One service per aggregate, sitting between the callers (menu and CLI) and
//! the storage repositories. Services log every outcome and return typed
//! results; they never print.

pub mod commands;
pub mod customer_service;
pub mod export_service;
pub mod order_service;
pub mod product_service;

pub use customer_service::CustomerService;
pub use export_service::{ExportService, DEFAULT_REPORT_FILE};
pub use order_service::OrderService;
pub use product_service::ProductService;

use log::{error, warn};

use crate::storage::StoreError;

/// Refusals are expected outcomes and logged as warnings; everything else is an error
pub(crate) fn log_store_error(action: &str, err: &StoreError) {
    match err {
        StoreError::Refused(refusal) => warn!("{}", refusal),
        other => error!("Error {}: {}", action, other),
    }
}
