use log::{info, warn};
use shared::Product;

use super::commands::product::{AddProductCommand, AddProductResult, UpdateProductCommand};
use super::commands::ChangeResult;
use super::log_store_error;
use crate::storage::{ProductRepository, StoreResult};

/// Service for managing products
#[derive(Clone)]
pub struct ProductService {
    repository: ProductRepository,
}

impl ProductService {
    pub fn new(repository: ProductRepository) -> Self {
        Self { repository }
    }

    pub async fn add_product(&self, command: AddProductCommand) -> StoreResult<AddProductResult> {
        info!("Adding product: name={}, price={}", command.name, command.price);

        let id = self
            .repository
            .add_product(&command.name, command.price)
            .await
            .inspect_err(|e| log_store_error("adding product", e))?;

        let success_message = format!("Product '{}' added with ID '{}'.", command.name, id);
        info!("{}", success_message);

        Ok(AddProductResult {
            product: Product {
                id,
                name: command.name,
                price: command.price,
                quantity: 0,
            },
            success_message,
        })
    }

    /// Change a product's price; name and stock stay as they are
    pub async fn update_product(&self, command: UpdateProductCommand) -> StoreResult<ChangeResult> {
        info!("Updating product price: {} -> {}", command.product_id, command.price);

        let found = self
            .repository
            .update_product(command.product_id, command.price)
            .await
            .inspect_err(|e| log_store_error("updating product", e))?;

        let message = if found {
            format!("Product ID '{}' price updated.", command.product_id)
        } else {
            warn!("Product not found: {}", command.product_id);
            format!("Product ID '{}' not found; nothing updated.", command.product_id)
        };

        Ok(ChangeResult {
            id: command.product_id,
            found,
            message,
        })
    }

    pub async fn delete_product(&self, product_id: i64) -> StoreResult<ChangeResult> {
        info!("Deleting product: {}", product_id);

        let found = self
            .repository
            .delete_product(product_id)
            .await
            .inspect_err(|e| log_store_error("deleting product", e))?;

        let message = if found {
            format!("Product ID '{}' deleted.", product_id)
        } else {
            warn!("Product not found: {}", product_id);
            format!("Product ID '{}' not found; nothing deleted.", product_id)
        };

        Ok(ChangeResult {
            id: product_id,
            found,
            message,
        })
    }

    pub async fn list_products(&self) -> StoreResult<Vec<Product>> {
        self.repository
            .list_products()
            .await
            .inspect_err(|e| log_store_error("listing products", e))
    }
}
