use shared::Product;
use sqlx::Row;

use crate::storage::connection::DbConnection;
use crate::storage::error::{Refusal, StoreResult};

/// Repository for product operations
#[derive(Clone)]
pub struct ProductRepository {
    db: DbConnection,
}

impl ProductRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert a product and return its generated id. Quantity starts at 0.
    pub async fn add_product(&self, name: &str, price: f64) -> StoreResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO products (name, price) VALUES (?, ?)
            "#,
        )
        .bind(name)
        .bind(price)
        .execute(self.db.pool()?)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Get a product by ID
    pub async fn get_product(&self, product_id: i64) -> StoreResult<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, price, quantity
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(product_id)
        .fetch_optional(self.db.pool()?)
        .await?;

        Ok(row.map(|r| Product {
            id: r.get("id"),
            name: r.get("name"),
            price: r.get("price"),
            quantity: r.get("quantity"),
        }))
    }

    /// List all products ordered by id
    pub async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, price, quantity
            FROM products
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.db.pool()?)
        .await?;

        let products = rows
            .iter()
            .map(|row| Product {
                id: row.get("id"),
                name: row.get("name"),
                price: row.get("price"),
                quantity: row.get("quantity"),
            })
            .collect();

        Ok(products)
    }

    /// Replace the price only. Returns false when no product has this id.
    pub async fn update_product(&self, product_id: i64, new_price: f64) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET price = ?
            WHERE id = ?
            "#,
        )
        .bind(new_price)
        .bind(product_id)
        .execute(self.db.pool()?)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a product that no order line references.
    ///
    /// Refused with [`Refusal::ProductInOrders`] otherwise.
    pub async fn delete_product(&self, product_id: i64) -> StoreResult<bool> {
        let mut tx = self.db.begin().await?;

        let line_count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM order_details WHERE product_id = ?
            "#,
        )
        .bind(product_id)
        .fetch_one(&mut *tx)
        .await?;

        if line_count > 0 {
            return Err(Refusal::ProductInOrders {
                product_id,
                line_count,
            }
            .into());
        }

        let result = sqlx::query(
            r#"
            DELETE FROM products WHERE id = ?
            "#,
        )
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

        self.db.commit(tx).await?;
        Ok(result.rows_affected() > 0)
    }
}
