use shared::Customer;
use sqlx::Row;

use crate::storage::connection::DbConnection;
use crate::storage::error::{Refusal, StoreResult};

/// Repository for customer operations
#[derive(Clone)]
pub struct CustomerRepository {
    db: DbConnection,
}

impl CustomerRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert a customer and return its generated id.
    ///
    /// A duplicate email surfaces as a storage error for which
    /// `is_unique_violation()` is true.
    pub async fn add_customer(&self, name: &str, email: &str) -> StoreResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO customers (name, email) VALUES (?, ?)
            "#,
        )
        .bind(name)
        .bind(email)
        .execute(self.db.pool()?)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Get a customer by ID
    pub async fn get_customer(&self, customer_id: i64) -> StoreResult<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email
            FROM customers
            WHERE id = ?
            "#,
        )
        .bind(customer_id)
        .fetch_optional(self.db.pool()?)
        .await?;

        Ok(row.map(|r| Customer {
            id: r.get("id"),
            name: r.get("name"),
            email: r.get("email"),
        }))
    }

    /// List all customers ordered by id
    pub async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email
            FROM customers
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.db.pool()?)
        .await?;

        let customers = rows
            .iter()
            .map(|row| Customer {
                id: row.get("id"),
                name: row.get("name"),
                email: row.get("email"),
            })
            .collect();

        Ok(customers)
    }

    /// Replace name and email. Returns false when no customer has this id.
    pub async fn update_customer(&self, customer_id: i64, name: &str, email: &str) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET name = ?, email = ?
            WHERE id = ?
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(customer_id)
        .execute(self.db.pool()?)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a customer that has no orders.
    ///
    /// Refused with [`Refusal::CustomerHasOrders`] while any order references
    /// the customer. Returns false when no customer has this id.
    pub async fn delete_customer(&self, customer_id: i64) -> StoreResult<bool> {
        let mut tx = self.db.begin().await?;

        let order_count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM orders WHERE customer_id = ?
            "#,
        )
        .bind(customer_id)
        .fetch_one(&mut *tx)
        .await?;

        if order_count > 0 {
            return Err(Refusal::CustomerHasOrders {
                customer_id,
                order_count,
            }
            .into());
        }

        let result = sqlx::query(
            r#"
            DELETE FROM customers WHERE id = ?
            "#,
        )
        .bind(customer_id)
        .execute(&mut *tx)
        .await?;

        self.db.commit(tx).await?;
        Ok(result.rows_affected() > 0)
    }
}
