use sqlx::Row;
use tracing::info;

use super::connection::DbConnection;
use super::error::StoreResult;

/// Table definitions in dependency order: parents before children
const TABLES: [(&str, &str); 4] = [
    (
        "customers",
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE
        );
        "#,
    ),
    (
        "products",
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            price REAL NOT NULL,
            quantity INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "orders",
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id INTEGER PRIMARY KEY,
            customer_id INTEGER NOT NULL,
            order_date TEXT NOT NULL,
            FOREIGN KEY (customer_id) REFERENCES customers (id)
        );
        "#,
    ),
    (
        "order_details",
        r#"
        CREATE TABLE IF NOT EXISTS order_details (
            order_id INTEGER NOT NULL,
            product_id INTEGER NOT NULL,
            quantity INTEGER NOT NULL,
            FOREIGN KEY (order_id) REFERENCES orders (id),
            FOREIGN KEY (product_id) REFERENCES products (id),
            PRIMARY KEY (order_id, product_id)
        );
        "#,
    ),
];

/// Owns the four-table schema
#[derive(Clone)]
pub struct Schema {
    db: DbConnection,
}

impl Schema {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Create every table that does not exist yet. Safe to call on every start.
    pub async fn create_tables(&self) -> StoreResult<()> {
        for (name, ddl) in TABLES {
            self.db.execute(ddl, &[]).await?;
            info!("Table '{}' ready", name);
        }
        Ok(())
    }

    /// Names of the user tables currently in the database, sorted
    pub async fn table_names(&self) -> StoreResult<Vec<String>> {
        let rows = self
            .db
            .execute(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
                &[],
            )
            .await?;

        Ok(rows.iter().map(|row| row.get("name")).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> (DbConnection, Schema) {
        let db = DbConnection::open_test().await.expect("Failed to open test database");
        let schema = Schema::new(db.clone());
        (db, schema)
    }

    #[tokio::test]
    async fn test_create_tables() {
        let (_db, schema) = setup_test().await;

        schema.create_tables().await.expect("Failed to create tables");

        let tables = schema.table_names().await.expect("Failed to list tables");
        assert_eq!(tables, vec!["customers", "order_details", "orders", "products"]);
    }

    #[tokio::test]
    async fn test_create_tables_twice_is_idempotent() {
        let (db, schema) = setup_test().await;
        schema.create_tables().await.expect("first create");

        db.execute(
            "INSERT INTO customers (name, email) VALUES (?, ?)",
            &["Ada".into(), "ada@example.com".into()],
        )
        .await
        .expect("insert customer");

        schema.create_tables().await.expect("second create");

        let tables = schema.table_names().await.expect("Failed to list tables");
        assert_eq!(tables.len(), 4);

        let rows = db.execute("SELECT name FROM customers", &[]).await.expect("select");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get::<String, _>("name"), "Ada");
    }
}
