use shared::{LineItem, Order, OrderReportRow, OrderWithItems};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::storage::connection::DbConnection;
use crate::storage::error::StoreResult;

/// Repository for orders and their line items (the `order_details` table)
#[derive(Clone)]
pub struct OrderRepository {
    db: DbConnection,
}

fn order_from_row(row: &SqliteRow) -> Order {
    Order {
        id: row.get("id"),
        customer_id: row.get("customer_id"),
        order_date: row.get("order_date"),
    }
}

/// Insert every line item of `order_id` on the given connection
async fn insert_line_items(conn: &mut SqliteConnection, order_id: i64, line_items: &[LineItem]) -> StoreResult<()> {
    for item in line_items {
        sqlx::query(
            r#"
            INSERT INTO order_details (order_id, product_id, quantity) VALUES (?, ?, ?)
            "#,
        )
        .bind(order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn line_items_for(pool: &SqlitePool, order_id: i64) -> StoreResult<Vec<LineItem>> {
    let rows = sqlx::query(
        r#"
        SELECT product_id, quantity
        FROM order_details
        WHERE order_id = ?
        "#,
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .iter()
        .map(|row| LineItem {
            product_id: row.get("product_id"),
            quantity: row.get("quantity"),
        })
        .collect())
}

impl OrderRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert an order and its line items atomically; returns the new order id.
    ///
    /// The detail rows use the id returned by the order insert inside the same
    /// transaction, so nothing is left behind if any line item is rejected.
    pub async fn add_order(&self, customer_id: i64, order_date: &str, line_items: &[LineItem]) -> StoreResult<i64> {
        let mut tx = self.db.begin().await?;

        let order_id = sqlx::query(
            r#"
            INSERT INTO orders (customer_id, order_date) VALUES (?, ?)
            "#,
        )
        .bind(customer_id)
        .bind(order_date)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        insert_line_items(&mut tx, order_id, line_items).await?;

        self.db.commit(tx).await?;
        Ok(order_id)
    }

    /// Replace the order header and its whole set of line items.
    ///
    /// Existing line items are deleted and `line_items` inserted in their
    /// place, so an empty slice clears the order. Returns false (and changes
    /// nothing) when no order has this id.
    pub async fn update_order(
        &self,
        order_id: i64,
        customer_id: i64,
        order_date: &str,
        line_items: &[LineItem],
    ) -> StoreResult<bool> {
        let mut tx = self.db.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE orders
            SET customer_id = ?, order_date = ?
            WHERE id = ?
            "#,
        )
        .bind(customer_id)
        .bind(order_date)
        .bind(order_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            return Ok(false);
        }

        sqlx::query(
            r#"
            DELETE FROM order_details WHERE order_id = ?
            "#,
        )
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

        insert_line_items(&mut tx, order_id, line_items).await?;

        self.db.commit(tx).await?;
        Ok(true)
    }

    /// Delete an order's line items and then the order, in one transaction.
    /// Returns false when no order has this id.
    pub async fn delete_order(&self, order_id: i64) -> StoreResult<bool> {
        let mut tx = self.db.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM order_details WHERE order_id = ?
            "#,
        )
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            r#"
            DELETE FROM orders WHERE id = ?
            "#,
        )
        .bind(order_id)
        .execute(&mut *tx)
        .await?;

        self.db.commit(tx).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Get one order with its line items
    pub async fn get_order(&self, order_id: i64) -> StoreResult<Option<OrderWithItems>> {
        let pool = self.db.pool()?;

        let row = sqlx::query(
            r#"
            SELECT id, customer_id, order_date
            FROM orders
            WHERE id = ?
            "#,
        )
        .bind(order_id)
        .fetch_optional(pool)
        .await?;

        match row {
            Some(r) => {
                let order = order_from_row(&r);
                let line_items = line_items_for(pool, order.id).await?;
                Ok(Some(OrderWithItems { order, line_items }))
            }
            None => Ok(None),
        }
    }

    /// Every order with its line items, in storage order
    pub async fn fetch_all_orders(&self) -> StoreResult<Vec<OrderWithItems>> {
        let pool = self.db.pool()?;

        let rows = sqlx::query(
            r#"
            SELECT id, customer_id, order_date
            FROM orders
            "#,
        )
        .fetch_all(pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            let order = order_from_row(row);
            let line_items = line_items_for(pool, order.id).await?;
            orders.push(OrderWithItems { order, line_items });
        }

        Ok(orders)
    }

    /// Orders of every customer whose name contains `customer_name`.
    ///
    /// Uses SQLite `LIKE`, so the match ignores ASCII case and `%`/`_` in the
    /// input act as wildcards.
    pub async fn search_orders_by_customer_name(&self, customer_name: &str) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query(
            r#"
            SELECT orders.id, orders.customer_id, orders.order_date
            FROM orders
            JOIN customers ON orders.customer_id = customers.id
            WHERE customers.name LIKE ?
            "#,
        )
        .bind(format!("%{}%", customer_name))
        .fetch_all(self.db.pool()?)
        .await?;

        Ok(rows.iter().map(order_from_row).collect())
    }

    /// One flat row per (order, line item); orders without line items yield none
    pub async fn report_rows(&self) -> StoreResult<Vec<OrderReportRow>> {
        let rows = sqlx::query(
            r#"
            SELECT orders.id AS order_id,
                   orders.customer_id AS customer_id,
                   customers.name AS customer_name,
                   orders.order_date AS order_date,
                   order_details.product_id AS product_id,
                   order_details.quantity AS quantity
            FROM orders
            JOIN customers ON orders.customer_id = customers.id
            JOIN order_details ON order_details.order_id = orders.id
            ORDER BY orders.id, order_details.rowid
            "#,
        )
        .fetch_all(self.db.pool()?)
        .await?;

        Ok(rows
            .iter()
            .map(|row| OrderReportRow {
                order_id: row.get("order_id"),
                customer_id: row.get("customer_id"),
                customer_name: row.get("customer_name"),
                order_date: row.get("order_date"),
                product_id: row.get("product_id"),
                quantity: row.get("quantity"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::repositories::{CustomerRepository, ProductRepository};
    use crate::storage::schema::Schema;

    struct Fixture {
        orders: OrderRepository,
        customer_id: i64,
        products: [i64; 3],
    }

    async fn setup_test() -> Fixture {
        let db = DbConnection::open_test().await.expect("Failed to open test database");
        Schema::new(db.clone()).create_tables().await.expect("Failed to create tables");

        let customers = CustomerRepository::new(db.clone());
        let products = ProductRepository::new(db.clone());

        let customer_id = customers.add_customer("Ada Lovelace", "ada@example.com").await.expect("add customer");
        let p1 = products.add_product("Widget", 2.5).await.expect("add product");
        let p2 = products.add_product("Gadget", 10.0).await.expect("add product");
        let p3 = products.add_product("Doohickey", 1.25).await.expect("add product");

        Fixture {
            orders: OrderRepository::new(db),
            customer_id,
            products: [p1, p2, p3],
        }
    }

    fn sorted(mut items: Vec<LineItem>) -> Vec<LineItem> {
        items.sort();
        items
    }

    #[tokio::test]
    async fn test_add_order_then_fetch_all_returns_exact_line_items() {
        let fx = setup_test().await;
        let [p1, p2, _] = fx.products;

        let order_id = fx
            .orders
            .add_order(fx.customer_id, "2024-03-01", &[LineItem::new(p2, 4), LineItem::new(p1, 1)])
            .await
            .expect("add order");

        let all = fx.orders.fetch_all_orders().await.expect("fetch all");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].order.id, order_id);
        assert_eq!(all[0].order.customer_id, fx.customer_id);
        assert_eq!(all[0].order.order_date, "2024-03-01");
        assert_eq!(
            sorted(all[0].line_items.clone()),
            sorted(vec![LineItem::new(p1, 1), LineItem::new(p2, 4)])
        );
    }

    #[tokio::test]
    async fn test_add_order_rolls_back_when_a_line_item_fails() {
        let fx = setup_test().await;
        let [p1, _, _] = fx.products;

        // Same product twice violates the composite primary key
        let result = fx
            .orders
            .add_order(fx.customer_id, "2024-03-01", &[LineItem::new(p1, 1), LineItem::new(p1, 2)])
            .await;
        let err = result.expect_err("duplicate line item should fail");
        assert!(err.is_unique_violation(), "unexpected error: {err}");

        assert!(fx.orders.fetch_all_orders().await.expect("fetch all").is_empty());
    }

    #[tokio::test]
    async fn test_add_order_for_missing_customer_fails() {
        let fx = setup_test().await;

        let err = fx
            .orders
            .add_order(999, "2024-03-01", &[])
            .await
            .expect_err("missing customer should fail");
        assert!(err.is_foreign_key_violation(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_update_order_replaces_header_and_line_items() {
        let fx = setup_test().await;
        let [p1, p2, p3] = fx.products;
        let order_id = fx
            .orders
            .add_order(fx.customer_id, "2024-03-01", &[LineItem::new(p1, 1), LineItem::new(p2, 2)])
            .await
            .expect("add order");

        let updated = fx
            .orders
            .update_order(order_id, fx.customer_id, "2024-04-15", &[LineItem::new(p3, 7)])
            .await
            .expect("update order");
        assert!(updated);

        let order = fx.orders.get_order(order_id).await.expect("get").expect("order exists");
        assert_eq!(order.order.order_date, "2024-04-15");
        assert_eq!(order.line_items, vec![LineItem::new(p3, 7)]);
    }

    #[tokio::test]
    async fn test_update_order_with_no_line_items_clears_them() {
        let fx = setup_test().await;
        let [p1, p2, _] = fx.products;
        let order_id = fx
            .orders
            .add_order(fx.customer_id, "2024-03-01", &[LineItem::new(p1, 1), LineItem::new(p2, 2)])
            .await
            .expect("add order");

        assert!(fx
            .orders
            .update_order(order_id, fx.customer_id, "2024-03-02", &[])
            .await
            .expect("update order"));

        let order = fx.orders.get_order(order_id).await.expect("get").expect("order exists");
        assert!(order.line_items.is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_order_changes_nothing() {
        let fx = setup_test().await;
        let [p1, _, _] = fx.products;

        let updated = fx
            .orders
            .update_order(123, fx.customer_id, "2024-03-02", &[LineItem::new(p1, 1)])
            .await
            .expect("update order");
        assert!(!updated);
        assert!(fx.orders.report_rows().await.expect("report").is_empty());
    }

    #[tokio::test]
    async fn test_update_order_rolls_back_when_a_line_item_fails() {
        let fx = setup_test().await;
        let [p1, p2, p3] = fx.products;
        let original = vec![LineItem::new(p1, 1), LineItem::new(p2, 2)];
        let order_id = fx
            .orders
            .add_order(fx.customer_id, "2024-03-01", &original)
            .await
            .expect("add order");

        let err = fx
            .orders
            .update_order(order_id, fx.customer_id, "2024-04-15", &[LineItem::new(p3, 1), LineItem::new(p3, 2)])
            .await
            .expect_err("duplicate line item should fail");
        assert!(err.is_unique_violation(), "unexpected error: {err}");

        let order = fx.orders.get_order(order_id).await.expect("get").expect("order exists");
        assert_eq!(order.order.order_date, "2024-03-01");
        assert_eq!(sorted(order.line_items), sorted(original));
    }

    #[tokio::test]
    async fn test_update_order_to_missing_customer_keeps_original() {
        let fx = setup_test().await;
        let [p1, _, p3] = fx.products;
        let order_id = fx
            .orders
            .add_order(fx.customer_id, "2024-03-01", &[LineItem::new(p1, 1)])
            .await
            .expect("add order");

        let err = fx
            .orders
            .update_order(order_id, 999, "2024-04-15", &[LineItem::new(p3, 4)])
            .await
            .expect_err("missing customer should fail");
        assert!(err.is_foreign_key_violation(), "unexpected error: {err}");

        let order = fx.orders.get_order(order_id).await.expect("get").expect("order exists");
        assert_eq!(order.order.customer_id, fx.customer_id);
        assert_eq!(order.order.order_date, "2024-03-01");
        assert_eq!(order.line_items, vec![LineItem::new(p1, 1)]);
    }

    #[tokio::test]
    async fn test_delete_order_rolls_back_when_order_row_fails() {
        let fx = setup_test().await;
        let [p1, p2, _] = fx.products;
        let original = vec![LineItem::new(p1, 1), LineItem::new(p2, 2)];
        let order_id = fx
            .orders
            .add_order(fx.customer_id, "2024-03-01", &original)
            .await
            .expect("add order");

        // Line items go first, then the order row is rejected
        fx.orders
            .db
            .execute(
                "CREATE TRIGGER keep_orders BEFORE DELETE ON orders BEGIN SELECT RAISE(ABORT, 'orders are locked'); END",
                &[],
            )
            .await
            .expect("create trigger");

        let err = fx.orders.delete_order(order_id).await.expect_err("delete should fail");
        assert!(err.to_string().contains("orders are locked"), "unexpected error: {err}");

        let order = fx.orders.get_order(order_id).await.expect("get").expect("order exists");
        assert_eq!(sorted(order.line_items), sorted(original));
    }

    #[tokio::test]
    async fn test_delete_order_removes_line_items_first() {
        let fx = setup_test().await;
        let [p1, p2, _] = fx.products;
        let order_id = fx
            .orders
            .add_order(fx.customer_id, "2024-03-01", &[LineItem::new(p1, 1), LineItem::new(p2, 2)])
            .await
            .expect("add order");

        assert!(fx.orders.delete_order(order_id).await.expect("delete"));

        assert!(fx.orders.get_order(order_id).await.expect("get").is_none());
        assert!(fx.orders.report_rows().await.expect("report").is_empty());
        assert!(!fx.orders.delete_order(order_id).await.expect("second delete"));
    }

    #[tokio::test]
    async fn test_search_orders_by_customer_name() {
        let fx = setup_test().await;
        let order_id = fx
            .orders
            .add_order(fx.customer_id, "2024-03-01", &[])
            .await
            .expect("add order");

        let found = fx.orders.search_orders_by_customer_name("Love").await.expect("search");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, order_id);

        let none = fx.orders.search_orders_by_customer_name("Hopper").await.expect("search");
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_report_rows_one_per_line_item() {
        let fx = setup_test().await;
        let [p1, p2, _] = fx.products;
        let order_id = fx
            .orders
            .add_order(fx.customer_id, "2024-03-01", &[LineItem::new(p1, 3), LineItem::new(p2, 5)])
            .await
            .expect("add order");
        fx.orders
            .add_order(fx.customer_id, "2024-03-05", &[])
            .await
            .expect("add empty order");

        let rows = fx.orders.report_rows().await.expect("report");
        assert_eq!(rows.len(), 2);
        for row in &rows {
            assert_eq!(row.order_id, order_id);
            assert_eq!(row.customer_id, fx.customer_id);
            assert_eq!(row.customer_name, "Ada Lovelace");
            assert_eq!(row.order_date, "2024-03-01");
        }
        assert_eq!((rows[0].product_id, rows[0].quantity), (p1, 3));
        assert_eq!((rows[1].product_id, rows[1].quantity), (p2, 5));
    }
}
