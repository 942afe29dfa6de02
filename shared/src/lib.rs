use serde::{Deserialize, Serialize};
use std::fmt;

/// A customer who can place orders. `email` is unique across customers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// A product that can appear on order lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    /// Stock on hand. Starts at 0 and is not set by the add/update operations.
    pub quantity: i64,
}

/// An order header row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    /// Order date as entered, normally `YYYY-MM-DD`
    pub order_date: String,
}

/// A (product, quantity) pair attached to an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: i64,
    pub quantity: i64,
}

impl LineItem {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        Self { product_id, quantity }
    }
}

/// An order together with all of its line items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub line_items: Vec<LineItem>,
}

/// One row of the flat order report: one per (order, line item) pair.
///
/// The serde names match the report header columns, so a written report
/// reads back into these rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReportRow {
    #[serde(rename = "Order ID")]
    pub order_id: i64,
    #[serde(rename = "Customer ID")]
    pub customer_id: i64,
    #[serde(rename = "Customer Name")]
    pub customer_name: String,
    #[serde(rename = "Order Date")]
    pub order_date: String,
    #[serde(rename = "Product ID")]
    pub product_id: i64,
    #[serde(rename = "Quantity")]
    pub quantity: i64,
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Customer ID: {}, Name: {}, Email: {}", self.id, self.name, self.email)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Product ID: {}, Name: {}, Price: {:.2}, Quantity: {}",
            self.id, self.name, self.price, self.quantity
        )
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order ID: {}, Customer ID: {}, Order Date: {}",
            self.id, self.customer_id, self.order_date
        )
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Product ID: {}, Quantity: {}", self.product_id, self.quantity)
    }
}
