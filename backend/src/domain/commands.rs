//! Domain-level command and result types.
//!
//! Callers (the menu and the one-shot CLI commands) build the commands from
//! already-parsed input; services hand back the results with a one-line
//! message describing the outcome.

/// Outcome of an update or delete addressed by id
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeResult {
    pub id: i64,
    /// False when no row had this id; nothing was changed
    pub found: bool,
    pub message: String,
}

pub mod customer {
    use shared::Customer;

    /// Input for creating a new customer.
    #[derive(Debug, Clone)]
    pub struct AddCustomerCommand {
        pub name: String,
        pub email: String,
    }

    /// Full replacement of a customer's name and email.
    #[derive(Debug, Clone)]
    pub struct UpdateCustomerCommand {
        pub customer_id: i64,
        pub name: String,
        pub email: String,
    }

    #[derive(Debug, Clone)]
    pub struct AddCustomerResult {
        pub customer: Customer,
        pub success_message: String,
    }
}

pub mod product {
    use shared::Product;

    /// Input for creating a new product. Stock quantity always starts at 0.
    #[derive(Debug, Clone)]
    pub struct AddProductCommand {
        pub name: String,
        pub price: f64,
    }

    /// Price change for an existing product.
    #[derive(Debug, Clone)]
    pub struct UpdateProductCommand {
        pub product_id: i64,
        pub price: f64,
    }

    #[derive(Debug, Clone)]
    pub struct AddProductResult {
        pub product: Product,
        pub success_message: String,
    }
}

pub mod order {
    use shared::{LineItem, Order, OrderWithItems};

    /// Input for creating an order with its line items.
    #[derive(Debug, Clone)]
    pub struct AddOrderCommand {
        pub customer_id: i64,
        pub order_date: String,
        pub line_items: Vec<LineItem>,
    }

    /// Full replacement of an order; `line_items` replaces the whole set.
    #[derive(Debug, Clone)]
    pub struct UpdateOrderCommand {
        pub order_id: i64,
        pub customer_id: i64,
        pub order_date: String,
        pub line_items: Vec<LineItem>,
    }

    #[derive(Debug, Clone)]
    pub struct AddOrderResult {
        pub order: OrderWithItems,
        pub success_message: String,
    }

    #[derive(Debug, Clone)]
    pub struct OrderListResult {
        pub orders: Vec<OrderWithItems>,
    }

    #[derive(Debug, Clone)]
    pub struct SearchOrdersResult {
        pub customer_name: String,
        pub orders: Vec<Order>,
    }
}

pub mod export {
    use std::path::PathBuf;

    /// Where to write the report; `None` uses the configured default file.
    #[derive(Debug, Clone, Default)]
    pub struct GenerateReportCommand {
        pub destination: Option<PathBuf>,
    }

    #[derive(Debug, Clone)]
    pub struct GenerateReportResult {
        pub file_path: PathBuf,
        pub row_count: usize,
        pub success_message: String,
    }
}
