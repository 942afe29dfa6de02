use log::{info, warn};
use shared::{Order, OrderWithItems};

use super::commands::order::{
    AddOrderCommand, AddOrderResult, OrderListResult, SearchOrdersResult, UpdateOrderCommand,
};
use super::commands::ChangeResult;
use super::log_store_error;
use crate::storage::{OrderRepository, StoreResult};

/// Service for orders and their line items
#[derive(Clone)]
pub struct OrderService {
    repository: OrderRepository,
}

impl OrderService {
    pub fn new(repository: OrderRepository) -> Self {
        Self { repository }
    }

    pub async fn add_order(&self, command: AddOrderCommand) -> StoreResult<AddOrderResult> {
        info!(
            "Adding order: customer_id={}, date={}, line_items={}",
            command.customer_id,
            command.order_date,
            command.line_items.len()
        );

        let order_id = self
            .repository
            .add_order(command.customer_id, &command.order_date, &command.line_items)
            .await
            .inspect_err(|e| log_store_error("adding order", e))?;

        let success_message = format!(
            "Order ID '{}' added for customer ID '{}'.",
            order_id, command.customer_id
        );
        info!("{}", success_message);

        Ok(AddOrderResult {
            order: OrderWithItems {
                order: Order {
                    id: order_id,
                    customer_id: command.customer_id,
                    order_date: command.order_date,
                },
                line_items: command.line_items,
            },
            success_message,
        })
    }

    /// Replace an order's header and its full set of line items
    pub async fn update_order(&self, command: UpdateOrderCommand) -> StoreResult<ChangeResult> {
        info!(
            "Updating order: {} (customer_id={}, date={}, line_items={})",
            command.order_id,
            command.customer_id,
            command.order_date,
            command.line_items.len()
        );

        if command.line_items.is_empty() {
            warn!("Order {} updated with no line items; existing items will be cleared", command.order_id);
        }

        let found = self
            .repository
            .update_order(
                command.order_id,
                command.customer_id,
                &command.order_date,
                &command.line_items,
            )
            .await
            .inspect_err(|e| log_store_error("updating order", e))?;

        let message = if found {
            format!("Order ID '{}' updated.", command.order_id)
        } else {
            warn!("Order not found: {}", command.order_id);
            format!("Order ID '{}' not found; nothing updated.", command.order_id)
        };

        Ok(ChangeResult {
            id: command.order_id,
            found,
            message,
        })
    }

    pub async fn delete_order(&self, order_id: i64) -> StoreResult<ChangeResult> {
        info!("Deleting order: {}", order_id);

        let found = self
            .repository
            .delete_order(order_id)
            .await
            .inspect_err(|e| log_store_error("deleting order", e))?;

        let message = if found {
            format!("Order ID '{}' deleted.", order_id)
        } else {
            warn!("Order not found: {}", order_id);
            format!("Order ID '{}' not found; nothing deleted.", order_id)
        };

        Ok(ChangeResult {
            id: order_id,
            found,
            message,
        })
    }

    pub async fn fetch_all_orders(&self) -> StoreResult<OrderListResult> {
        let orders = self
            .repository
            .fetch_all_orders()
            .await
            .inspect_err(|e| log_store_error("fetching orders", e))?;

        info!("Fetched {} orders", orders.len());
        Ok(OrderListResult { orders })
    }

    pub async fn search_orders_by_customer_name(&self, customer_name: &str) -> StoreResult<SearchOrdersResult> {
        info!("Searching orders for customer name containing '{}'", customer_name);

        let orders = self
            .repository
            .search_orders_by_customer_name(customer_name)
            .await
            .inspect_err(|e| log_store_error("searching orders", e))?;

        info!("Found {} orders for '{}'", orders.len(), customer_name);
        Ok(SearchOrdersResult {
            customer_name: customer_name.to_string(),
            orders,
        })
    }
}
