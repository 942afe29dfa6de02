//! The interactive numbered menu.
//!
//! Reads operator input line by line, parses it into typed commands and prints
//! a one-line status for every outcome. Storage failures and refusals are
//! reported and the loop continues; only a closed connection ends the session
//! with an error.

use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use chrono::NaiveDate;
use shared::LineItem;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::listing;
use crate::domain::commands::customer::{AddCustomerCommand, UpdateCustomerCommand};
use crate::domain::commands::export::GenerateReportCommand;
use crate::domain::commands::order::{AddOrderCommand, UpdateOrderCommand};
use crate::domain::commands::product::{AddProductCommand, UpdateProductCommand};
use crate::storage::{StoreError, StoreResult};
use crate::AppState;

const MENU: &str = "\
Menu:
1. Add Customer
2. Update Customer
3. Delete Customer
4. Add Product
5. Update Product
6. Delete Product
7. Add Order
8. Update Order
9. Delete Order
10. Fetch All Orders
11. Generate Report
12. Search Orders by Customer Name
13. Exit";

/// Raised when the input stream ends in the middle of the session
#[derive(Debug, thiserror::Error)]
#[error("input closed")]
struct InputClosed;

/// Interactive session over any line-oriented input and text output
pub struct Menu<'a, R, W> {
    app: &'a AppState,
    input: R,
    output: W,
}

impl<'a, R, W> Menu<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(app: &'a AppState, input: R, output: W) -> Self {
        Self { app, input, output }
    }

    /// Run until the operator picks Exit or the input ends
    pub async fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\n{}", MENU)?;
            match self.step().await {
                Ok(true) => continue,
                Ok(false) => break,
                Err(e) if e.downcast_ref::<InputClosed>().is_some() => {
                    writeln!(self.output)?;
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        writeln!(self.output, "Exiting...")?;
        Ok(())
    }

    /// Handle one menu choice; false means exit
    async fn step(&mut self) -> Result<bool> {
        let choice = self.prompt("Enter your choice (1-13): ").await?;
        match choice.as_str() {
            "1" => self.add_customer().await?,
            "2" => self.update_customer().await?,
            "3" => self.delete_customer().await?,
            "4" => self.add_product().await?,
            "5" => self.update_product().await?,
            "6" => self.delete_product().await?,
            "7" => self.add_order().await?,
            "8" => self.update_order().await?,
            "9" => self.delete_order().await?,
            "10" => self.fetch_all_orders().await?,
            "11" => self.generate_report().await?,
            "12" => self.search_orders().await?,
            "13" => return Ok(false),
            _ => writeln!(self.output, "Invalid choice, please enter a number between 1 and 13.")?,
        }
        Ok(true)
    }

    async fn add_customer(&mut self) -> Result<()> {
        let name = self.prompt_required("Enter customer name: ").await?;
        let email = self.prompt_required("Enter customer email: ").await?;
        let result = self.app.customer_service.add_customer(AddCustomerCommand { name, email }).await;
        self.narrate(result, "adding customer", |r| r.success_message)
    }

    async fn update_customer(&mut self) -> Result<()> {
        let customer_id = self.prompt_parsed("Enter customer ID to update: ", "customer ID").await?;
        let name = self.prompt_required("Enter new name: ").await?;
        let email = self.prompt_required("Enter new email: ").await?;
        let result = self
            .app
            .customer_service
            .update_customer(UpdateCustomerCommand {
                customer_id,
                name,
                email,
            })
            .await;
        self.narrate(result, "updating customer", |r| r.message)
    }

    async fn delete_customer(&mut self) -> Result<()> {
        let customer_id = self.prompt_parsed("Enter customer ID to delete: ", "customer ID").await?;
        let result = self.app.customer_service.delete_customer(customer_id).await;
        self.narrate(result, "deleting customer", |r| r.message)
    }

    async fn add_product(&mut self) -> Result<()> {
        let name = self.prompt_required("Enter product name: ").await?;
        let price = self.prompt_price("Enter product price: ").await?;
        let result = self.app.product_service.add_product(AddProductCommand { name, price }).await;
        self.narrate(result, "adding product", |r| r.success_message)
    }

    async fn update_product(&mut self) -> Result<()> {
        let product_id = self.prompt_parsed("Enter product ID to update: ", "product ID").await?;
        let price = self.prompt_price("Enter new price: ").await?;
        let result = self
            .app
            .product_service
            .update_product(UpdateProductCommand { product_id, price })
            .await;
        self.narrate(result, "updating product", |r| r.message)
    }

    async fn delete_product(&mut self) -> Result<()> {
        let product_id = self.prompt_parsed("Enter product ID to delete: ", "product ID").await?;
        let result = self.app.product_service.delete_product(product_id).await;
        self.narrate(result, "deleting product", |r| r.message)
    }

    async fn add_order(&mut self) -> Result<()> {
        let customer_id = self
            .prompt_parsed("Enter customer ID for the new order: ", "customer ID")
            .await?;
        let order_date = self.prompt_date("Enter order date (YYYY-MM-DD): ").await?;
        let line_items = self.prompt_line_items().await?;
        let result = self
            .app
            .order_service
            .add_order(AddOrderCommand {
                customer_id,
                order_date,
                line_items,
            })
            .await;
        self.narrate(result, "adding order", |r| r.success_message)
    }

    async fn update_order(&mut self) -> Result<()> {
        let order_id = self.prompt_parsed("Enter order ID to update: ", "order ID").await?;
        let customer_id = self.prompt_parsed("Enter new customer ID: ", "customer ID").await?;
        let order_date = self.prompt_date("Enter new order date (YYYY-MM-DD): ").await?;
        let line_items = self.prompt_line_items().await?;
        let result = self
            .app
            .order_service
            .update_order(UpdateOrderCommand {
                order_id,
                customer_id,
                order_date,
                line_items,
            })
            .await;
        self.narrate(result, "updating order", |r| r.message)
    }

    async fn delete_order(&mut self) -> Result<()> {
        let order_id = self.prompt_parsed("Enter order ID to delete: ", "order ID").await?;
        let result = self.app.order_service.delete_order(order_id).await;
        self.narrate(result, "deleting order", |r| r.message)
    }

    async fn fetch_all_orders(&mut self) -> Result<()> {
        match self.app.order_service.fetch_all_orders().await {
            Ok(result) => listing::write_orders(&mut self.output, &result.orders)?,
            Err(e) => self.report_error(e, "fetching orders")?,
        }
        Ok(())
    }

    async fn generate_report(&mut self) -> Result<()> {
        let prompt = format!(
            "Enter CSV file name (blank for '{}'): ",
            self.app.export_service.default_destination().display()
        );
        let file_name = self.prompt(&prompt).await?;
        let destination = (!file_name.is_empty()).then(|| PathBuf::from(file_name));
        let result = self
            .app
            .export_service
            .generate_report(GenerateReportCommand { destination })
            .await;
        self.narrate(result, "generating report", |r| r.success_message)
    }

    async fn search_orders(&mut self) -> Result<()> {
        let customer_name = self.prompt("Enter customer name to search for orders: ").await?;
        match self.app.order_service.search_orders_by_customer_name(&customer_name).await {
            Ok(result) => listing::write_search_results(&mut self.output, &result.customer_name, &result.orders)?,
            Err(e) => self.report_error(e, "searching orders")?,
        }
        Ok(())
    }

    /// Print the outcome of a write operation as one status line
    fn narrate<T>(&mut self, result: StoreResult<T>, action: &str, message: impl FnOnce(T) -> String) -> Result<()> {
        match result {
            Ok(value) => writeln!(self.output, "{}", message(value))?,
            Err(e) => self.report_error(e, action)?,
        }
        Ok(())
    }

    fn report_error(&mut self, err: StoreError, action: &str) -> Result<()> {
        match err {
            StoreError::NotConnected => return Err(err.into()),
            StoreError::Refused(refusal) => writeln!(self.output, "{}", refusal)?,
            other => writeln!(self.output, "Error {}: {}", action, other)?,
        }
        Ok(())
    }

    async fn prompt(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Err(InputClosed.into());
        }
        Ok(line.trim().to_string())
    }

    async fn prompt_required(&mut self, prompt: &str) -> Result<String> {
        loop {
            let value = self.prompt(prompt).await?;
            if !value.is_empty() {
                return Ok(value);
            }
            writeln!(self.output, "Value cannot be empty, please try again.")?;
        }
    }

    async fn prompt_parsed<T: FromStr>(&mut self, prompt: &str, what: &str) -> Result<T> {
        loop {
            let value = self.prompt(prompt).await?;
            match value.parse() {
                Ok(parsed) => return Ok(parsed),
                Err(_) => writeln!(self.output, "Invalid {}: '{}', please try again.", what, value)?,
            }
        }
    }

    /// A finite, non-negative price
    async fn prompt_price(&mut self, prompt: &str) -> Result<f64> {
        loop {
            let value = self.prompt(prompt).await?;
            match value.parse::<f64>() {
                Ok(price) if price.is_finite() && price >= 0.0 => return Ok(price),
                _ => writeln!(self.output, "Invalid price: '{}', please try again.", value)?,
            }
        }
    }

    async fn prompt_date(&mut self, prompt: &str) -> Result<String> {
        loop {
            let value = self.prompt(prompt).await?;
            match NaiveDate::parse_from_str(&value, "%Y-%m-%d") {
                Ok(date) => return Ok(date.format("%Y-%m-%d").to_string()),
                Err(_) => writeln!(self.output, "Invalid date: '{}', expected YYYY-MM-DD.", value)?,
            }
        }
    }

    /// Collect (product id, quantity) pairs until product id 0
    async fn prompt_line_items(&mut self) -> Result<Vec<LineItem>> {
        let mut line_items = Vec::new();
        loop {
            let product_id: i64 = self
                .prompt_parsed("Enter product ID (or 0 to finish): ", "product ID")
                .await?;
            if product_id == 0 {
                return Ok(line_items);
            }
            let quantity = self.prompt_parsed("Enter quantity: ", "quantity").await?;
            line_items.push(LineItem::new(product_id, quantity));
        }
    }
}
