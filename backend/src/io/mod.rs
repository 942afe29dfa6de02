//! # IO Module
//!
//! The caller side of the domain services: the interactive menu and the
//! one-shot subcommands. Both print plain text to the given writer.

pub mod listing;
pub mod menu;

pub use menu::Menu;

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::AsyncBufRead;

use crate::cli::Command;
use crate::domain::commands::export::GenerateReportCommand;
use crate::AppState;

/// Run one subcommand; no subcommand means the interactive menu
pub async fn run_command<R, W>(app: &AppState, command: Option<Command>, input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    match command.unwrap_or(Command::Menu) {
        Command::Menu => Menu::new(app, input, output).run().await?,
        Command::Orders { json } => {
            let result = app.order_service.fetch_all_orders().await.context("failed to fetch orders")?;
            if json {
                serde_json::to_writer_pretty(&mut output, &result.orders)?;
                writeln!(output)?;
            } else {
                listing::write_orders(&mut output, &result.orders)?;
            }
        }
        Command::Customers => {
            let customers = app
                .customer_service
                .list_customers()
                .await
                .context("failed to list customers")?;
            listing::write_customers(&mut output, &customers)?;
        }
        Command::Products => {
            let products = app
                .product_service
                .list_products()
                .await
                .context("failed to list products")?;
            listing::write_products(&mut output, &products)?;
        }
        Command::Search { name } => {
            let result = app
                .order_service
                .search_orders_by_customer_name(&name)
                .await
                .context("failed to search orders")?;
            listing::write_search_results(&mut output, &result.customer_name, &result.orders)?;
        }
        Command::Report { output: destination } => {
            let result = app
                .export_service
                .generate_report(GenerateReportCommand { destination })
                .await
                .context("failed to generate report")?;
            writeln!(output, "{}", result.success_message)?;
        }
    }
    Ok(())
}
