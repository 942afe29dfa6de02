use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Manage customers, products and orders in a local SQLite database."
)]
pub struct Cli {
    /// SQLite database URL or file path.
    #[arg(long, value_name = "URL", env = "ORDER_MANAGER_DB")]
    pub database: Option<String>,

    /// Default CSV file for reports.
    #[arg(long = "report-file", value_name = "PATH", env = "ORDER_MANAGER_REPORT")]
    pub report_file: Option<PathBuf>,

    /// Log filter (e.g. warn, info, order_manager=debug). RUST_LOG wins when set.
    #[arg(long = "log-level", value_name = "FILTER")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the interactive menu (the default).
    Menu,
    /// Print every order with its line items.
    Orders {
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Print every customer.
    Customers,
    /// Print every product.
    Products,
    /// Print the orders of customers whose name contains NAME.
    Search { name: String },
    /// Write the flat order report as CSV.
    Report {
        /// Destination file; defaults to the configured report file.
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}
