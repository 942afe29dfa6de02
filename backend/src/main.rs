use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;

use order_manager::cli::Cli;
use order_manager::config::AppConfig;
use order_manager::{initialize_app, io};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli);

    // Logs go to stderr so they never interleave with menu output
    tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_writer(std::io::stderr)
        .init();

    info!("Starting order manager with database '{}'", config.database_url);
    let app = initialize_app(&config)
        .await
        .with_context(|| format!("failed to open database '{}'", config.database_url))?;

    let input = BufReader::new(tokio::io::stdin());
    let outcome = io::run_command(&app, cli.command, input, std::io::stdout().lock()).await;

    app.db.close().await;
    outcome
}
