use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use std::sync::atomic::Ordering;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use cardsmith_cli::pipeline::{self, CancelFlag};
use cardsmith_cli::{Command, Config};
use cardsmith_client::GraphqlClient;
use cardsmith_core::config::HttpConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Setup logging (stderr to keep stdout clean)
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    // Parse command line arguments
    let config = Config::parse();

    // Ctrl-C stops the batch between items; the item in flight completes
    // first, so no record is left half-published.
    let cancel: CancelFlag = pipeline::cancel_flag();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, stopping after the current item");
                cancel.store(true, Ordering::Relaxed);
            }
        });
    }

    // Execute command
    let stats = match config.command {
        Command::Resize { dir, width, quality } => {
            pipeline::run_resize(&dir, width, quality, &cancel)
                .with_context(|| format!("Failed to resize images in {}", dir.display()))?
        }
        Command::PublishCards { dir, width, quality } => {
            let client = GraphqlClient::new(&config.endpoint, HttpConfig::default())
                .context("Invalid GraphQL endpoint")?;
            pipeline::run_publish_cards(&dir, width, quality, &client, &cancel)
                .await
                .with_context(|| format!("Failed to publish cards from {}", dir.display()))?
        }
        Command::PublishUpgrades { file } => {
            let client = GraphqlClient::new(&config.endpoint, HttpConfig::default())
                .context("Invalid GraphQL endpoint")?;
            pipeline::run_publish_upgrades(&file, &client, &cancel)
                .await
                .with_context(|| format!("Failed to publish upgrades from {}", file.display()))?
        }
    };

    // Summary
    info!(
        "Batch complete: {} attempted, {} succeeded, {} failed",
        stats.total(),
        stats.succeeded,
        stats.failed
    );

    if !stats.is_clean() {
        std::process::exit(1);
    }
    Ok(())
}
