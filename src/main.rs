// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use masar_client::cli::{handle_command, MasarCli};
use masar_client::client::MasarClient;
use masar_client::config::ClientConfig;
use masar_client::core::FsOps;
use std::fs::OpenOptions;
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = MasarCli::parse();
    let config = ClientConfig::load()?;

    if let Some(parent) = config.log_path.parent() {
        FsOps::ensure_dir_exists(parent).await?;
    }

    // Logs go to a file so they never mix with command output
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&config.log_path)
        .with_context(|| format!("Failed to open log file {}", config.log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("API: {}", config.api.base_url);
    info!("Session file: {}", config.session_path.display());

    let client = MasarClient::new(config)?;
    handle_command(cli, &client).await
}
