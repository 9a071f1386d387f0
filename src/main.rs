//! Weeek-sync - PR / task-tracker synchronization
//!
//! CLI entry point, run from CI once per pull request or release event.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weeek_sync::cli;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // RUNNER_DEBUG=1 is how GitHub Actions signals a debug re-run
    let default_filter = if std::env::var("RUNNER_DEBUG").as_deref() == Ok("1") {
        "weeek_sync=debug"
    } else {
        "weeek_sync=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = cli::Cli::parse();
    cli::run(cli).await
}
