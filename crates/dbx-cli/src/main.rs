//! dbx CLI - account and workspace provisioning.
//!
//! The main entry point for the `dbx` CLI binary.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dbx_cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match cli.command {
            Commands::Account(args) => dbx_cli::commands::account::execute(args, &config).await,
            Commands::Catalog(args) => dbx_cli::commands::catalog::execute(args, &config).await,
            Commands::Policy(args) => dbx_cli::commands::policies::execute(args, &config).await,
            Commands::Permissions(args) => {
                dbx_cli::commands::permissions::execute(args, &config).await
            }
        }
    })
}
