mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geodash=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Doctor(args) => commands::doctor::execute(&cli.config, args).await,
        Commands::Inspect(args) => commands::inspect::execute(&cli.config, args),
        Commands::Db(args) => commands::db::execute(&cli.config, args).await,
        Commands::User(args) => commands::user::execute(&cli.config, args).await,
    }
}
