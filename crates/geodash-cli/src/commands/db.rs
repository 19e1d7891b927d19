//! Database bootstrap.

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use geodash_core::config::PortalConfig;
use geodash_store::sqlite::SqliteStore;

use crate::cli::{DbArgs, DbCommands};

pub async fn execute(config_path: &Path, args: DbArgs) -> Result<()> {
    let portal = PortalConfig::load(config_path).context("loading configuration")?;

    match args.command {
        DbCommands::Init => {
            SqliteStore::connect(&portal.database)
                .await
                .context("initializing database")?;
            println!(
                "{} Database ready at {}",
                style("✓").green(),
                portal.database.display()
            );
        }
    }

    Ok(())
}
