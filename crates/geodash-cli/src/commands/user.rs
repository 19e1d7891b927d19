//! Account management from the terminal.

use anyhow::{bail, Context, Result};
use console::style;
use std::path::Path;
use tabled::{Table, Tabled};

use geodash_core::config::PortalConfig;
use geodash_core::models::{NewUser, Role};
use geodash_core::DashError;
use geodash_store::ports::UserStore;
use geodash_store::sqlite::SqliteStore;

use crate::cli::{UserArgs, UserCommands};

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "Username")]
    username: String,

    #[tabled(rename = "Email")]
    email: String,

    #[tabled(rename = "Role")]
    role: String,

    #[tabled(rename = "Created")]
    created_at: String,
}

pub async fn execute(config_path: &Path, args: UserArgs) -> Result<()> {
    let portal = PortalConfig::load(config_path).context("loading configuration")?;
    let store = SqliteStore::connect(&portal.database)
        .await
        .context("opening database")?;

    match args.command {
        UserCommands::Add { username, email, password, role } => {
            let Some(role) = Role::parse(&role) else {
                bail!("unknown role '{}': use admin, editor or client", role);
            };

            let user = NewUser { username, email, password, role };
            match store.create_user(&user).await {
                Ok(()) => {
                    println!("{} User '{}' created ({})", style("✓").green(), user.username, role);
                }
                Err(DashError::DuplicateUser { username }) => {
                    bail!("username '{}' already exists", username);
                }
                Err(e) => return Err(e.into()),
            }
        }
        UserCommands::List => {
            let users = store.list_users().await?;
            if users.is_empty() {
                println!("No accounts. Create one with: geodash user add <name> --email ... --password ...");
            } else {
                let rows: Vec<UserRow> = users
                    .into_iter()
                    .map(|u| UserRow {
                        username: u.username,
                        email: u.email,
                        role: u.role.to_string(),
                        created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
                    })
                    .collect();
                println!("{}", Table::new(rows));
            }
        }
    }

    Ok(())
}
