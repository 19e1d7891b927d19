use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// GeoDash - regional indicator dashboards
#[derive(Parser, Debug)]
#[command(name = "geodash")]
#[command(about = "Regional indicator dashboard tooling", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Portal configuration file
    #[arg(long, global = true, default_value = "geodash.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run startup diagnostics: config, data files, metric resolution, database
    Doctor(DoctorArgs),

    /// Show a view's dataset columns and resolved metrics
    Inspect(InspectArgs),

    /// Manage the account and facility database
    Db(DbArgs),

    /// Manage user accounts
    User(UserArgs),
}

#[derive(Parser, Debug)]
pub struct DoctorArgs {
    /// Show detailed output for passing checks
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Slug of the configured view to inspect
    pub view: String,
}

#[derive(Parser, Debug)]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbCommands,
}

#[derive(Subcommand, Debug)]
pub enum DbCommands {
    /// Create the database file and schema
    Init,
}

#[derive(Parser, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommands,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Create an account
    Add {
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// admin, editor or client
        #[arg(long, default_value = "client")]
        role: String,
    },

    /// List accounts
    List,
}
