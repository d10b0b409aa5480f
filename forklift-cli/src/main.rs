//! Forklift admin CLI
//!
//! Maintenance commands run directly against the forklift database.

mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, handle_command};
use forklift_server::db;

#[derive(Parser)]
#[command(name = "forklift-admin")]
#[command(about = "Forklift Repair Log administration", long_about = None)]
struct Cli {
    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://forklift.db")]
    database_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let pool = db::create_pool(&cli.database_url, 1)
        .await
        .with_context(|| format!("Failed to open database {}", cli.database_url))?;
    db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    handle_command(cli.command, &pool).await
}
