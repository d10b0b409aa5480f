//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod user;

use anyhow::Result;
use clap::Subcommand;
use sqlx::SqlitePool;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Create the admin account if it does not exist yet
    CreateAdmin {
        #[arg(long, default_value = "Admin")]
        name: String,
        #[arg(long, default_value = "rey@admin123.com")]
        email: String,
        #[arg(long, env = "FORKLIFT_ADMIN_PASSWORD", default_value = "nimda123")]
        password: String,
    },
    /// Insert sample technicians into an empty user table
    SeedTechnicians,
    /// List all users
    ListUsers,
}

/// Handle a CLI command
pub async fn handle_command(command: Commands, pool: &SqlitePool) -> Result<()> {
    match command {
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => user::create_admin(pool, &name, &email, &password).await,
        Commands::SeedTechnicians => user::seed_technicians(pool).await,
        Commands::ListUsers => user::list_users(pool).await,
    }
}
