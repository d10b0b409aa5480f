//! User command handlers
//!
//! Bootstrap accounts and inspect the user table.

use anyhow::Result;
use colored::*;
use forklift_core::domain::Role;
use forklift_core::domain::user::User;
use forklift_core::password::hash_password;
use forklift_server::repository::user_repository;
use sqlx::SqlitePool;

const SAMPLE_TECHNICIANS: [(&str, &str); 3] = [
    ("Budi", "budi@test.com"),
    ("Andi", "andi@test.com"),
    ("Joni", "joni@test.com"),
];

/// Create the admin account; an existing account with the email is left alone
pub async fn create_admin(pool: &SqlitePool, name: &str, email: &str, password: &str) -> Result<()> {
    if user_repository::find_by_email(pool, email).await?.is_some() {
        println!("{}", format!("Admin user {} already exists!", email).yellow());
        return Ok(());
    }

    let user = user_repository::create(
        pool,
        name,
        Some(email),
        Some(&hash_password(password)),
        Role::Admin,
    )
    .await?;

    println!(
        "{} Admin user {} created (id {})",
        "✓".green(),
        user.email.as_deref().unwrap_or(email).bold(),
        user.id
    );

    Ok(())
}

/// Insert the sample technicians when no users exist.
///
/// They have no password and can only be assigned to jobs.
pub async fn seed_technicians(pool: &SqlitePool) -> Result<()> {
    if user_repository::count(pool).await? > 0 {
        println!("{}", "Users already exist, nothing seeded.".yellow());
        return Ok(());
    }

    for (name, email) in SAMPLE_TECHNICIANS {
        user_repository::create(pool, name, Some(email), None, Role::Technician).await?;
        println!("{} Seeded {}", "✓".green(), name.bold());
    }

    Ok(())
}

/// List all users
pub async fn list_users(pool: &SqlitePool) -> Result<()> {
    let users = user_repository::list_all(pool).await?;

    if users.is_empty() {
        println!("{}", "No users found.".yellow());
    } else {
        println!("{}", format!("Found {} user(s):", users.len()).bold());
        println!();
        for user in users {
            print_user_summary(&user);
        }
    }

    Ok(())
}

fn print_user_summary(user: &User) {
    let login = if user.password.is_some() {
        "can log in".normal()
    } else {
        "no password".dimmed()
    };

    println!("  {} {} {}", "▸".cyan(), user.name.bold(), format!("#{}", user.id).dimmed());
    println!("    Email:  {}", user.email.as_deref().unwrap_or("-"));
    println!("    Role:   {}", colorize_role(user.role));
    println!("    Login:  {}", login);
    println!();
}

fn colorize_role(role: Role) -> ColoredString {
    match role {
        Role::Admin => role.as_str().red().bold(),
        Role::Supervisor => role.as_str().yellow(),
        Role::Technician => role.as_str().green(),
    }
}
