//! User Repository
//!
//! Handles all database operations related to users.

use forklift_core::domain::user::{Role, User};
use sqlx::SqlitePool;

/// Create a new user. `password` must already be hashed.
pub async fn create(
    pool: &SqlitePool,
    name: &str,
    email: Option<&str>,
    password: Option<&str>,
    role: Role,
) -> Result<User, sqlx::Error> {
    let result = sqlx::query("INSERT INTO users (name, email, password, role) VALUES (?, ?, ?, ?)")
        .bind(name)
        .bind(email)
        .bind(password)
        .bind(role.as_str())
        .execute(pool)
        .await?;

    Ok(User {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        email: email.map(str::to_string),
        password: password.map(str::to_string),
        role,
    })
}

/// Find a user by ID
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, name, email, password, role FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// Find a user by login email
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, name, email, password, role FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// List all users
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, name, email, password, role FROM users ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// Users who can be assigned to jobs (everyone but admins)
pub async fn list_assignable(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
    let rows = sqlx::query_as::<_, UserRow>(
        "SELECT id, name, email, password, role FROM users WHERE role != 'admin' ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Update profile fields; `password` of `None` keeps the stored hash
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    name: &str,
    email: Option<&str>,
    password: Option<&str>,
    role: Role,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET name = ?, email = ?, password = COALESCE(?, password), role = ?
        WHERE id = ?
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password)
    .bind(role.as_str())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Replace the stored password hash
pub async fn update_password(pool: &SqlitePool, id: i64, password: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET password = ? WHERE id = ?")
        .bind(password)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a user by ID; their job assignments go with them
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: Option<String>,
    password: Option<String>,
    role: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            password: row.password,
            role: Role::parse(&row.role).unwrap_or(Role::Technician), // Unknown roles get the least access
        }
    }
}
