//! User Service
//!
//! Business logic for user management.

use forklift_core::domain::user::{Role, User};
use forklift_core::dto::user::UserForm;
use forklift_core::password::hash_password;
use sqlx::SqlitePool;
use thiserror::Error;

use super::{is_unique_violation, require};
use crate::repository::user_repository;

/// Service error type
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User {0} not found")]
    NotFound(i64),

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("{0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            UserError::DuplicateEmail
        } else {
            UserError::DatabaseError(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, UserError>;

/// List all users
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    Ok(user_repository::list_all(pool).await?)
}

/// Users that can be picked as technicians on jobs
pub async fn list_technicians(pool: &SqlitePool) -> Result<Vec<User>> {
    Ok(user_repository::list_assignable(pool).await?)
}

/// Get a user by ID
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<User> {
    user_repository::find_by_id(pool, id)
        .await?
        .ok_or(UserError::NotFound(id))
}

/// Create a user with a hashed password
pub async fn create_user(pool: &SqlitePool, req: UserForm) -> Result<User> {
    let role = validate_user_request(&req)?;
    if req.password.is_empty() {
        return Err(UserError::ValidationError(
            "Password cannot be empty".to_string(),
        ));
    }

    let hashed = hash_password(&req.password);
    let user = user_repository::create(
        pool,
        req.name.trim(),
        Some(req.email.trim()),
        Some(&hashed),
        role,
    )
    .await?;

    tracing::info!("User created: {} ({}, {})", user.name, user.id, user.role);

    Ok(user)
}

/// Update a user; a blank password keeps the current one
pub async fn update_user(pool: &SqlitePool, id: i64, req: UserForm) -> Result<()> {
    let role = validate_user_request(&req)?;

    let hashed = (!req.password.is_empty()).then(|| hash_password(&req.password));
    let updated = user_repository::update(
        pool,
        id,
        req.name.trim(),
        Some(req.email.trim()),
        hashed.as_deref(),
        role,
    )
    .await?;

    if !updated {
        return Err(UserError::NotFound(id));
    }

    tracing::info!("User updated: {} ({})", req.name.trim(), id);

    Ok(())
}

/// Delete a user; their job assignments are removed with them
pub async fn delete_user(pool: &SqlitePool, id: i64) -> Result<()> {
    let deleted = user_repository::delete(pool, id).await?;

    if !deleted {
        return Err(UserError::NotFound(id));
    }

    tracing::info!("User deleted: {}", id);

    Ok(())
}

// =============================================================================
// Validation
// =============================================================================

fn validate_user_request(req: &UserForm) -> Result<Role> {
    require(&req.name, "Name").map_err(UserError::ValidationError)?;
    require(&req.email, "Email").map_err(UserError::ValidationError)?;

    if !req.email.contains('@') {
        return Err(UserError::ValidationError(format!(
            "'{}' is not an email address",
            req.email.trim()
        )));
    }

    Role::parse(&req.role)
        .ok_or_else(|| UserError::ValidationError(format!("Unknown role '{}'", req.role)))
}
