//! Auth Service
//!
//! Login, logout and password reset on top of the in-process stores.

use forklift_core::authz::CurrentUser;
use forklift_core::password::{hash_password, verify_password};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::repository::user_repository;
use crate::session::{ResetTokenStore, SessionStore};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const INVALID_RESET_LINK: &str = "Invalid or expired reset link. Please request a new one.";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match.";

/// Service error type
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,

    #[error("{}", INVALID_RESET_LINK)]
    InvalidResetToken,

    #[error("{}", PASSWORD_MISMATCH)]
    PasswordMismatch,

    #[error("{0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, AuthError>;

/// Check credentials and open a session, returning its token
pub async fn login(
    pool: &SqlitePool,
    sessions: &SessionStore,
    email: &str,
    password: &str,
) -> Result<(String, CurrentUser)> {
    let email = email.trim();
    let user = user_repository::find_by_email(pool, email).await?;

    let Some(user) = user.filter(|u| verify_password(password, u.password.as_deref())) else {
        tracing::info!("Failed login for {}", email);
        return Err(AuthError::InvalidCredentials);
    };

    let current = CurrentUser {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
    };
    let token = sessions.create(current.clone());

    tracing::info!("User {} logged in", current.id);

    Ok((token, current))
}

/// End a session if there is one
pub fn logout(sessions: &SessionStore, token: Option<&str>) {
    if let Some(token) = token {
        sessions.remove(token);
    }
}

/// Issue a reset token for a registered email.
///
/// Returns `None` for unknown emails; callers must not reveal the difference.
pub async fn request_password_reset(
    pool: &SqlitePool,
    tokens: &ResetTokenStore,
    email: &str,
) -> Result<Option<String>> {
    let user = user_repository::find_by_email(pool, email.trim()).await?;

    Ok(user.map(|u| {
        tracing::info!("Password reset requested for user {}", u.id);
        tokens.issue(u.id)
    }))
}

/// Whether a reset link is still usable
pub fn reset_token_is_valid(tokens: &ResetTokenStore, token: &str) -> bool {
    tokens.peek(token).is_some()
}

/// Set a new password through a reset link; the token is consumed on success
pub async fn reset_password(
    pool: &SqlitePool,
    tokens: &ResetTokenStore,
    token: &str,
    password: &str,
    confirm_password: &str,
) -> Result<()> {
    if tokens.peek(token).is_none() {
        return Err(AuthError::InvalidResetToken);
    }

    if password != confirm_password {
        return Err(AuthError::PasswordMismatch);
    }

    if password.is_empty() {
        return Err(AuthError::ValidationError(
            "Password cannot be empty".to_string(),
        ));
    }

    let user_id = tokens.consume(token).ok_or(AuthError::InvalidResetToken)?;
    user_repository::update_password(pool, user_id, &hash_password(password)).await?;

    tracing::info!("Password reset for user {}", user_id);

    Ok(())
}
