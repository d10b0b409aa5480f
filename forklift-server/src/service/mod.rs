//! Service Module
//!
//! Business logic layer. Services validate input, enforce job-level
//! authorization and orchestrate the repositories.

pub mod auth;
pub mod forklift;
pub mod pm_job;
pub mod user;
pub mod workshop_job;

// Re-export for convenience
pub use auth as auth_service;
pub use forklift as forklift_service;
pub use pm_job as pm_job_service;
pub use user as user_service;
pub use workshop_job as workshop_job_service;

/// Message shown when a job is submitted without technicians
pub const NO_TECHNICIANS: &str = "Pilih minimal satu teknisi";

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/// Reject blank required text fields
pub(crate) fn require(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} cannot be empty", field));
    }
    Ok(())
}
