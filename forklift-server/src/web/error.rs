//! Web Error Handling
//!
//! Unified error type for page handlers. Errors render the error page; the
//! details of database and internal failures are logged, never shown.

use askama::Template;
use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::service::auth_service::AuthError;
use crate::service::forklift_service::ForkliftError;
use crate::service::pm_job_service::PmJobError;
use crate::service::user_service::UserError;
use crate::service::workshop_job_service::WorkshopJobError;
use crate::templates::{ErrorTemplate, Layout};

/// Web error type
#[derive(Debug)]
pub enum WebError {
    NotFound(String),
    Forbidden(String),
    BadRequest(String),
    Unauthorized,
    DatabaseError(sqlx::Error),
    InternalError(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            WebError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            WebError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            WebError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            WebError::Unauthorized => {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(serde_json::json!({ "error": "Not authenticated" })),
                )
                    .into_response();
            }
            WebError::DatabaseError(err) => {
                tracing::error!("Database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            WebError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let page = ErrorTemplate {
            layout: Layout::anonymous(),
            status: status.as_u16(),
            message,
        };

        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(err) => {
                tracing::error!("Failed to render error page: {}", err);
                (status, page.message).into_response()
            }
        }
    }
}

impl From<sqlx::Error> for WebError {
    fn from(err: sqlx::Error) -> Self {
        WebError::DatabaseError(err)
    }
}

impl From<askama::Error> for WebError {
    fn from(err: askama::Error) -> Self {
        WebError::InternalError(format!("Template error: {}", err))
    }
}

impl From<ForkliftError> for WebError {
    fn from(err: ForkliftError) -> Self {
        match err {
            ForkliftError::NotFound(id) => WebError::NotFound(format!("Forklift {} not found", id)),
            ForkliftError::Duplicate => WebError::BadRequest(err.to_string()),
            ForkliftError::ValidationError(msg) => WebError::BadRequest(msg),
            ForkliftError::DatabaseError(err) => WebError::DatabaseError(err),
        }
    }
}

impl From<PmJobError> for WebError {
    fn from(err: PmJobError) -> Self {
        match err {
            PmJobError::NotFound(id) => WebError::NotFound(format!("PM job {} not found", id)),
            PmJobError::Forbidden(_) => WebError::Forbidden(err.to_string()),
            PmJobError::NoTechnicians => WebError::BadRequest(err.to_string()),
            PmJobError::ValidationError(msg) => WebError::BadRequest(msg),
            PmJobError::DatabaseError(err) => WebError::DatabaseError(err),
        }
    }
}

impl From<WorkshopJobError> for WebError {
    fn from(err: WorkshopJobError) -> Self {
        match err {
            WorkshopJobError::NotFound(id) => {
                WebError::NotFound(format!("Workshop job {} not found", id))
            }
            WorkshopJobError::Forbidden(_) => WebError::Forbidden(err.to_string()),
            WorkshopJobError::NoTechnicians => WebError::BadRequest(err.to_string()),
            WorkshopJobError::ValidationError(msg) => WebError::BadRequest(msg),
            WorkshopJobError::DatabaseError(err) => WebError::DatabaseError(err),
        }
    }
}

impl From<UserError> for WebError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => WebError::NotFound(format!("User {} not found", id)),
            UserError::DuplicateEmail => WebError::BadRequest(err.to_string()),
            UserError::ValidationError(msg) => WebError::BadRequest(msg),
            UserError::DatabaseError(err) => WebError::DatabaseError(err),
        }
    }
}

impl From<AuthError> for WebError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DatabaseError(err) => WebError::DatabaseError(err),
            AuthError::InvalidCredentials => WebError::Unauthorized,
            other => WebError::BadRequest(other.to_string()),
        }
    }
}

pub type WebResult<T> = Result<T, WebError>;
