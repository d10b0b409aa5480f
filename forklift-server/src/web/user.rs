//! User Management Handlers
//!
//! Admin-only pages under `/users`; access is enforced by the `admin_only`
//! middleware.

use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use forklift_core::authz::CurrentUser;
use forklift_core::domain::Role;
use forklift_core::dto::user::UserForm;

use crate::service::user_service::{self, UserError};
use crate::state::AppState;
use crate::templates::{Layout, RoleOption, UserEditTemplate, UserListTemplate, UserView};
use crate::web::error::WebResult;

const LIST_PATH: &str = "/users/";

async fn list_page(
    state: &AppState,
    user: &CurrentUser,
    error: Option<String>,
) -> WebResult<UserListTemplate> {
    let users = user_service::list_users(state.pool()).await?;

    Ok(UserListTemplate {
        layout: Layout::for_user(Some(user)),
        users: users.iter().map(UserView::from).collect(),
        roles: RoleOption::list(Role::Technician),
        error,
    })
}

/// GET /users/
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> WebResult<UserListTemplate> {
    list_page(&state, &user, None).await
}

/// POST /users/tambah
pub async fn create_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(req): Form<UserForm>,
) -> WebResult<Response> {
    tracing::info!("Creating user: {}", req.name);

    match user_service::create_user(state.pool(), req).await {
        Ok(_) => Ok(Redirect::to(LIST_PATH).into_response()),
        Err(e @ (UserError::DuplicateEmail | UserError::ValidationError(_))) => {
            Ok(list_page(&state, &user, Some(e.to_string())).await?.into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /users/edit/{id}
pub async fn edit_user_form(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> WebResult<Response> {
    match user_service::get_user(state.pool(), id).await {
        Ok(target) => Ok(UserEditTemplate {
            layout: Layout::for_user(Some(&user)),
            user: UserView::from(&target),
            roles: RoleOption::list(target.role),
            error: None,
        }
        .into_response()),
        Err(UserError::NotFound(_)) => Ok(Redirect::to(LIST_PATH).into_response()),
        Err(e) => Err(e.into()),
    }
}

/// POST /users/edit/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Form(req): Form<UserForm>,
) -> WebResult<Response> {
    tracing::info!("Updating user: {}", id);

    let submitted = UserView {
        id,
        name: req.name.clone(),
        email: req.email.clone(),
        role: req.role.clone(),
    };
    let role = Role::parse(&req.role).unwrap_or(Role::Technician);

    match user_service::update_user(state.pool(), id, req).await {
        Ok(()) => {
            // Sessions cache the role; force a fresh login
            state.sessions().remove_user(id);
            Ok(Redirect::to(LIST_PATH).into_response())
        }
        Err(UserError::NotFound(_)) => Ok(Redirect::to(LIST_PATH).into_response()),
        Err(e @ (UserError::DuplicateEmail | UserError::ValidationError(_))) => {
            Ok(UserEditTemplate {
                layout: Layout::for_user(Some(&user)),
                user: submitted,
                roles: RoleOption::list(role),
                error: Some(e.to_string()),
            }
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /users/delete/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> WebResult<Redirect> {
    tracing::info!("Deleting user: {}", id);

    match user_service::delete_user(state.pool(), id).await {
        Ok(()) => {
            state.sessions().remove_user(id);
            Ok(Redirect::to(LIST_PATH))
        }
        Err(UserError::NotFound(_)) => Ok(Redirect::to(LIST_PATH)),
        Err(e) => Err(e.into()),
    }
}
